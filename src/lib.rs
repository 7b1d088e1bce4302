//! # u-statlab
//!
//! Numeric core for interactive statistics exploration.
//!
//! This crate evaluates probability distributions, draws seeded samples,
//! summarizes data and fits simple models. It knows nothing about the
//! widgets, plots or files of the application that calls it.
//!
//! ## Modules
//!
//! - [`distributions`]: Validated parameter structs with pdf/pmf, CDF, quantile and moments
//! - [`descriptor`]: Tagged union over all kinds, probability queries and plot curves
//! - [`sampling`]: Seeded random draws via `rand_distr`
//! - [`histogram`]: Sturges and integer-bin histograms
//! - [`stats`]: Descriptive statistics with numerical stability guarantees
//! - [`regression`]: Pearson correlation and least-squares fits with p-values
//! - [`history`]: Bounded log of recent probability calculations
//! - [`dataset`]: Column classification and per-category summaries
//! - [`special`]: Gamma, beta, error function and Student's t
//! - [`error`]: The shared [`StatError`] type
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: log-space pmfs, Welford's algorithm for
//!   variance, Neumaier summation for accumulation
//! - **Errors, not NaN**: invalid input surfaces as [`StatError`]
//! - **Property-based testing**: Mathematical invariants verified via proptest

pub mod dataset;
pub mod descriptor;
pub mod distributions;
pub mod error;
pub mod histogram;
pub mod history;
pub mod regression;
pub mod sampling;
pub mod special;
pub mod stats;

pub use descriptor::{Distribution, DistributionConfig, DistributionKind, ProbabilityQuery};
pub use error::StatError;
