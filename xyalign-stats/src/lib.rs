//! Two-sample statistics for comparing read depth between chromosomes.
//!
//! This crate provides three independent procedures over a pair of
//! [DepthSample]s:
//!
//! - a permutation test on the difference of means,
//! - the two-sample Kolmogorov-Smirnov test,
//! - a bootstrap confidence interval for the ratio of means.
//!
//! Every random procedure takes its random source from the caller, so runs are
//! reproducible whenever the source is seeded.
//!
//! # Example
//!
//! ```
//! use xyalign_stats::{DepthSample, Resampler, ks_2samp};
//!
//! let autosome = DepthSample::new("chr19", vec![30.1, 29.8, 31.0, 30.4]);
//! let x = DepthSample::new("chrX", vec![15.2, 14.9, 15.5, 15.1]);
//!
//! let mut resampler = Resampler::new(Some(42));
//! let perm = resampler.permutation_test(&autosome, &x, 1000).unwrap();
//! assert!(perm.observed_diff > 0.0);
//!
//! let ks = ks_2samp(&autosome, &x).unwrap();
//! assert_eq!(ks.statistic, 1.0);
//! ```

pub mod bootstrap;
pub mod errors;
pub mod ks;
pub mod models;
pub mod permutation;
pub mod resampler;
pub mod utils;

// re-exports
pub use bootstrap::{BootstrapResult, bootstrap_ratio};
pub use errors::StatsError;
pub use ks::{KsResult, ks_2samp};
pub use models::{DepthSample, TestResult};
pub use permutation::{PermutationResult, permutation_test};
pub use resampler::Resampler;
