//! Core types for xyalign: genomic regions, region sets, and the interval
//! algebra shared by the coverage scanner and the region classifier.
//!
//! All coordinates are 0-based, half-open (BED convention).
//!
//! # Example
//!
//! ```
//! use xyalign_core::models::{Region, RegionSet};
//! use xyalign_core::ranges::IntervalRanges;
//!
//! let rs = RegionSet::from(vec![
//!     Region::new("chr1", 0, 10),
//!     Region::new("chr1", 10, 20),
//!     Region::new("chr1", 25, 30),
//! ]);
//! let merged = rs.merge();
//! assert_eq!(merged.len(), 2);
//! ```

pub mod errors;
pub mod models;
pub mod ranges;
pub mod utils;

// re-exports
pub use errors::RegionSetError;
pub use models::{Region, RegionSet};
pub use ranges::IntervalRanges;
