//! Windowed coverage scanning for xyalign.
//!
//! Reads come from an [AlignmentSource] (an indexed BAM via noodles, or an
//! in-memory set of reads). A chromosome is cut into fixed-width windows, or
//! into externally supplied target intervals, and each [Window] records the
//! mean depth, mean mapping quality and, when variant evidence is supplied,
//! mean read balance over its span. [classify] then splits windows into
//! high- and low-confidence sets.
//!
//! # Example
//!
//! ```
//! use xyalign_coverage::{AlignedRead, ClassifyParams, InMemoryAlignments, ScanParams, classify, scan};
//!
//! let reads = (0..100).step_by(5).map(|p| AlignedRead::new(p, p + 5, 30)).collect();
//! let mut source = InMemoryAlignments::new().with_chromosome("chrX", 100, reads);
//!
//! let windows = scan(&mut source, "chrX", &ScanParams::fixed(25), None)
//!     .unwrap()
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! assert_eq!(windows.len(), 4);
//!
//! let classified = classify(windows, &ClassifyParams::default());
//! assert_eq!(classified.passing().count(), 4);
//! ```

pub mod bam;
pub mod classify;
pub mod driver;
pub mod errors;
pub mod models;
pub mod output;
pub mod read_balance;
pub mod scanner;
pub mod source;

// re-exports
pub use bam::BamAlignmentSource;
pub use classify::{ClassifiedRegions, ClassifiedWindows, ClassifyParams, classify};
pub use driver::{ChromosomeCoverage, analyze_chromosome, analyze_chromosomes};
pub use errors::CoverageError;
pub use models::{AlignedRead, ReadFilter, Window};
pub use output::write_window_table;
pub use read_balance::ReadBalanceSites;
pub use scanner::{ScanParams, WindowScanner, scan};
pub use source::{AlignmentSource, InMemoryAlignments, ReadStream};
