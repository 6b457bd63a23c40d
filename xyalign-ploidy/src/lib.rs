//! Sex-chromosome ploidy calls for xyalign.
//!
//! A [PloidyDecisionMaker] compares depth between every autosome and X,
//! every autosome and Y, and X and Y using the tests in `xyalign-stats`, then
//! calls the Y chromosome present or absent. The caller can skip the
//! statistics entirely with an override.
//!
//! Results are written as human-readable text per comparison
//! ([write_call_results]) and as one JSON document ([write_call_json]).

pub mod decision;
pub mod errors;
pub mod models;
pub mod report;

// re-exports
pub use decision::{DecisionState, PloidyDecisionMaker, compare, plan_comparisons, resolve_override};
pub use errors::PloidyError;
pub use models::{Comparison, ComparisonOutcome, InferenceSettings, PloidyCall, SexChromosomes};
pub use report::{write_call_json, write_call_results, write_comparison_results};
