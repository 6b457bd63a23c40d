use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bootstrap::{BootstrapResult, bootstrap_ratio_with_cancel};
use crate::errors::Result;
use crate::models::DepthSample;
use crate::permutation::{PermutationResult, permutation_test_with_cancel};

///
/// Owns the random source shared by a sequence of resampling tests, plus an
/// optional cancellation flag checked while they run.
///
/// Tests run through one `Resampler` draw from a single stream, so a fixed
/// seed reproduces the whole sequence as long as the tests run in the same
/// order.
///
pub struct Resampler {
    rng: StdRng,
    cancel: Option<Arc<AtomicBool>>,
}

impl Resampler {
    /// Seeded when `seed` is given, otherwise seeded from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Resampler { rng, cancel: None }
    }

    /// Abort running tests with `StatsError::Cancelled` once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn permutation_test(
        &mut self,
        a: &DepthSample,
        b: &DepthSample,
        num_permutations: usize,
    ) -> Result<PermutationResult> {
        permutation_test_with_cancel(
            a,
            b,
            num_permutations,
            &mut self.rng,
            self.cancel.as_deref(),
        )
    }

    pub fn bootstrap_ratio(
        &mut self,
        a: &DepthSample,
        b: &DepthSample,
        num_bootstraps: usize,
    ) -> Result<BootstrapResult> {
        bootstrap_ratio_with_cancel(a, b, num_bootstraps, &mut self.rng, self.cancel.as_deref())
    }
}
