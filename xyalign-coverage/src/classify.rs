//! Splitting windows into high- and low-confidence sets.
use log::debug;

use xyalign_core::ranges::merge_regions;
use xyalign_core::RegionSet;

use crate::models::Window;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifyParams {
    /// Minimum mean mapping quality for a window to pass.
    pub mapq_cutoff: f64,
    /// `f` in the admissible depth range `mean +/- f * sqrt(mean)`.
    pub depth_filter: f64,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        ClassifyParams {
            mapq_cutoff: 20.0,
            depth_filter: 4.0,
        }
    }
}

///
/// Windows of one scan with a pass/fail verdict for each.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedWindows {
    windows: Vec<Window>,
    passes: Vec<bool>,
    pub depth_mean: f64,
    pub depth_std: f64,
    /// Exclusive depth bounds a passing window must fall between.
    pub depth_bounds: (f64, f64),
}

///
/// Merged interval sets of passing and failing windows.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedRegions {
    pub passing: RegionSet,
    pub failing: RegionSet,
}

///
/// Classify windows by mapping quality and depth stability.
///
/// A window passes when `mapq >= mapq_cutoff` and its depth lies strictly
/// inside `(mean - f * sqrt(mean), mean + f * sqrt(mean))`, where the mean is
/// taken over all input windows. When every window has zero depth the range
/// collapses to `(0, 0)` and nothing passes.
///
pub fn classify(windows: Vec<Window>, params: &ClassifyParams) -> ClassifiedWindows {
    let n = windows.len() as f64;
    let (depth_mean, depth_std) = match windows.is_empty() {
        true => (0.0, 0.0),
        false => {
            let mean = windows.iter().map(|w| w.depth).sum::<f64>() / n;
            let variance = windows.iter().map(|w| (w.depth - mean).powi(2)).sum::<f64>() / n;
            (mean, variance.sqrt())
        }
    };

    let spread = params.depth_filter * depth_mean.sqrt();
    let depth_bounds = (depth_mean - spread, depth_mean + spread);

    let passes: Vec<bool> = windows
        .iter()
        .map(|w| {
            w.mapq >= params.mapq_cutoff && w.depth > depth_bounds.0 && w.depth < depth_bounds.1
        })
        .collect();

    debug!(
        "Depth mean {:.3}, std {:.3}, admissible ({:.3}, {:.3}); {} of {} windows pass",
        depth_mean,
        depth_std,
        depth_bounds.0,
        depth_bounds.1,
        passes.iter().filter(|&&p| p).count(),
        windows.len()
    );

    ClassifiedWindows {
        windows,
        passes,
        depth_mean,
        depth_std,
        depth_bounds,
    }
}

impl ClassifiedWindows {
    /// All windows in scan order.
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn is_passing(&self, index: usize) -> bool {
        self.passes.get(index).copied().unwrap_or(false)
    }

    pub fn passing(&self) -> impl Iterator<Item = &Window> {
        self.windows
            .iter()
            .zip(&self.passes)
            .filter(|(_, pass)| **pass)
            .map(|(w, _)| w)
    }

    pub fn failing(&self) -> impl Iterator<Item = &Window> {
        self.windows
            .iter()
            .zip(&self.passes)
            .filter(|(_, pass)| !**pass)
            .map(|(w, _)| w)
    }

    /// Depths of the passing windows, in scan order.
    pub fn passing_depths(&self) -> Vec<f64> {
        self.passing().map(|w| w.depth).collect()
    }

    /// Merge the passing and failing windows into two interval sets.
    pub fn regions(&self) -> ClassifiedRegions {
        ClassifiedRegions {
            passing: merge_regions(self.passing().map(Window::region)),
            failing: merge_regions(self.failing().map(Window::region)),
        }
    }
}

impl ClassifiedRegions {
    ///
    /// Combine the regions of several classifications (e.g. one per
    /// chromosome) into one merged pair.
    ///
    pub fn combine<'a>(parts: impl IntoIterator<Item = &'a ClassifiedRegions>) -> Self {
        let (passing, failing): (Vec<&RegionSet>, Vec<&RegionSet>) =
            parts.into_iter().map(|p| (&p.passing, &p.failing)).unzip();

        ClassifiedRegions {
            passing: merge_regions(RegionSet::concat(passing).regions),
            failing: merge_regions(RegionSet::concat(failing).regions),
        }
    }
}
