//! Contrast-threshold filter for candidate maxima.
//!
//! A candidate survives when its contrast score is at least the threshold.
//! The comparison always uses the raw score; the reduction percentage in
//! [`FilterReport`] is informational and never feeds back into it.

use crate::peak::CandidatePeak;
use std::fmt;

/// Candidate counts before and after thresholding one chromosome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Candidates entering the filter.
    pub before: usize,
    /// Candidates kept.
    pub after: usize,
}

impl FilterReport {
    /// Number of discarded candidates.
    pub fn discarded(&self) -> usize {
        self.before - self.after
    }

    /// `(1 - after / before) * 100`, unrounded. `None` without candidates.
    pub fn reduction_percent(&self) -> Option<f64> {
        if self.before == 0 {
            None
        } else {
            Some((1.0 - self.after as f64 / self.before as f64) * 100.0)
        }
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} peaks", self.before, self.after)?;
        // Rounding is for display only
        if let Some(pct) = self.reduction_percent() {
            write!(f, " ({:.2}% reduction)", pct)?;
        }
        Ok(())
    }
}

/// Keep candidates whose score is at least `threshold`, preserving order.
///
/// Returns the kept candidates with a [`FilterReport`] of the counts. An
/// empty input gives an empty output and a report with no reduction
/// percentage.
pub fn filter_candidates(
    candidates: Vec<CandidatePeak>,
    threshold: f64,
) -> (Vec<CandidatePeak>, FilterReport) {
    let before = candidates.len();
    let kept: Vec<CandidatePeak> = candidates
        .into_iter()
        .filter(|c| c.score >= threshold)
        .collect();
    let report = FilterReport {
        before,
        after: kept.len(),
    };
    (kept, report)
}
