//! Peak records.

use std::fmt;

/// A local maximum of the contrast signal, before thresholding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePeak {
    /// Index into the contrast signal.
    pub position: usize,
    /// Contrast value at `position`.
    pub score: f64,
}

impl CandidatePeak {
    /// A maximum at `position` with contrast `score`.
    pub fn new(position: usize, score: f64) -> Self {
        Self { position, score }
    }

    /// Start of the anchor base, `position - width / 2`.
    ///
    /// Returns `None` when the maximum lies closer than `width / 2` to the
    /// chromosome start, where the anchor has no valid coordinate.
    #[inline]
    pub fn anchor_start(&self, width: usize) -> Option<u64> {
        (self.position as u64).checked_sub(width as u64 / 2)
    }

    /// Anchor the candidate on `chrom` as a single base placed `width / 2`
    /// before the maximum.
    ///
    /// Returns `None` when the anchor would start before position 0; see
    /// [`CandidatePeak::anchor_start`].
    pub fn into_peak(self, chrom: &str, width: usize) -> Option<Peak> {
        let start = self.anchor_start(width)?;
        Some(Peak {
            chrom: chrom.to_string(),
            start,
            end: start + 1,
            score: self.score,
        })
    }
}

/// A called peak, ready for output.
///
/// Always one base wide: `end == start + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Peak {
    /// Chromosome the peak was called on.
    pub chrom: String,
    /// 0-based anchor position.
    pub start: u64,
    /// Exclusive end, `start + 1`.
    pub end: u64,
    /// Contrast value at the underlying maximum.
    pub score: f64,
}

impl Peak {
    /// Chromosome name.
    #[inline]
    pub fn chrom(&self) -> &str {
        &self.chrom
    }
}

impl fmt::Display for Peak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t{}", self.chrom, self.start, self.end, self.score)
    }
}
