//! Core read types.
//!
//! Coordinates are 0-based and half-open (`[start, end)`), the BED convention.

use std::cmp::Ordering;
use std::fmt;

/// The genomic span of one aligned read.
///
/// Always non-empty: `end > start`. The fields are private so the only way
/// to build one is the checked [`ReadInterval::new`]:
///
/// ```compile_fail
/// let reversed = peaksense::ReadInterval { start: 5, end: 2 };
/// ```
///
/// ```
/// assert!(peaksense::ReadInterval::new(5, 2).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadInterval {
    start: u64,
    end: u64,
}

impl ReadInterval {
    /// Create an interval, returning `None` when `end <= start`.
    #[inline]
    pub fn new(start: u64, end: u64) -> Option<Self> {
        if end > start {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// 0-based inclusive start.
    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// 0-based exclusive end.
    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Returns the length of the interval.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Always false for a well-formed interval.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check whether a position lies inside the interval.
    #[inline]
    pub fn contains(&self, pos: u64) -> bool {
        self.start <= pos && pos < self.end
    }
}

impl fmt::Display for ReadInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.start, self.end)
    }
}

impl Ord for ReadInterval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then(self.end.cmp(&other.end))
    }
}

impl PartialOrd for ReadInterval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A read as produced by the reads reader, before quality filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRead {
    pub chrom: String,
    pub interval: ReadInterval,
    /// Mapping quality, `None` when the input carried no usable score column.
    pub mapq: Option<u8>,
}

impl AlignedRead {
    pub fn new(chrom: impl Into<String>, interval: ReadInterval, mapq: Option<u8>) -> Self {
        Self {
            chrom: chrom.into(),
            interval,
            mapq,
        }
    }

    #[inline]
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    #[inline]
    pub fn start(&self) -> u64 {
        self.interval.start()
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.interval.end()
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.interval.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.interval.is_empty()
    }
}

impl fmt::Display for AlignedRead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.chrom, self.interval)?;
        if let Some(mapq) = self.mapq {
            write!(f, "\t.\t{}", mapq)?;
        }
        Ok(())
    }
}
