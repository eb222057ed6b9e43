//! Dense per-base depth from read intervals.
//!
//! Uses a difference array (+1 at `start`, -1 at `end`, then a prefix sum),
//! so building a chromosome is O(reads + length) regardless of read length.

use crate::interval::ReadInterval;

/// Sample and control depth for one chromosome. Both arrays have the same
/// length: the largest `end` over either collection.
///
/// Built by [`build_coverage`] or the length-checked
/// [`CoveragePair::from_depths`]; the arrays cannot be swapped out afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoveragePair {
    sample: Vec<u32>,
    control: Vec<u32>,
}

impl CoveragePair {
    /// Pair two precomputed depth arrays.
    ///
    /// Returns `None` if the lengths differ.
    pub fn from_depths(sample: Vec<u32>, control: Vec<u32>) -> Option<Self> {
        (sample.len() == control.len()).then_some(Self { sample, control })
    }

    /// Sample depth per position.
    #[inline]
    pub fn sample(&self) -> &[u32] {
        &self.sample
    }

    /// Control depth per position.
    #[inline]
    pub fn control(&self) -> &[u32] {
        &self.control
    }

    /// Shared length of both arrays.
    #[inline]
    pub fn len(&self) -> usize {
        self.sample.len()
    }

    /// True when neither side has any reads.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sample.is_empty()
    }

    /// Take both arrays as `(sample, control)`.
    pub fn into_parts(self) -> (Vec<u32>, Vec<u32>) {
        (self.sample, self.control)
    }
}

/// Largest `end` across both collections; 0 when both are empty.
pub fn shared_length(sample: &[ReadInterval], control: &[ReadInterval]) -> usize {
    sample
        .iter()
        .chain(control)
        .map(|iv| iv.end())
        .max()
        .unwrap_or(0) as usize
}

/// Depth array of length `len` for `intervals`.
///
/// Intervals extending past `len` are clipped.
pub fn depth_array(intervals: &[ReadInterval], len: usize) -> Vec<u32> {
    // One extra slot absorbs the decrement at `end == len`.
    let mut depth = vec![0u32; len + 1];

    for iv in intervals {
        let start = iv.start() as usize;
        if start >= len {
            continue;
        }
        let end = (iv.end() as usize).min(len);
        depth[start] = depth[start].wrapping_add(1);
        depth[end] = depth[end].wrapping_sub(1);
    }

    // Wrapping is exact: `end > start` for every interval, so every prefix
    // sum is a real, non-negative depth.
    let mut running = 0u32;
    for d in depth.iter_mut() {
        running = running.wrapping_add(*d);
        *d = running;
    }

    depth.truncate(len);
    depth
}

/// Build the sample/control depth pair for one chromosome.
///
/// An empty collection on either side yields an all-zero array of the shared
/// length.
pub fn build_coverage(sample: &[ReadInterval], control: &[ReadInterval]) -> CoveragePair {
    let len = shared_length(sample, control);
    CoveragePair {
        sample: depth_array(sample, len),
        control: depth_array(control, len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: u64, end: u64) -> ReadInterval {
        ReadInterval::new(start, end).unwrap()
    }

    /// Position-by-position reference.
    fn naive_depth(intervals: &[ReadInterval], len: usize) -> Vec<u32> {
        let mut depth = vec![0u32; len];
        for interval in intervals {
            for pos in interval.start()..interval.end().min(len as u64) {
                depth[pos as usize] += 1;
            }
        }
        depth
    }

    #[test]
    fn test_overlapping_reads() {
        let depth = depth_array(&[iv(0, 3), iv(2, 5)], 5);
        assert_eq!(depth, vec![1, 1, 2, 1, 1]);
    }

    #[test]
    fn test_shared_length_spans_both_sides() {
        let pair = build_coverage(&[iv(0, 4)], &[iv(6, 9)]);

        assert_eq!(pair.len(), 9);
        assert_eq!(pair.sample, vec![1, 1, 1, 1, 0, 0, 0, 0, 0]);
        assert_eq!(pair.control, vec![0, 0, 0, 0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_empty_side_is_all_zero() {
        let pair = build_coverage(&[], &[iv(2, 5)]);

        assert_eq!(pair.sample, vec![0; 5]);
        assert_eq!(pair.control, vec![0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_both_empty() {
        let pair = build_coverage(&[], &[]);
        assert!(pair.is_empty());
        assert!(pair.control.is_empty());
    }

    #[test]
    fn test_clipped_to_len() {
        assert_eq!(depth_array(&[iv(1, 10), iv(20, 30)], 4), vec![0, 1, 1, 1]);
    }

    #[test]
    fn test_matches_naive_accumulation() {
        let intervals = vec![
            iv(0, 100),
            iv(50, 51),
            iv(50, 150),
            iv(99, 101),
            iv(10, 20),
            iv(10, 20),
            iv(149, 150),
        ];
        let len = shared_length(&intervals, &[]);
        assert_eq!(len, 150);
        assert_eq!(depth_array(&intervals, len), naive_depth(&intervals, len));
    }

    #[test]
    fn test_from_depths_requires_equal_length() {
        let pair = CoveragePair::from_depths(vec![0, 1], vec![1, 0]).unwrap();
        assert_eq!(pair.sample(), &[0, 1]);
        assert_eq!(pair.control(), &[1, 0]);
        assert_eq!(pair.into_parts(), (vec![0, 1], vec![1, 0]));

        assert!(CoveragePair::from_depths(vec![0, 1], vec![1]).is_none());
        assert!(CoveragePair::from_depths(vec![], vec![0; 3]).is_none());
    }

    #[test]
    fn test_reversed_coordinates_never_reach_depth() {
        // Reversed and empty spans are rejected before they can wrap a depth
        assert!(ReadInterval::new(5, 2).is_none());
        assert!(ReadInterval::new(5, 5).is_none());

        let intervals: Vec<ReadInterval> = [(5, 2), (0, 8), (3, 3), (2, 6)]
            .into_iter()
            .filter_map(|(s, e)| ReadInterval::new(s, e))
            .collect();
        let pair = build_coverage(&intervals, &[]);

        assert_eq!(pair.sample(), &[1, 1, 2, 2, 2, 2, 1, 1]);
        assert!(pair.sample().iter().all(|&d| d as usize <= intervals.len()));
    }
}
