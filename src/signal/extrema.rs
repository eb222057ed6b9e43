//! Strict local maxima.
//!
//! Index `i` is a maximum when `signal[i]` is strictly greater than every
//! other value in `[i - order, i + order]`. Indices closer than `order` to
//! either edge are never reported, and any tie inside the window
//! disqualifies, so a flat plateau yields no maximum at all.

use crate::peak::CandidatePeak;

/// Ascending indices of strict local maxima.
///
/// Linear time: after examining `i`, the scan jumps past every index that
/// `i` already rules out, so each position is compared a bounded number of
/// times.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn strict_local_maxima(signal: &[f64], order: usize) -> Vec<usize> {
    let n = signal.len();
    let mut maxima = Vec::new();
    if order == 0 || n < 2 * order + 1 {
        return maxima;
    }

    let end = n - order;
    let mut i = order;
    while i < end {
        let value = signal[i];

        // First right neighbour that is not strictly smaller. Everything
        // between i and it is below signal[i] with i in range, so skip there.
        if let Some(j) = (i + 1..=i + order).find(|&j| !(signal[j] < value)) {
            i = j;
            continue;
        }

        if signal[i - order..i].iter().all(|&v| v < value) {
            maxima.push(i);
        }

        // The whole right window is below signal[i].
        i += order + 1;
    }

    maxima
}

/// Local maxima paired with their contrast score.
pub fn find_candidates(signal: &[f64], order: usize) -> Vec<CandidatePeak> {
    strict_local_maxima(signal, order)
        .into_iter()
        .map(|position| CandidatePeak::new(position, signal[position]))
        .collect()
}
