//! Moving-average smoothing.

/// Mean of each run of `window` consecutive depths ("valid" convolution with
/// a box kernel).
///
/// Output length is `depth.len() - window + 1`; empty when `window` is 0 or
/// longer than the input. The running sum is kept as an integer, so results
/// do not drift along long chromosomes and `window == 1` reproduces the input
/// exactly.
pub fn moving_average(depth: &[u32], window: usize) -> Vec<f64> {
    if window == 0 || window > depth.len() {
        return Vec::new();
    }

    let out_len = depth.len() - window + 1;
    let mut smoothed = Vec::with_capacity(out_len);
    let divisor = window as f64;

    let mut sum: u64 = depth[..window].iter().map(|&d| d as u64).sum();
    smoothed.push(sum as f64 / divisor);

    for i in 1..out_len {
        sum = sum + depth[i + window - 1] as u64 - depth[i - 1] as u64;
        smoothed.push(sum as f64 / divisor);
    }

    smoothed
}
