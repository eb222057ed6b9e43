//! Sample-vs-control contrast ("harmonic") signal.

/// Contrast score at one position.
///
/// `(s - c) * s / (c + 1)`: absolute excess scaled by the sample/control
/// ratio. The `+ 1` keeps the ratio finite where control is zero.
#[inline]
pub fn contrast_score(sample: f64, control: f64) -> f64 {
    (sample - control) * (sample / (control + 1.0))
}

/// Element-wise contrast of two smoothed signals of equal length.
///
/// Values may be negative; nothing is clamped.
///
/// # Panics
///
/// Panics if the two signals differ in length.
pub fn contrast(sample: &[f64], control: &[f64]) -> Vec<f64> {
    assert_eq!(
        sample.len(),
        control.len(),
        "sample and control signals must have equal length"
    );
    sample
        .iter()
        .zip(control)
        .map(|(&s, &c)| contrast_score(s, c))
        .collect()
}
