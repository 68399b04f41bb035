//! Numeric helpers shared by the analyzers.

/// Floor substituted for zero power before taking a logarithm, so silent
/// bands report a finite dB value (-100 dB) instead of -inf.
pub const DB_POWER_FLOOR: f32 = 1e-10;

/// Convert a linear power value to decibels with [`DB_POWER_FLOOR`] applied.
#[inline]
pub fn power_db(power: f32) -> f32 {
    10.0 * power.max(DB_POWER_FLOOR).log10()
}

/// Median of a slice. Returns `None` for an empty slice.
///
/// Even-length input returns the mean of the two central values. NaN
/// values sort as equal to everything, so callers should filter them out
/// when they matter.
pub fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Sub-bin offset of a peak by parabolic interpolation.
///
/// Fits a parabola through `(left, center, right)` sampled at -1, 0, +1
/// and returns the abscissa of its vertex. For a true local maximum the
/// offset lies in [-0.5, 0.5]; the result is clamped to that range so a
/// flat plateau (possible with tied magnitudes) cannot push the refined
/// peak outside the bin.
#[inline]
pub fn parabolic_offset(left: f32, center: f32, right: f32) -> f32 {
    let denom = left - 2.0 * center + right;
    if denom.abs() < f32::EPSILON {
        0.0
    } else {
        (0.5 * (left - right) / denom).clamp(-0.5, 0.5)
    }
}
