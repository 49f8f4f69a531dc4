//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Sanitize a caller-supplied frame delta: negative or non-finite values become zero.
#[must_use]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.max(0.0) } else { 0.0 }
}

/// Clamp a gauge value into `[0, max]`, mapping NaN to zero.
#[must_use]
pub fn clamp_gauge(value: f32, max: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}

/// Convert seconds to whole milliseconds, saturating at the `u32` range.
#[must_use]
pub fn secs_to_millis(secs: f32) -> u32 {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    let millis = (f64::from(secs) * 1_000.0).round();
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    cast::<f64, u32>(millis.min(max)).unwrap_or(u32::MAX)
}

/// Convert a small unsigned integer to f32 without a bare `as` cast.
#[must_use]
pub fn u32_to_f32(value: u32) -> f32 {
    cast::<u32, f32>(value).unwrap_or(0.0)
}

/// Widen a counter to f64 for averaging.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(f64::MAX)
}

/// Percentage of `part` over `whole`, zero when `whole` is zero.
#[must_use]
pub fn ratio_pct(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let part = cast::<u64, f64>(part).unwrap_or(0.0);
    let whole = cast::<u64, f64>(whole).unwrap_or(1.0);
    part / whole * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_negative_and_non_finite() {
        assert!((sanitize_dt(-0.5) - 0.0).abs() < f32::EPSILON);
        assert!((sanitize_dt(f32::NAN) - 0.0).abs() < f32::EPSILON);
        assert!((sanitize_dt(f32::INFINITY) - 0.0).abs() < f32::EPSILON);
        assert!((sanitize_dt(0.25) - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn gauges_clamp_both_ends() {
        assert!((clamp_gauge(135.0, 100.0) - 100.0).abs() < f32::EPSILON);
        assert!((clamp_gauge(-3.0, 100.0) - 0.0).abs() < f32::EPSILON);
        assert!((clamp_gauge(f32::NAN, 100.0) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn millis_round_and_saturate() {
        assert_eq!(secs_to_millis(1.2345), 1_235);
        assert_eq!(secs_to_millis(-1.0), 0);
        assert_eq!(secs_to_millis(f32::MAX), u32::MAX);
    }

    #[test]
    fn ratio_handles_zero_denominator() {
        assert!((ratio_pct(1, 0) - 0.0).abs() < f64::EPSILON);
        assert!((ratio_pct(1, 4) - 25.0).abs() < f64::EPSILON);
    }
}
