// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scaled-integer encoding for transform values.

/// Scale factor for scale, shear and angle.
pub const HIGH_PRECISION: i32 = 1024;
/// Scale factor for offset and position.
pub const LOW_PRECISION: i32 = 16;

/// Convert `value` to fixed point at `precision`, rounding to nearest.
///
/// Out-of-range values saturate to `i32::MIN`/`i32::MAX`; NaN maps to 0.
#[inline]
#[must_use]
pub fn float_to_fixed(value: f32, precision: i32) -> i32 {
    let scaled = (f64::from(value) * f64::from(precision)).round();
    if scaled.is_nan() {
        0
    } else if scaled >= f64::from(i32::MAX) {
        i32::MAX
    } else if scaled <= f64::from(i32::MIN) {
        i32::MIN
    } else {
        scaled as i32
    }
}

/// Inverse of [`float_to_fixed`].
#[inline]
#[must_use]
pub fn fixed_to_float(raw: i32, precision: i32) -> f32 {
    (f64::from(raw) / f64::from(precision)) as f32
}

/// [`float_to_fixed`] reinterpreted as a raw stream word.
#[inline]
#[must_use]
pub fn encode_word(value: f32, precision: i32) -> u32 {
    float_to_fixed(value, precision) as u32
}

/// [`fixed_to_float`] of a raw stream word.
#[inline]
#[must_use]
pub fn decode_word(word: u32, precision: i32) -> f32 {
    fixed_to_float(word as i32, precision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_values_survive() {
        assert_eq!(float_to_fixed(2.0, HIGH_PRECISION), 2048);
        assert_eq!(float_to_fixed(1.5, HIGH_PRECISION), 1536);
        assert_eq!(fixed_to_float(1536, HIGH_PRECISION), 1.5);
        assert_eq!(decode_word(encode_word(-3.25, LOW_PRECISION), LOW_PRECISION), -3.25);
    }

    #[test]
    fn rounds_to_nearest() {
        assert_eq!(float_to_fixed(0.04, LOW_PRECISION), 1);
        assert_eq!(float_to_fixed(-0.04, LOW_PRECISION), -1);
    }

    #[test]
    fn saturates_and_zeroes_nan() {
        assert_eq!(float_to_fixed(f32::MAX, HIGH_PRECISION), i32::MAX);
        assert_eq!(float_to_fixed(f32::NEG_INFINITY, HIGH_PRECISION), i32::MIN);
        assert_eq!(float_to_fixed(f32::NAN, HIGH_PRECISION), 0);
    }
}
