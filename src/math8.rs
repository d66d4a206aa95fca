/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// `scale8(255, x) == x` for every `x`, so full channels map exactly to the
/// requested level.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Map a unit fraction onto `0..=max`, rounding to the nearest step
///
/// The fraction is clamped to `[0, 1]`; `NaN` maps to zero.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn unit8(fraction: f32, max: u8) -> u8 {
    if fraction.is_nan() {
        return 0;
    }
    let scaled = libm::roundf(fraction.clamp(0.0, 1.0) * f32::from(max));
    scaled as u8
}

/// Sine wave mapped onto `1..=255`, centered at 128
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn wave8(phase: f32) -> u8 {
    (128.0 + 127.0 * libm::sinf(phase)) as u8
}
