//! Rainbow sweep across the whole strip

use super::{Effect, RenderContext};
use crate::color::{Hsv, Rgb, hsv2rgb};

/// Hue distance between neighbouring cells
const HUE_SPREAD: u32 = 16;

#[derive(Debug, Clone, Copy)]
pub struct RainbowEffect;

impl Effect for RainbowEffect {
    const STEP: u32 = 2;

    #[allow(clippy::cast_possible_truncation)]
    fn render(&self, ctx: &RenderContext<'_>, leds: &mut [Rgb]) {
        for (i, led) in leds.iter_mut().enumerate() {
            let hue = ctx.step.wrapping_add(i as u32 * HUE_SPREAD) as u8;
            *led = hsv2rgb(Hsv {
                hue,
                sat: 255,
                val: 255,
            });
        }
    }
}
