use super::{Effect, RenderContext};
use crate::{
    color::{Rgb, fill},
    math8::wave8,
};

/// Phase increment per step
const PHASE_STEP: f32 = 0.1;

/// All cells breathe together along a sine wave
#[derive(Debug, Clone, Copy)]
pub struct PulseEffect;

impl Effect for PulseEffect {
    const STEP: u32 = 1;

    #[allow(clippy::cast_precision_loss)]
    fn render(&self, ctx: &RenderContext<'_>, leds: &mut [Rgb]) {
        let level = wave8(ctx.step as f32 * PHASE_STEP);
        fill(leds, Rgb::new(level, level, level));
    }
}
