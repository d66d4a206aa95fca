use super::{Effect, RenderContext};
use crate::color::{Rgb, WHITE};

/// A single white cell running along the strip
#[derive(Debug, Clone, Copy)]
pub struct ChaseEffect;

impl Effect for ChaseEffect {
    const STEP: u32 = 1;

    fn render(&self, ctx: &RenderContext<'_>, leds: &mut [Rgb]) {
        if leds.is_empty() {
            return;
        }
        let position = ctx.step as usize % leds.len();
        leds[position] = WHITE;
    }
}
