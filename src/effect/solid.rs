use super::{Effect, RenderContext};
use crate::color::{Rgb, WHITE, fill};

/// Full white on every cell
#[derive(Debug, Clone, Copy)]
pub struct SolidEffect;

impl Effect for SolidEffect {
    fn render(&self, _ctx: &RenderContext<'_>, leds: &mut [Rgb]) {
        fill(leds, WHITE);
    }
}
