use embassy_time::Instant;

use crate::color::{BLACK, Rgb, fill};
use crate::config::{NUM_LEDS, Timings};
use crate::effect::RenderContext;
use crate::session::SessionState;

/// LED rendering engine
///
/// Maps the session state onto the strip at a fixed cadence. Rendering only
/// reads participant records, except for advancing automatic animations.
pub struct Renderer {
    timings: Timings,
    frame_buffer: [Rgb; NUM_LEDS],
}

impl Renderer {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            frame_buffer: [BLACK; NUM_LEDS],
        }
    }

    /// Render one frame if the render interval has elapsed
    ///
    /// Returns `true` if a new frame was produced.
    pub fn render(&mut self, now: Instant, state: &mut SessionState) -> bool {
        if !state.effect.begin_render(now, self.timings.render_interval) {
            return false;
        }

        for participant in state.participants.iter_mut() {
            participant.advance(now, &self.timings);
        }

        fill(&mut self.frame_buffer, BLACK);
        let ctx = RenderContext {
            now,
            step: state.effect.step(),
            participants: &state.participants,
            timings: &self.timings,
        };
        state.effect.slot().render(&ctx, &mut self.frame_buffer);
        state.effect.advance();

        true
    }

    /// Last rendered frame
    pub fn frame(&self) -> &[Rgb; NUM_LEDS] {
        &self.frame_buffer
    }
}
