//! Per-participant progress bars
//!
//! Participant 1 owns the first bank, filled left to right in blue.
//! Participant 2 owns the second bank, filled from the far end in red.
//! The boundary cell is lit proportionally to the fractional remainder.

use super::{Effect, RenderContext};
use crate::{
    color::{BLACK, BLUE, GREEN, ORANGE, RED, Rgb, dim},
    config::BANK_LEDS,
    math8::unit8,
    participant::{Participant, PlayerId, PlayerState},
};

/// Level of a playing participant's cells
const PLAYING_LEVEL: u8 = 255;
/// Level of a paused participant's cells
const PAUSED_LEVEL: u8 = 64;

/// Strip index of the `k`-th cell of a participant's bank
fn bank_index(id: PlayerId, k: usize, len: usize) -> usize {
    match id {
        PlayerId::One => k,
        PlayerId::Two => len - 1 - k,
    }
}

/// Color of a participant's bank
const fn bank_color(id: PlayerId) -> Rgb {
    match id {
        PlayerId::One => BLUE,
        PlayerId::Two => RED,
    }
}

/// Number of fully lit cells and level of the boundary cell
///
/// The boundary level is `round(frac * level)`, zero when the bar ends on a
/// cell edge or the bank is full.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar_levels(progress: f32, level: u8) -> (usize, u8) {
    let total = progress * BANK_LEDS as f32;
    let full = (libm::floorf(total) as usize).min(BANK_LEDS);
    if full >= BANK_LEDS {
        return (BANK_LEDS, 0);
    }
    let fraction = total - full as f32;
    (full, unit8(fraction, level))
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressEffect;

impl ProgressEffect {
    fn render_bank(ctx: &RenderContext<'_>, participant: &Participant, leds: &mut [Rgb]) {
        let id = participant.id;
        let len = leds.len();
        let bank = BANK_LEDS.min(len);
        let mut set = |k: usize, color: Rgb| {
            leds[bank_index(id, k, len)] = color;
        };

        if participant.is_link_stale(ctx.now, ctx.timings) {
            let color = if ctx.blink_on() { ORANGE } else { BLACK };
            (0..bank).for_each(|k| set(k, color));
            return;
        }

        let level = match participant.state {
            PlayerState::Playing => PLAYING_LEVEL,
            PlayerState::Paused | PlayerState::PausedByHeadset => PAUSED_LEVEL,
            PlayerState::Ready => {
                if ctx.blink_on() {
                    (0..bank).for_each(|k| set(k, GREEN));
                }
                return;
            }
            PlayerState::Disconnected | PlayerState::Connected => return,
        };

        let hue = bank_color(id);
        let (full, boundary) = bar_levels(participant.clamped_progress(), level);
        for k in 0..full.min(bank) {
            set(k, dim(hue, level));
        }
        if boundary > 0 && full < bank {
            set(full, dim(hue, boundary));
        }
    }
}

impl Effect for ProgressEffect {
    fn render(&self, ctx: &RenderContext<'_>, leds: &mut [Rgb]) {
        for participant in ctx.participants.iter() {
            Self::render_bank(ctx, participant, leds);
        }
    }
}
