//! Single-cell status indicator per participant

use super::{Effect, RenderContext};
use crate::{
    color::{GREEN, PURPLE, Rgb},
    participant::{PlayerId, PlayerState},
};

/// Representative cell of each bank
const INDICATOR_CELLS: [usize; 2] = [3, 11];

#[derive(Debug, Clone, Copy)]
pub struct ReadyBlinkEffect;

impl ReadyBlinkEffect {
    const fn indicator(id: PlayerId) -> usize {
        INDICATOR_CELLS[id.index()]
    }
}

impl Effect for ReadyBlinkEffect {
    fn render(&self, ctx: &RenderContext<'_>, leds: &mut [Rgb]) {
        if !ctx.blink_on() {
            return;
        }
        for participant in ctx.participants.iter() {
            let color = match participant.state {
                PlayerState::Ready => GREEN,
                PlayerState::Disconnected | PlayerState::PausedByHeadset => PURPLE,
                _ => continue,
            };
            if let Some(led) = leds.get_mut(Self::indicator(participant.id)) {
                *led = color;
            }
        }
    }
}
