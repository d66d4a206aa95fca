//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the `Effect` trait.

mod chase;
mod progress;
mod pulse;
mod rainbow;
mod ready_blink;
mod solid;

pub use chase::ChaseEffect;
pub use progress::ProgressEffect;
pub use pulse::PulseEffect;
pub use rainbow::RainbowEffect;
pub use ready_blink::ReadyBlinkEffect;
pub use solid::SolidEffect;

use embassy_time::{Duration, Instant};

use crate::{color::Rgb, config::Timings, participant::Participants};

const EFFECT_NAME_PROGRESS: &str = "progress";
const EFFECT_NAME_READY_BLINK: &str = "ready_blink";
const EFFECT_NAME_RAINBOW: &str = "rainbow";
const EFFECT_NAME_PULSE: &str = "pulse";
const EFFECT_NAME_CHASE: &str = "chase";
const EFFECT_NAME_SOLID: &str = "solid";

const EFFECT_ID_PROGRESS: u8 = 0;
const EFFECT_ID_READY_BLINK: u8 = 1;
const EFFECT_ID_RAINBOW: u8 = 2;
const EFFECT_ID_PULSE: u8 = 3;
const EFFECT_ID_CHASE: u8 = 4;
const EFFECT_ID_SOLID: u8 = 5;

const EFFECT_COUNT: u8 = 6;

/// Everything an effect may read while rendering a frame
pub struct RenderContext<'a> {
    pub now: Instant,
    /// Step counter of the effect selector
    pub step: u32,
    pub participants: &'a Participants,
    pub timings: &'a Timings,
}

impl RenderContext<'_> {
    /// Check if blinking indicators are in their lit half period
    pub fn blink_on(&self) -> bool {
        blink_on(self.now, self.timings.blink_half_period)
    }
}

/// Check if `now` falls in the lit half of a blink period
pub fn blink_on(now: Instant, half_period: Duration) -> bool {
    let half = half_period.as_millis().max(1);
    (now.as_millis() / half) % 2 == 1
}

pub trait Effect {
    /// Amount the step counter advances after each render
    const STEP: u32 = 0;

    /// Render a single frame onto a cleared strip
    fn render(&self, ctx: &RenderContext<'_>, leds: &mut [Rgb]);
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone, Copy)]
pub enum EffectSlot {
    Progress(ProgressEffect),
    ReadyBlink(ReadyBlinkEffect),
    Rainbow(RainbowEffect),
    Pulse(PulseEffect),
    Chase(ChaseEffect),
    Solid(SolidEffect),
}

/// Known effect ids, in round-robin order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum EffectId {
    #[default]
    Progress = EFFECT_ID_PROGRESS,
    ReadyBlink = EFFECT_ID_READY_BLINK,
    Rainbow = EFFECT_ID_RAINBOW,
    Pulse = EFFECT_ID_PULSE,
    Chase = EFFECT_ID_CHASE,
    Solid = EFFECT_ID_SOLID,
}

impl EffectId {
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_PROGRESS => Self::Progress,
            EFFECT_ID_READY_BLINK => Self::ReadyBlink,
            EFFECT_ID_RAINBOW => Self::Rainbow,
            EFFECT_ID_PULSE => Self::Pulse,
            EFFECT_ID_CHASE => Self::Chase,
            EFFECT_ID_SOLID => Self::Solid,
            _ => return None,
        })
    }

    /// Next effect in round-robin order
    pub const fn next(self) -> Self {
        match Self::from_raw((self as u8 + 1) % EFFECT_COUNT) {
            Some(id) => id,
            None => Self::Progress,
        }
    }

    pub const fn to_slot(self) -> EffectSlot {
        match self {
            Self::Progress => EffectSlot::Progress(ProgressEffect),
            Self::ReadyBlink => EffectSlot::ReadyBlink(ReadyBlinkEffect),
            Self::Rainbow => EffectSlot::Rainbow(RainbowEffect),
            Self::Pulse => EffectSlot::Pulse(PulseEffect),
            Self::Chase => EffectSlot::Chase(ChaseEffect),
            Self::Solid => EffectSlot::Solid(SolidEffect),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Progress => EFFECT_NAME_PROGRESS,
            Self::ReadyBlink => EFFECT_NAME_READY_BLINK,
            Self::Rainbow => EFFECT_NAME_RAINBOW,
            Self::Pulse => EFFECT_NAME_PULSE,
            Self::Chase => EFFECT_NAME_CHASE,
            Self::Solid => EFFECT_NAME_SOLID,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_PROGRESS => Some(Self::Progress),
            EFFECT_NAME_READY_BLINK => Some(Self::ReadyBlink),
            EFFECT_NAME_RAINBOW => Some(Self::Rainbow),
            EFFECT_NAME_PULSE => Some(Self::Pulse),
            EFFECT_NAME_CHASE => Some(Self::Chase),
            EFFECT_NAME_SOLID => Some(Self::Solid),
            _ => None,
        }
    }
}

impl EffectSlot {
    /// Render the current effect
    pub fn render(&self, ctx: &RenderContext<'_>, leds: &mut [Rgb]) {
        match self {
            Self::Progress(effect) => effect.render(ctx, leds),
            Self::ReadyBlink(effect) => effect.render(ctx, leds),
            Self::Rainbow(effect) => effect.render(ctx, leds),
            Self::Pulse(effect) => effect.render(ctx, leds),
            Self::Chase(effect) => effect.render(ctx, leds),
            Self::Solid(effect) => effect.render(ctx, leds),
        }
    }

    /// Step advance of the current effect
    pub const fn step(&self) -> u32 {
        match self {
            Self::Progress(_) => ProgressEffect::STEP,
            Self::ReadyBlink(_) => ReadyBlinkEffect::STEP,
            Self::Rainbow(_) => RainbowEffect::STEP,
            Self::Pulse(_) => PulseEffect::STEP,
            Self::Chase(_) => ChaseEffect::STEP,
            Self::Solid(_) => SolidEffect::STEP,
        }
    }

    /// Get the effect ID for external observation
    pub const fn id(&self) -> EffectId {
        match self {
            Self::Progress(_) => EffectId::Progress,
            Self::ReadyBlink(_) => EffectId::ReadyBlink,
            Self::Rainbow(_) => EffectId::Rainbow,
            Self::Pulse(_) => EffectId::Pulse,
            Self::Chase(_) => EffectId::Chase,
            Self::Solid(_) => EffectId::Solid,
        }
    }
}

/// Currently selected effect and its animation step
#[derive(Debug, Clone)]
pub struct EffectSelector {
    current: EffectSlot,
    step: u32,
    last_render: Option<Instant>,
}

impl EffectSelector {
    pub const fn new(effect: EffectId) -> Self {
        Self {
            current: effect.to_slot(),
            step: 0,
            last_render: None,
        }
    }

    pub const fn current(&self) -> EffectId {
        self.current.id()
    }

    pub const fn slot(&self) -> &EffectSlot {
        &self.current
    }

    pub const fn step(&self) -> u32 {
        self.step
    }

    /// Select an effect, resetting the step counter
    pub fn select(&mut self, effect: EffectId) {
        self.current = effect.to_slot();
        self.step = 0;
    }

    /// Advance to the next effect in round-robin order
    pub fn cycle(&mut self) -> EffectId {
        let next = self.current().next();
        self.select(next);
        next
    }

    /// Check if a render is due, recording `now` as the render time if so
    pub fn begin_render(&mut self, now: Instant, interval: Duration) -> bool {
        if let Some(last) = self.last_render {
            if now.saturating_duration_since(last) < interval {
                return false;
            }
        }
        self.last_render = Some(now);
        true
    }

    /// Advance the step counter after a render
    pub fn advance(&mut self) {
        self.step = self.step.wrapping_add(self.current.step());
    }
}

impl Default for EffectSelector {
    fn default() -> Self {
        Self::new(EffectId::Progress)
    }
}
