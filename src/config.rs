//! Timing constants and controller configuration.

use embassy_time::Duration;

use crate::button::{ButtonAction, ButtonBinding};
use crate::effect::EffectId;
use crate::participant::{PlayerId, Target};

/// Number of cells on the strip.
pub const NUM_LEDS: usize = 16;

/// Number of cells owned by each participant.
pub const BANK_LEDS: usize = 8;

/// Minimum time between two renders.
pub const RENDER_INTERVAL_MS: u64 = 100;

/// Half period of every blinking indicator.
pub const BLINK_HALF_PERIOD_MS: u64 = 500;

/// A connected participant silent for longer than this is disconnected.
pub const LIVENESS_TIMEOUT_MS: u64 = 5000;

/// Manual-mode silence after which the stale-link indicator is shown.
pub const STALE_LINK_MS: u64 = 15_000;

/// Time for the automatic animation to go from 0 to 1.
pub const AUTO_ANIMATION_MS: u64 = 5000;

/// The automatic animation stops advancing after this much time.
pub const AUTO_ANIMATION_WINDOW_MS: u64 = 6000;

/// Raw button level must be stable this long to be accepted.
pub const DEBOUNCE_DELAY_MS: u64 = 50;

/// A press held longer than this fires the long-press action.
pub const LONG_PRESS_TIME_MS: u64 = 1000;

/// Cadence of the cooperative poll loop.
pub const POLL_INTERVAL_MS: u64 = 10;

/// Time thresholds used across the controller
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    /// Minimum time between two renders
    pub render_interval: Duration,
    /// Half period of ready / stale-link / ready-blink indicators
    pub blink_half_period: Duration,
    /// Liveness timeout (strict inequality)
    pub liveness_timeout: Duration,
    /// Manual-mode silence that raises the stale-link indicator
    pub stale_link: Duration,
    /// Duration of the automatic 0..1 animation
    pub auto_animation: Duration,
    /// Window after which the automatic animation freezes
    pub auto_animation_window: Duration,
    /// Button debounce delay
    pub debounce: Duration,
    /// Button long-press threshold
    pub long_press: Duration,
    /// Poll loop cadence
    pub poll_interval: Duration,
}

impl Timings {
    pub const fn new() -> Self {
        Self {
            render_interval: Duration::from_millis(RENDER_INTERVAL_MS),
            blink_half_period: Duration::from_millis(BLINK_HALF_PERIOD_MS),
            liveness_timeout: Duration::from_millis(LIVENESS_TIMEOUT_MS),
            stale_link: Duration::from_millis(STALE_LINK_MS),
            auto_animation: Duration::from_millis(AUTO_ANIMATION_MS),
            auto_animation_window: Duration::from_millis(AUTO_ANIMATION_WINDOW_MS),
            debounce: Duration::from_millis(DEBOUNCE_DELAY_MS),
            long_press: Duration::from_millis(LONG_PRESS_TIME_MS),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the session controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub timings: Timings,
    /// Effect selected at startup
    pub effect: EffectId,
    /// Actions of the play/pause button
    pub play_pause_button: ButtonBinding,
    /// Actions of the effect/stop button
    pub effect_stop_button: ButtonBinding,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            timings: Timings::new(),
            effect: EffectId::Progress,
            play_pause_button: ButtonBinding {
                on_press: ButtonAction::TogglePlayback(Target::All),
                on_long_press: ButtonAction::Stop(Target::All),
            },
            effect_stop_button: ButtonBinding {
                on_press: ButtonAction::TogglePlayback(Target::Player(PlayerId::Two)),
                on_long_press: ButtonAction::Stop(Target::All),
            },
        }
    }
}
