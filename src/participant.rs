//! Participant records and their state machine
//!
//! Exactly two participants exist for the whole process lifetime. They are
//! stored in a fixed two-slot arena and reset in place, never reallocated.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::config::Timings;
use crate::dispatcher::EndpointId;
use crate::intent::PlayerIntent;

/// Identity of one of the two participant slots
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PlayerId {
    One = 1,
    Two = 2,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Parse a wire-level player number
    pub const fn from_raw(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Slot index in the arena
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Addressee of an intent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Player(PlayerId),
    /// Both participants (wire player `0`)
    All,
}

impl Target {
    /// Check if the target addresses the given participant
    pub fn includes(self, id: PlayerId) -> bool {
        match self {
            Self::Player(target) => target == id,
            Self::All => true,
        }
    }
}

/// Playback state of a participant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Disconnected,
    Connected,
    Ready,
    Playing,
    Paused,
    PausedByHeadset,
}

/// Source of the displayed progress while playing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// No playback has been started
    #[default]
    Idle,
    /// Progress is computed locally from the elapsed time since `anchor`
    Automatic { anchor: Instant },
    /// Progress is supplied by the client, last refreshed at `updated_at`
    Manual { updated_at: Instant },
}

/// Record of a single participant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Participant {
    pub id: PlayerId,
    pub state: PlayerState,
    pub connected: bool,
    pub progress: f32,
    /// Last accepted intent affecting this participant
    pub last_seen: Instant,
    pub mode: ProgressMode,
    /// Lookup key of the bound transport endpoint
    pub endpoint: Option<EndpointId>,
}

impl Participant {
    /// Create a disconnected participant
    pub const fn new(id: PlayerId) -> Self {
        Self {
            id,
            state: PlayerState::Disconnected,
            connected: false,
            progress: 0.0,
            last_seen: Instant::from_ticks(0),
            mode: ProgressMode::Idle,
            endpoint: None,
        }
    }

    /// Progress clamped to `[0, 1]`
    pub fn clamped_progress(&self) -> f32 {
        if self.progress.is_nan() {
            return 0.0;
        }
        self.progress.clamp(0.0, 1.0)
    }

    /// Force the participant into the disconnected state
    pub fn disconnect(&mut self) {
        self.state = PlayerState::Disconnected;
        self.connected = false;
        self.progress = 0.0;
        self.mode = ProgressMode::Idle;
        self.endpoint = None;
    }

    /// Apply an intent to the participant
    ///
    /// Returns the state the participant was in before the intent.
    pub fn apply(&mut self, intent: PlayerIntent, now: Instant, timings: &Timings) -> PlayerState {
        let previous = self.state;
        match intent {
            PlayerIntent::Heartbeat => {
                if self.connected {
                    self.last_seen = now;
                }
                return previous;
            }
            PlayerIntent::Ready { endpoint } => {
                self.reset_to_ready();
                if endpoint.is_some() {
                    self.endpoint = endpoint;
                }
            }
            PlayerIntent::Play => match self.state {
                PlayerState::Disconnected | PlayerState::Connected | PlayerState::Ready => {
                    self.state = PlayerState::Playing;
                    self.progress = 0.0;
                    self.mode = ProgressMode::Automatic { anchor: now };
                }
                PlayerState::Paused | PlayerState::PausedByHeadset => self.resume(now, timings),
                PlayerState::Playing => {}
            },
            PlayerIntent::Pause => {
                if self.state == PlayerState::Playing {
                    self.state = PlayerState::Paused;
                }
            }
            PlayerIntent::Stop => self.reset_to_ready(),
            PlayerIntent::HeadsetOff => {
                if matches!(self.state, PlayerState::Playing | PlayerState::Paused) {
                    self.state = PlayerState::PausedByHeadset;
                }
            }
            PlayerIntent::HeadsetOn => match self.state {
                PlayerState::PausedByHeadset => self.resume(now, timings),
                PlayerState::Disconnected => self.reset_to_ready(),
                _ => {}
            },
            PlayerIntent::SetProgress(progress) => {
                self.state = PlayerState::Playing;
                self.progress = progress;
                self.mode = ProgressMode::Manual { updated_at: now };
            }
        }

        if self.state != PlayerState::Disconnected {
            self.connected = true;
            self.last_seen = now;
        }
        previous
    }

    /// Check if the participant has been silent for longer than `timeout`
    pub fn is_expired(&self, now: Instant, timeout: Duration) -> bool {
        self.connected && now.saturating_duration_since(self.last_seen) > timeout
    }

    /// Check if a manually driven participant stopped receiving progress
    pub fn is_link_stale(&self, now: Instant, timings: &Timings) -> bool {
        let ProgressMode::Manual { updated_at } = self.mode else {
            return false;
        };
        self.connected
            && self.state == PlayerState::Playing
            && now.saturating_duration_since(updated_at) > timings.stale_link
    }

    /// Advance the automatic animation
    ///
    /// Does nothing in manual mode or once the animation window has closed.
    #[allow(clippy::cast_precision_loss)]
    pub fn advance(&mut self, now: Instant, timings: &Timings) {
        let ProgressMode::Automatic { anchor } = self.mode else {
            return;
        };
        if self.state != PlayerState::Playing {
            return;
        }
        let elapsed = now.saturating_duration_since(anchor);
        if elapsed >= timings.auto_animation_window {
            return;
        }
        let total = timings.auto_animation.as_millis().max(1) as f32;
        self.progress = (elapsed.as_millis() as f32 / total).min(1.0);
    }

    fn reset_to_ready(&mut self) {
        self.state = PlayerState::Ready;
        self.progress = 0.0;
        self.mode = ProgressMode::Idle;
    }

    /// Return to playing from a paused state, keeping the current progress
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn resume(&mut self, now: Instant, timings: &Timings) {
        self.state = PlayerState::Playing;
        self.mode = match self.mode {
            ProgressMode::Manual { .. } => ProgressMode::Manual { updated_at: now },
            ProgressMode::Automatic { .. } | ProgressMode::Idle => {
                let done_ms =
                    (self.clamped_progress() * timings.auto_animation.as_millis() as f32) as u64;
                let anchor = now
                    .checked_sub(Duration::from_millis(done_ms))
                    .unwrap_or(Instant::from_ticks(0));
                ProgressMode::Automatic { anchor }
            }
        };
    }
}

/// Fixed two-slot arena of participants
#[derive(Clone, Debug, PartialEq)]
pub struct Participants {
    slots: [Participant; 2],
}

impl Participants {
    pub const fn new() -> Self {
        Self {
            slots: [
                Participant::new(PlayerId::One),
                Participant::new(PlayerId::Two),
            ],
        }
    }

    pub fn get(&self, id: PlayerId) -> &Participant {
        &self.slots[id.index()]
    }

    pub fn get_mut(&mut self, id: PlayerId) -> &mut Participant {
        &mut self.slots[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Participant> {
        self.slots.iter_mut()
    }

    /// Apply an intent to every participant addressed by `target`
    pub fn apply(&mut self, target: Target, intent: PlayerIntent, now: Instant, timings: &Timings) {
        for participant in self.iter_mut().filter(|p| target.includes(p.id)) {
            let previous = participant.apply(intent, now, timings);
            if previous != participant.state {
                crate::log!(
                    "participant: player {} {:?} -> {:?}",
                    participant.id.as_u8(),
                    previous,
                    participant.state
                );
            }
        }
    }

    /// Disconnect every participant bound to `endpoint`
    ///
    /// Returns the ids of the disconnected participants.
    pub fn disconnect_endpoint(&mut self, endpoint: EndpointId) -> Vec<PlayerId, 2> {
        let mut disconnected = Vec::new();
        for participant in self.iter_mut().filter(|p| p.endpoint == Some(endpoint)) {
            participant.disconnect();
            let _ = disconnected.push(participant.id);
        }
        disconnected
    }
}

impl Default for Participants {
    fn default() -> Self {
        Self::new()
    }
}
