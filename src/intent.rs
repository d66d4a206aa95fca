//! Decoded instructions
//!
//! Everything that can change the session, whatever its source (inbound
//! frame or physical button), is expressed as an [`Intent`].

use crate::dispatcher::EndpointId;
use crate::participant::{PlayerId, Target};

/// Instruction addressed to one or both participants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerIntent {
    /// Refresh liveness only
    Heartbeat,
    /// Participant is ready, optionally binding the sending endpoint
    Ready { endpoint: Option<EndpointId> },
    /// Start (or resume) playback with the local automatic animation
    Play,
    /// Pause playback
    Pause,
    /// Stop playback and go back to ready
    Stop,
    /// Headset was put back on
    HeadsetOn,
    /// Headset was taken off
    HeadsetOff,
    /// Externally supplied progress in `[0, 1]` (manual mode)
    SetProgress(f32),
}

/// A decoded, validated instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Change one or both participant records
    Player(Target, PlayerIntent),
    /// Advance the effect selector to the next effect
    CycleEffect,
}

impl Intent {
    /// Intent addressed to a single participant
    pub const fn player(id: PlayerId, intent: PlayerIntent) -> Self {
        Self::Player(Target::Player(id), intent)
    }

    /// Intent addressed to both participants
    pub const fn broadcast(intent: PlayerIntent) -> Self {
        Self::Player(Target::All, intent)
    }
}
