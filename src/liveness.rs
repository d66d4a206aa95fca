//! Liveness monitoring
//!
//! Participants that stop sending intents are forced into the disconnected
//! state. Timeouts are evaluated by polling, there are no timers.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::participant::{Participants, PlayerId};

/// Disconnects participants silent for longer than the timeout
#[derive(Debug, Clone, Copy)]
pub struct LivenessMonitor {
    timeout: Duration,
}

impl LivenessMonitor {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Disconnect every expired participant
    ///
    /// A participant expires once `now - last_seen` is strictly greater than
    /// the timeout. Returns the ids of the participants that timed out.
    pub fn check(&self, participants: &mut Participants, now: Instant) -> Vec<PlayerId, 2> {
        let mut expired = Vec::new();
        for participant in participants.iter_mut() {
            if participant.is_expired(now, self.timeout) {
                participant.disconnect();
                crate::log!("liveness: player {} timed out", participant.id.as_u8());
                let _ = expired.push(participant.id);
            }
        }
        expired
    }
}
