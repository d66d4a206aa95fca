//! Shared session state
//!
//! The two-slot participant table and the effect selector are mutated from
//! two contexts: the frame-arrival path of the transport and the poll loop.
//! Every access goes through a critical section so the renderer never sees a
//! torn participant record.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;
use heapless::Vec;

use crate::config::{ControllerConfig, Timings};
use crate::decoder::{DecodeError, decode};
use crate::dispatcher::{Command, EndpointId};
use crate::effect::{EffectId, EffectSelector};
use crate::intent::{Intent, PlayerIntent};
use crate::participant::{Participant, Participants, PlayerId, PlayerState, Target};

/// Outbound commands produced by a session operation
pub type Commands = Vec<(Command, PlayerId), 2>;

/// State guarded by the session lock
#[derive(Debug, Clone)]
pub struct SessionState {
    pub participants: Participants,
    pub effect: EffectSelector,
}

/// Lock-protected session shared between the transport and the poll loop
pub struct Session {
    state: Mutex<RefCell<SessionState>>,
    timings: Timings,
}

impl Session {
    /// Create a session with both participants disconnected
    pub const fn new(timings: Timings, effect: EffectId) -> Self {
        Self {
            state: Mutex::new(RefCell::new(SessionState {
                participants: Participants::new(),
                effect: EffectSelector::new(effect),
            })),
            timings,
        }
    }

    pub fn with_config(config: &ControllerConfig) -> Self {
        Self::new(config.timings, config.effect)
    }

    pub const fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Run `f` with exclusive access to the session state
    pub fn lock<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        critical_section::with(|cs| {
            let mut state = self.state.borrow(cs).borrow_mut();
            f(&mut state)
        })
    }

    /// Copy of a participant record
    pub fn snapshot(&self, id: PlayerId) -> Participant {
        self.lock(|state| *state.participants.get(id))
    }

    /// Currently selected effect
    pub fn effect(&self) -> EffectId {
        self.lock(|state| state.effect.current())
    }

    /// Decode and apply one inbound frame
    ///
    /// Malformed frames are logged and dropped without changing any state.
    pub fn handle_frame(
        &self,
        endpoint: EndpointId,
        frame: &str,
        now: Instant,
    ) -> Result<Intent, DecodeError> {
        match decode(frame, endpoint) {
            Ok(intent) => {
                self.apply(intent, now);
                Ok(intent)
            }
            Err(e) => {
                crate::log!(
                    "session: dropped frame from {}: {} ({})",
                    endpoint, e, frame
                );
                Err(e)
            }
        }
    }

    /// Apply a decoded intent
    pub fn apply(&self, intent: Intent, now: Instant) {
        self.lock(|state| match intent {
            Intent::Player(target, player_intent) => {
                state
                    .participants
                    .apply(target, player_intent, now, &self.timings);
            }
            Intent::CycleEffect => {
                let effect = state.effect.cycle();
                crate::log!("session: effect changed to {}", effect.as_str());
            }
        });
    }

    /// Handle a transport-reported disconnection
    ///
    /// Takes effect immediately, whatever state the bound participant is in.
    pub fn handle_disconnect(&self, endpoint: EndpointId) -> Vec<PlayerId, 2> {
        let disconnected = self.lock(|state| state.participants.disconnect_endpoint(endpoint));
        for id in &disconnected {
            crate::log!(
                "session: player {} disconnected (endpoint {})",
                id.as_u8(),
                endpoint
            );
        }
        disconnected
    }

    /// Pause playing participants, resume paused ones and start idle ones
    ///
    /// Participants paused by their headset are left untouched and get no
    /// command. Returns the commands to broadcast to the clients.
    pub fn toggle_playback(&self, target: Target, now: Instant) -> Commands {
        self.lock(|state| {
            let participants = &mut state.participants;
            let mut commands = Commands::new();
            for id in PlayerId::ALL.into_iter().filter(|id| target.includes(*id)) {
                let (intent, command) = match participants.get(id).state {
                    PlayerState::Playing => (PlayerIntent::Pause, Command::Pause),
                    PlayerState::Paused | PlayerState::Ready | PlayerState::Disconnected => {
                        (PlayerIntent::Play, Command::Play)
                    }
                    PlayerState::PausedByHeadset | PlayerState::Connected => continue,
                };
                let addressee = Target::Player(id);
                participants.apply(addressee, intent, now, &self.timings);
                let _ = commands.push((command, id));
            }
            commands
        })
    }

    /// Stop the targeted participants and return them to ready
    pub fn stop(&self, target: Target, now: Instant) -> Commands {
        self.apply(Intent::Player(target, PlayerIntent::Stop), now);
        PlayerId::ALL
            .into_iter()
            .filter(|id| target.includes(*id))
            .map(|id| (Command::Stop, id))
            .collect()
    }
}
