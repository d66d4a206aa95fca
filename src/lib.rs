#![no_std]

#[cfg(feature = "esp32-log")]
macro_rules! log {
    ($($arg:tt)*) => {
        esp_println::println!($($arg)*)
    };
}

#[cfg(not(feature = "esp32-log"))]
macro_rules! log {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

pub(crate) use log;

pub mod button;
pub mod color;
pub mod config;
pub mod controller;
pub mod decoder;
pub mod dispatcher;
pub mod effect;
pub mod intent;
pub mod liveness;
pub mod math8;
pub mod participant;
pub mod renderer;
pub mod session;

pub use button::{Button, ButtonAction, ButtonBinding, ButtonEvent, Debouncer};
pub use config::{ControllerConfig, Timings};
pub use controller::{Controller, TickResult};
pub use decoder::{DecodeError, decode};
pub use dispatcher::{Command, DispatchError, Dispatcher, EndpointId, Transport};
pub use effect::{EffectId, EffectSelector, EffectSlot};
pub use intent::{Intent, PlayerIntent};
pub use liveness::LivenessMonitor;
pub use participant::{Participant, Participants, PlayerId, PlayerState, ProgressMode, Target};
pub use renderer::Renderer;
pub use session::{Session, SessionState};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// Writing a frame also latches it onto the strip.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
