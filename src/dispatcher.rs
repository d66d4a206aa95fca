//! Outbound command dispatching
//!
//! Control commands are broadcast identically to every endpoint the
//! transport reports as connected. There is no queue and no retry.

use core::fmt;

use heapless::{String, Vec};
use serde::Serialize;

use crate::participant::PlayerId;

/// Identifier the transport assigns to a connected endpoint
pub type EndpointId = u32;

/// Maximum number of endpoints the transport may report at once
pub const MAX_ENDPOINTS: usize = 8;

/// Capacity of an encoded outbound frame
pub const FRAME_CAPACITY: usize = 48;

/// Bidirectional message transport
///
/// Implement this trait on top of the platform's websocket server.
pub trait Transport {
    type Error: fmt::Debug;

    /// Endpoints that are currently connected
    fn endpoints(&self) -> Vec<EndpointId, MAX_ENDPOINTS>;

    /// Send one text frame to one endpoint
    fn send_text(&mut self, endpoint: EndpointId, frame: &str) -> Result<(), Self::Error>;
}

/// Commands sent back to the clients
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Play,
    Pause,
    Stop,
}

impl Command {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
        }
    }
}

#[derive(Serialize)]
struct CommandFrame {
    command: Command,
    player: u8,
}

/// Errors that can occur while dispatching a command
#[derive(Debug, PartialEq, Eq)]
pub enum DispatchError<E> {
    /// No endpoint is connected, the command is not delivered
    NoEndpoints,
    /// The frame did not fit the encode buffer
    Encode,
    /// Every endpoint rejected the frame, carries the last error
    Send(E),
}

impl<E: fmt::Debug> fmt::Display for DispatchError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoEndpoints => write!(f, "no connected endpoints"),
            Self::Encode => write!(f, "failed to encode command frame"),
            Self::Send(e) => write!(f, "send failed: {:?}", e),
        }
    }
}

/// Encode an outbound command frame
pub fn encode_command(
    command: Command,
    player: PlayerId,
) -> Result<String<FRAME_CAPACITY>, serde_json_core::ser::Error> {
    serde_json_core::to_string(&CommandFrame {
        command,
        player: player.as_u8(),
    })
}

/// Broadcasts control commands over a [`Transport`]
pub struct Dispatcher<T: Transport> {
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Broadcast `command` for `player` to every connected endpoint
    ///
    /// Returns the number of endpoints the frame was delivered to.
    pub fn send(
        &mut self,
        command: Command,
        player: PlayerId,
    ) -> Result<usize, DispatchError<T::Error>> {
        let endpoints = self.transport.endpoints();
        if endpoints.is_empty() {
            return Err(DispatchError::NoEndpoints);
        }
        let frame = encode_command(command, player).map_err(|_| DispatchError::Encode)?;

        let mut delivered = 0;
        let mut last_error = None;
        for endpoint in endpoints {
            match self.transport.send_text(endpoint, frame.as_str()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    crate::log!("dispatcher: endpoint {} rejected frame: {:?}", endpoint, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if delivered == 0 => Err(DispatchError::Send(e)),
            _ => Ok(delivered),
        }
    }

    /// Broadcast and log the outcome, swallowing errors
    pub fn send_logged(&mut self, command: Command, player: PlayerId) {
        match self.send(command, player) {
            Ok(delivered) => {
                crate::log!(
                    "dispatcher: sent '{}' for player {} to {} endpoints",
                    command.as_str(),
                    player.as_u8(),
                    delivered
                );
            }
            Err(e) => {
                crate::log!(
                    "dispatcher: '{}' for player {} not delivered: {}",
                    command.as_str(),
                    player.as_u8(),
                    e
                );
            }
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
