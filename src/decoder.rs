//! Inbound frame decoding
//!
//! Converts a text frame received from an endpoint into an [`Intent`].
//! Supported shapes, tried in order:
//!
//! 1. `{"command": "...", "player": 0|1|2}`
//! 2. `{"message": "ledN:V"}`
//! 3. `{"player": 1|2, "status": "...", "progress": 0.0..1.0}` (legacy)
//! 4. plain text `ledN:V` or a bare command word such as `on1`

use core::fmt;

use serde::Deserialize;

use crate::dispatcher::EndpointId;
use crate::intent::{Intent, PlayerIntent};
use crate::participant::{PlayerId, Target};

const SHORTHAND_PREFIX: &str = "led";
const SHORTHAND_SEPARATOR: char = ':';
const MAX_PERCENT: i32 = 100;

/// Reasons a frame produced no intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Frame looked like JSON but could not be parsed
    Json,
    /// Unknown command word
    UnknownCommand,
    /// Legacy frame without a `status` field
    MissingStatus,
    /// Unknown legacy status
    UnknownStatus,
    /// Legacy frame without a `player` field
    MissingPlayer,
    /// Player id outside of the accepted set
    InvalidPlayer(i32),
    /// `ledN:V` frame with non-numeric parts
    InvalidShorthand,
    /// `ledN:V` frame with N outside {1, 2} or V outside [0, 100]
    ShorthandOutOfRange { player: i32, value: i32 },
    /// Legacy progress is not a number
    InvalidProgress,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Json => write!(f, "malformed JSON"),
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::MissingStatus => write!(f, "missing status"),
            Self::UnknownStatus => write!(f, "unknown status"),
            Self::MissingPlayer => write!(f, "missing player id"),
            Self::InvalidPlayer(id) => write!(f, "invalid player id {}", id),
            Self::InvalidShorthand => write!(f, "malformed led command"),
            Self::ShorthandOutOfRange { player, value } => {
                write!(
                    f,
                    "led command out of range: player={}, value={}",
                    player, value
                )
            }
            Self::InvalidProgress => write!(f, "invalid progress value"),
        }
    }
}

#[derive(Deserialize)]
struct RawFrame<'a> {
    #[serde(borrow)]
    command: Option<&'a str>,
    player: Option<i32>,
    #[serde(borrow)]
    message: Option<&'a str>,
    #[serde(borrow)]
    status: Option<&'a str>,
    progress: Option<f32>,
}

/// Action named by a command word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Heartbeat,
    Ready,
    Play,
    Pause,
    Stop,
    HeadsetOn,
    HeadsetOff,
    CycleEffect,
}

impl Verb {
    const fn into_intent(self, target: Target) -> Intent {
        let intent = match self {
            Self::CycleEffect => return Intent::CycleEffect,
            Self::Heartbeat => PlayerIntent::Heartbeat,
            Self::Ready => PlayerIntent::Ready { endpoint: None },
            Self::Play => PlayerIntent::Play,
            Self::Pause => PlayerIntent::Pause,
            Self::Stop => PlayerIntent::Stop,
            Self::HeadsetOn => PlayerIntent::HeadsetOn,
            Self::HeadsetOff => PlayerIntent::HeadsetOff,
        };
        Intent::Player(target, intent)
    }
}

/// Parse a command word, returning the player embedded in it (if any)
fn parse_command_word(word: &str) -> Option<(Verb, Option<PlayerId>)> {
    Some(match word {
        "heartbeat" => (Verb::Heartbeat, None),
        "ready" => (Verb::Ready, None),
        "play" => (Verb::Play, None),
        "pause" => (Verb::Pause, None),
        "stop" => (Verb::Stop, None),
        "on" => (Verb::HeadsetOn, None),
        "off" => (Verb::HeadsetOff, None),
        "effect" => (Verb::CycleEffect, None),
        "on1" | "ready1" => (Verb::Ready, Some(PlayerId::One)),
        "on2" | "ready2" => (Verb::Ready, Some(PlayerId::Two)),
        "play1" => (Verb::Play, Some(PlayerId::One)),
        "play2" => (Verb::Play, Some(PlayerId::Two)),
        "pause1" => (Verb::Pause, Some(PlayerId::One)),
        "pause2" => (Verb::Pause, Some(PlayerId::Two)),
        "stop1" => (Verb::Stop, Some(PlayerId::One)),
        "stop2" => (Verb::Stop, Some(PlayerId::Two)),
        "off1" => (Verb::HeadsetOff, Some(PlayerId::One)),
        "off2" => (Verb::HeadsetOff, Some(PlayerId::Two)),
        _ => return None,
    })
}

/// Resolve the `player` field of a structured command
///
/// A missing field or `0` addresses both participants.
fn parse_target(player: Option<i32>) -> Result<Target, DecodeError> {
    match player {
        None | Some(0) => Ok(Target::All),
        Some(raw) => PlayerId::from_raw(raw)
            .map(Target::Player)
            .ok_or(DecodeError::InvalidPlayer(raw)),
    }
}

fn command_intent(word: &str, player: Option<i32>) -> Result<Intent, DecodeError> {
    let (verb, embedded) = parse_command_word(word).ok_or(DecodeError::UnknownCommand)?;
    let target = match (verb, embedded) {
        (Verb::CycleEffect, _) => Target::All,
        (_, Some(id)) => Target::Player(id),
        (_, None) => parse_target(player)?,
    };
    Ok(verb.into_intent(target))
}

/// Check if the text has the `ledN:V` shape, valid or not
pub fn is_shorthand(text: &str) -> bool {
    text.starts_with(SHORTHAND_PREFIX) && text.contains(SHORTHAND_SEPARATOR)
}

/// Parse a plain decimal integer
///
/// Only ASCII digits with an optional leading `-` are accepted, without
/// leading zeros, whitespace or a `+` sign.
fn parse_integer(text: &str) -> Option<i32> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    text.parse().ok()
}

/// Parse a `ledN:V` shorthand into the player and percentage
///
/// Values out of range are rejected, never clamped.
pub fn parse_shorthand(text: &str) -> Result<(PlayerId, u8), DecodeError> {
    let rest = text
        .trim()
        .strip_prefix(SHORTHAND_PREFIX)
        .ok_or(DecodeError::InvalidShorthand)?;
    let (player, value) = rest
        .split_once(SHORTHAND_SEPARATOR)
        .ok_or(DecodeError::InvalidShorthand)?;
    let player = parse_integer(player).ok_or(DecodeError::InvalidShorthand)?;
    let value = parse_integer(value).ok_or(DecodeError::InvalidShorthand)?;

    let out_of_range = DecodeError::ShorthandOutOfRange { player, value };
    let id = PlayerId::from_raw(player).ok_or(out_of_range)?;
    if !(0..=MAX_PERCENT).contains(&value) {
        return Err(out_of_range);
    }
    let percent = u8::try_from(value).map_err(|_| out_of_range)?;
    Ok((id, percent))
}

fn shorthand_intent(text: &str) -> Result<Intent, DecodeError> {
    let (id, percent) = parse_shorthand(text)?;
    Ok(Intent::player(
        id,
        PlayerIntent::SetProgress(f32::from(percent) / 100.0),
    ))
}

fn legacy_intent(frame: &RawFrame<'_>, endpoint: EndpointId) -> Result<Intent, DecodeError> {
    let raw = frame.player.ok_or(DecodeError::MissingPlayer)?;
    let id = PlayerId::from_raw(raw).ok_or(DecodeError::InvalidPlayer(raw))?;
    let status = frame.status.ok_or(DecodeError::MissingStatus)?;

    let intent = match status {
        "ready" => PlayerIntent::Ready {
            endpoint: Some(endpoint),
        },
        "playing" => match frame.progress {
            Some(progress) if progress.is_nan() => return Err(DecodeError::InvalidProgress),
            Some(progress) => PlayerIntent::SetProgress(progress.clamp(0.0, 1.0)),
            None => PlayerIntent::Play,
        },
        "paused" => PlayerIntent::Pause,
        "stopped" => PlayerIntent::Stop,
        "heartbeat" => PlayerIntent::Heartbeat,
        _ => return Err(DecodeError::UnknownStatus),
    };
    Ok(Intent::player(id, intent))
}

fn decode_json(text: &str, endpoint: EndpointId) -> Result<Intent, DecodeError> {
    let (frame, _) =
        serde_json_core::from_str::<RawFrame<'_>>(text).map_err(|_| DecodeError::Json)?;

    if let Some(command) = frame.command {
        return command_intent(command.trim(), frame.player);
    }
    if let Some(message) = frame.message {
        let message = message.trim();
        if is_shorthand(message) {
            return shorthand_intent(message);
        }
    }
    legacy_intent(&frame, endpoint)
}

/// Decode one inbound frame received from `endpoint`
pub fn decode(frame: &str, endpoint: EndpointId) -> Result<Intent, DecodeError> {
    let text = frame.trim();
    if text.starts_with('{') {
        return decode_json(text, endpoint);
    }
    if is_shorthand(text) {
        return shorthand_intent(text);
    }
    command_intent(text, None)
}
