//! Protocol module - JSON message types for the adapter
//!
//! Line-delimited JSON: one message per line, each tagged by `type` and
//! carrying the sender's `seq`.

use serde::{Deserialize, Serialize};

use crate::core::{GameSnapshot, SpawnResult, TurnOutcome};
use crate::types::Direction;

pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Must be the first message on a connection
    Hello { seq: u64, client: ClientInfo },
    /// `direction` is parsed with [`Direction::from_str`]
    Command { seq: u64, direction: String },
    Restart { seq: u64 },
    Observe { seq: u64 },
}

impl ClientMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ClientMessage::Hello { seq, .. }
            | ClientMessage::Command { seq, .. }
            | ClientMessage::Restart { seq }
            | ClientMessage::Observe { seq } => *seq,
        }
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeMessage {
    pub seq: u64,
    pub client_id: usize,
    pub protocol_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationMessage {
    pub seq: u64,
    /// False when the turn was ignored or no direction was sent
    pub applied: bool,
    pub moved: bool,
    pub merges: u32,
    pub score_gained: u64,
    pub spawned: Option<SpawnResult>,
    pub state: GameSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    HandshakeRequired,
    OutOfOrder,
    InvalidDirection,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub seq: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome(WelcomeMessage),
    Observation(ObservationMessage),
    Error(ErrorMessage),
}

// ============== Helpers ==============

pub fn parse_message(line: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(line)
}

/// Pull `seq` out of a line that failed to parse, so the error can echo it
pub fn seq_best_effort(line: &str) -> u64 {
    serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|v| v.get("seq").and_then(|s| s.as_u64()))
        .unwrap_or(0)
}

pub fn create_hello(seq: u64, name: &str, version: &str) -> ClientMessage {
    ClientMessage::Hello {
        seq,
        client: ClientInfo {
            name: name.to_string(),
            version: version.to_string(),
        },
    }
}

pub fn create_command(seq: u64, direction: Direction) -> ClientMessage {
    ClientMessage::Command {
        seq,
        direction: direction.as_str().to_string(),
    }
}

pub fn create_welcome(seq: u64, client_id: usize) -> ServerMessage {
    ServerMessage::Welcome(WelcomeMessage {
        seq,
        client_id,
        protocol_version: PROTOCOL_VERSION.to_string(),
    })
}

pub fn create_observation(seq: u64, turn: Option<&TurnOutcome>, state: GameSnapshot) -> ServerMessage {
    let turn = turn.copied().unwrap_or_default();
    ServerMessage::Observation(ObservationMessage {
        seq,
        applied: turn.applied,
        moved: turn.moved,
        merges: turn.merges,
        score_gained: turn.score_gained,
        spawned: turn.spawned,
        state,
    })
}

pub fn create_error(seq: u64, code: ErrorCode, message: impl Into<String>) -> ServerMessage {
    ServerMessage::Error(ErrorMessage {
        seq,
        code,
        message: message.into(),
    })
}
