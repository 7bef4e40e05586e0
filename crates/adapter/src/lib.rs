//! Adapter module - external control via TCP socket with JSON protocol
//!
//! This module lets bots, scripts and test harnesses drive a game over a
//! TCP connection. Direction input arrives as text; the engine never sees
//! key codes or sockets.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7848)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Commanding**: Client sends `command` with a direction, server replies
//!    with an `observation` holding the turn result and a full snapshot
//! 4. **Session control**: `restart` starts a fresh game, `observe` reads the
//!    current state without moving
//!
//! Every message carries `type` and `seq`; a client's `seq` must strictly
//! increase. Failures are answered with an `error` message carrying one of
//! `invalid_json`, `handshake_required`, `out_of_order`, `invalid_direction`
//! or `game_over`.
//!
//! # Environment Variables
//!
//! - `GRID2048_HOST`: Bind address (default: "127.0.0.1")
//! - `GRID2048_PORT`: Port number (default: 7848)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"client":{"name":"my-bot","version":"1.0.0"}}
//! Server -> Client: {"type":"welcome","seq":1,"client_id":1,"protocol_version":"1.0.0"}
//! Client -> Server: {"type":"command","seq":2,"direction":"left"}
//! Server -> Client: {"type":"observation","seq":2,"moved":true,"merges":1,"score_gained":4,...}
//! ```
//!
//! # Concurrency
//!
//! All connections share one game behind a `tokio::sync::Mutex`; each command
//! holds the lock for exactly one turn.

pub mod protocol;
pub mod server;

pub use grid2048_core as core;
pub use grid2048_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use server::{respond, run_server, ClientSession, ServerConfig, SharedGame};
