//! TCP server for the adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Every connection shares one [`Game`] behind a mutex, so turns from
//! different clients are applied one at a time.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, Mutex};

use crate::core::{Game, TileRng};
use crate::protocol::*;
use crate::types::Direction;

/// The session every client drives
pub type SharedGame<R> = Arc<Mutex<Game<R>>>;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7848,
        }
    }
}

impl ServerConfig {
    /// Create from `GRID2048_HOST` / `GRID2048_PORT`, falling back to defaults
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("GRID2048_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("GRID2048_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        Self { host, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Per-connection protocol state
#[derive(Debug, Clone)]
pub struct ClientSession {
    pub id: usize,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
}

impl ClientSession {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            handshaken: false,
            last_seq: None,
        }
    }

    /// Enforce strictly increasing seq per sender
    fn check_and_update_seq(&mut self, seq: u64) -> bool {
        match self.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                self.last_seq = Some(seq);
                true
            }
        }
    }
}

/// Answer one inbound line.
///
/// Protocol failures become `error` replies; they never end the connection.
pub async fn respond<R: TileRng>(
    session: &mut ClientSession,
    line: &str,
    game: &SharedGame<R>,
) -> ServerMessage {
    let msg = match parse_message(line) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("client {}: unparseable message: {}", session.id, e);
            return create_error(seq_best_effort(line), ErrorCode::InvalidJson, e.to_string());
        }
    };

    let seq = msg.seq();
    if !session.check_and_update_seq(seq) {
        return create_error(
            seq,
            ErrorCode::OutOfOrder,
            format!("seq {} is not greater than {}", seq, session.last_seq.unwrap_or(0)),
        );
    }

    match msg {
        ClientMessage::Hello { client, .. } => {
            info!(
                "client {} hello from {} {}",
                session.id, client.name, client.version
            );
            session.handshaken = true;
            create_welcome(seq, session.id)
        }
        _ if !session.handshaken => {
            create_error(seq, ErrorCode::HandshakeRequired, "send hello first")
        }
        ClientMessage::Command { direction, .. } => {
            let Some(dir) = Direction::from_str(&direction) else {
                return create_error(
                    seq,
                    ErrorCode::InvalidDirection,
                    format!("unknown direction {:?}", direction),
                );
            };
            let mut game = game.lock().await;
            if game.game_over() {
                return create_error(seq, ErrorCode::GameOver, "game is over; send restart");
            }
            let turn = game.apply(dir);
            debug!(
                "client {} moved {}: moved={} score={}",
                session.id,
                dir,
                turn.moved,
                game.score()
            );
            create_observation(seq, Some(&turn), game.snapshot())
        }
        ClientMessage::Restart { .. } => {
            let mut game = game.lock().await;
            game.restart();
            info!("client {} restarted the game", session.id);
            create_observation(seq, None, game.snapshot())
        }
        ClientMessage::Observe { .. } => {
            let game = game.lock().await;
            create_observation(seq, None, game.snapshot())
        }
    }
}

/// Run the TCP server until the listener fails.
///
/// `ready_tx` receives the bound address, which lets callers bind port 0.
pub async fn run_server<R>(
    config: ServerConfig,
    game: SharedGame<R>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()>
where
    R: TileRng + Send + 'static,
{
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let bound = listener.local_addr()?;
    info!("adapter listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0usize;

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!("client {} connected from {}", client_id, addr);

        let game = Arc::clone(&game);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, game).await {
                warn!("client {} error: {}", client_id, e);
            }
            info!("client {} disconnected", client_id);
        });
    }
}

/// Handle a single client connection
async fn handle_client<R: TileRng>(
    socket: TcpStream,
    client_id: usize,
    game: SharedGame<R>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let mut session = ClientSession::new(client_id);

    let mut line = String::new();
    let mut buf: Vec<u8> = Vec::with_capacity(1024);

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            // Client disconnected
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let reply = respond(&mut session, trimmed, &game).await;

        buf.clear();
        serde_json::to_writer(&mut buf, &reply)?;
        buf.push(b'\n');
        writer.write_all(&buf).await?;
        writer.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Grid, GridEngine, SimpleRng};

    fn shared(game: Game<SimpleRng>) -> SharedGame<SimpleRng> {
        Arc::new(Mutex::new(game))
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:7848");
    }

    #[test]
    fn test_seq_must_increase() {
        let mut s = ClientSession::new(1);
        assert!(s.check_and_update_seq(1));
        assert!(s.check_and_update_seq(5));
        assert!(!s.check_and_update_seq(5));
        assert!(!s.check_and_update_seq(2));
        assert_eq!(s.last_seq, Some(5));
    }

    #[tokio::test]
    async fn test_command_requires_hello() {
        let game = shared(Game::seeded(1));
        let mut s = ClientSession::new(1);
        let reply = respond(&mut s, r#"{"type":"command","seq":1,"direction":"up"}"#, &game).await;
        match reply {
            ServerMessage::Error(e) => assert_eq!(e.code, ErrorCode::HandshakeRequired),
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_command_applies_move() {
        let grid = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        let game = shared(Game::from_grid(grid, SimpleRng::new(4)));
        let mut s = ClientSession::new(1);

        let hello = serde_json::to_string(&create_hello(1, "t", "0")).unwrap();
        assert!(matches!(respond(&mut s, &hello, &game).await, ServerMessage::Welcome(_)));

        let reply = respond(&mut s, r#"{"type":"command","seq":2,"direction":"LEFT"}"#, &game).await;
        let ServerMessage::Observation(obs) = reply else {
            panic!("expected observation");
        };
        assert!(obs.moved);
        assert_eq!(obs.merges, 1);
        assert_eq!(obs.score_gained, 4);
        assert_eq!(obs.state.grid[0][0], 4);
        assert!(obs.spawned.is_some());
    }

    #[tokio::test]
    async fn test_invalid_direction_and_json() {
        let game = shared(Game::seeded(2));
        let mut s = ClientSession::new(1);
        let hello = serde_json::to_string(&create_hello(1, "t", "0")).unwrap();
        respond(&mut s, &hello, &game).await;

        let reply = respond(&mut s, r#"{"type":"command","seq":2,"direction":"north"}"#, &game).await;
        assert!(matches!(
            reply,
            ServerMessage::Error(ErrorMessage { code: ErrorCode::InvalidDirection, seq: 2, .. })
        ));

        let reply = respond(&mut s, r#"{"type":"command","seq":3,"#, &game).await;
        assert!(matches!(
            reply,
            ServerMessage::Error(ErrorMessage { code: ErrorCode::InvalidJson, .. })
        ));
    }

    #[tokio::test]
    async fn test_game_over_rejects_commands_until_restart() {
        let dead = Grid::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
        let game = shared(Game::from_grid(dead, SimpleRng::new(5)));
        let mut s = ClientSession::new(1);
        let hello = serde_json::to_string(&create_hello(1, "t", "0")).unwrap();
        respond(&mut s, &hello, &game).await;

        let reply = respond(&mut s, r#"{"type":"command","seq":2,"direction":"up"}"#, &game).await;
        assert!(matches!(
            reply,
            ServerMessage::Error(ErrorMessage { code: ErrorCode::GameOver, .. })
        ));

        let reply = respond(&mut s, r#"{"type":"restart","seq":3}"#, &game).await;
        let ServerMessage::Observation(obs) = reply else {
            panic!("expected observation");
        };
        assert!(!obs.state.game_over);
        assert_eq!(obs.state.empty_cells, 14);
    }

    #[tokio::test]
    async fn test_command_before_start_is_not_applied() {
        let game = shared(Game::seeded(6));
        let mut s = ClientSession::new(1);
        let hello = serde_json::to_string(&create_hello(1, "t", "0")).unwrap();
        respond(&mut s, &hello, &game).await;

        let reply = respond(&mut s, r#"{"type":"command","seq":2,"direction":"left"}"#, &game).await;
        let ServerMessage::Observation(obs) = reply else {
            panic!("expected observation");
        };
        assert!(!obs.applied);
        assert!(!obs.moved);
        assert!(!obs.state.started);

        respond(&mut s, r#"{"type":"restart","seq":3}"#, &game).await;
        let grid = *game.lock().await.grid();
        let dir = Direction::ALL
            .into_iter()
            .find(|&d| GridEngine::from_grid(grid).preview(d).1.moved)
            .unwrap();
        let line = format!(r#"{{"type":"command","seq":4,"direction":"{}"}}"#, dir);
        let ServerMessage::Observation(obs) = respond(&mut s, &line, &game).await else {
            panic!("expected observation");
        };
        assert!(obs.applied);
        assert!(obs.moved);
    }

    #[test]
    fn test_server_config_from_env() {
        std::env::set_var("GRID2048_HOST", " 0.0.0.0 ");
        std::env::set_var("GRID2048_PORT", "9001");
        let config = ServerConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9001);

        std::env::set_var("GRID2048_HOST", "");
        std::env::set_var("GRID2048_PORT", "not-a-port");
        assert_eq!(ServerConfig::from_env(), ServerConfig::default());

        std::env::remove_var("GRID2048_HOST");
        std::env::remove_var("GRID2048_PORT");
        assert_eq!(ServerConfig::from_env(), ServerConfig::default());
    }
}
