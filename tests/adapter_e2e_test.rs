use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};

use grid2048::adapter::protocol::{create_command, create_hello};
use grid2048::adapter::server::{run_server, ServerConfig};
use grid2048::core::{Game, Grid, SimpleRng};
use grid2048::types::Direction;

async fn start_server(game: Game<SimpleRng>) -> std::net::SocketAddr {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(config, Arc::new(Mutex::new(game)), Some(ready_tx)).await;
    });

    tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped")
}

async fn send(write_half: &mut OwnedWriteHalf, line: &str) {
    write_half.write_all(line.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();
    write_half.flush().await.unwrap();
}

async fn recv(lines: &mut Lines<BufReader<OwnedReadHalf>>) -> serde_json::Value {
    let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .unwrap()
        .unwrap()
        .expect("expected a reply line");
    serde_json::from_str(&line).unwrap()
}

#[tokio::test]
async fn adapter_hello_command_and_observe() {
    let grid = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    let addr = start_server(Game::from_grid(grid, SimpleRng::new(11))).await;

    let stream = TcpStream::connect(addr).await.expect("connect failed");
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // hello
    let hello = create_hello(1, "e2e-test", "1.0.0");
    send(&mut write_half, &serde_json::to_string(&hello).unwrap()).await;
    let welcome = recv(&mut lines).await;
    assert_eq!(welcome["type"], "welcome");
    assert_eq!(welcome["seq"], 1);
    assert_eq!(welcome["protocol_version"], "1.0.0");

    // command
    let cmd = create_command(2, Direction::Left);
    send(&mut write_half, &serde_json::to_string(&cmd).unwrap()).await;
    let obs = recv(&mut lines).await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["seq"], 2);
    assert_eq!(obs["applied"], true);
    assert_eq!(obs["moved"], true);
    assert_eq!(obs["merges"], 1);
    assert_eq!(obs["score_gained"], 4);
    assert_eq!(obs["spawned"]["kind"], "spawned");
    assert_eq!(obs["state"]["grid"][0][0], 4);
    assert_eq!(obs["state"]["score"], 4);
    assert_eq!(obs["state"]["empty_cells"], 14);

    // observe reports the same state without moving
    send(&mut write_half, r#"{"type":"observe","seq":3}"#).await;
    let again = recv(&mut lines).await;
    assert_eq!(again["type"], "observation");
    assert_eq!(again["applied"], false);
    assert_eq!(again["moved"], false);
    assert_eq!(again["state"], obs["state"]);
}

#[tokio::test]
async fn adapter_rejects_bad_input_without_closing() {
    let addr = start_server(Game::seeded(5)).await;

    let stream = TcpStream::connect(addr).await.expect("connect failed");
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    send(&mut write_half, r#"{"type":"command","seq":1,"direction":"left"}"#).await;
    let err = recv(&mut lines).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "handshake_required");

    send(&mut write_half, "not json").await;
    let err = recv(&mut lines).await;
    assert_eq!(err["code"], "invalid_json");

    let hello = create_hello(2, "e2e-test", "1.0.0");
    send(&mut write_half, &serde_json::to_string(&hello).unwrap()).await;
    assert_eq!(recv(&mut lines).await["type"], "welcome");

    send(&mut write_half, r#"{"type":"command","seq":3,"direction":"sideways"}"#).await;
    let err = recv(&mut lines).await;
    assert_eq!(err["code"], "invalid_direction");
    assert_eq!(err["seq"], 3);

    send(&mut write_half, r#"{"type":"observe","seq":3}"#).await;
    let err = recv(&mut lines).await;
    assert_eq!(err["code"], "out_of_order");

    // The unstarted game starts on restart.
    send(&mut write_half, r#"{"type":"restart","seq":4}"#).await;
    let obs = recv(&mut lines).await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["state"]["started"], true);
    assert_eq!(obs["state"]["empty_cells"], 14);
}

#[tokio::test]
async fn adapter_reports_game_over() {
    let dead = Grid::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
    let addr = start_server(Game::from_grid(dead, SimpleRng::new(1))).await;

    let stream = TcpStream::connect(addr).await.expect("connect failed");
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    let hello = create_hello(1, "e2e-test", "1.0.0");
    send(&mut write_half, &serde_json::to_string(&hello).unwrap()).await;
    recv(&mut lines).await;

    let cmd = create_command(2, Direction::Up);
    send(&mut write_half, &serde_json::to_string(&cmd).unwrap()).await;
    let err = recv(&mut lines).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "game_over");

    send(&mut write_half, r#"{"type":"observe","seq":3}"#).await;
    let obs = recv(&mut lines).await;
    assert_eq!(obs["state"]["game_over"], true);
}

#[tokio::test]
async fn adapter_fails_when_port_in_use() {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral port");
    let port = listener.local_addr().unwrap().port();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port,
    };
    let game = Arc::new(Mutex::new(Game::seeded(1)));
    let result = tokio::time::timeout(Duration::from_secs(2), run_server(config, game, None))
        .await
        .expect("bind should fail immediately");
    assert!(result.is_err());
}
