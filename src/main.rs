//! 2048 runner (default binary).
//!
//! `play` reads one command per line from stdin (`left`, `u`, `restart`,
//! `quit`, ...) and prints the grid after each turn. `serve` exposes the same
//! game over the JSON adapter.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde_json::json;
use tokio::runtime::Runtime;
use tokio::sync::Mutex;

use grid2048::adapter::{run_server, ServerConfig};
use grid2048::core::{FastRng, Game, SimpleRng, TileRng};
use grid2048::types::Direction;

type DynRng = Box<dyn TileRng + Send>;

/// Play 2048 from the terminal or serve it over TCP
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Seed for a reproducible game; omit for a random one
    #[arg(long, env = "GRID2048_SEED")]
    seed: Option<u32>,

    /// Print snapshots as JSON lines instead of a grid
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Read moves from stdin (default)
    Play,
    /// Run the line-delimited JSON adapter
    Serve {
        /// Bind address [env: GRID2048_HOST, default: 127.0.0.1]
        #[arg(long)]
        host: Option<String>,
        /// Port [env: GRID2048_PORT, default: 7848]
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let rng: DynRng = match cli.seed {
        Some(seed) => {
            info!("using seed {}", seed);
            Box::new(SimpleRng::new(seed))
        }
        None => Box::new(FastRng::new()),
    };
    let mut game = Game::new(rng);
    game.start();

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            play(&mut game, stdin.lock(), stdout.lock(), cli.json)
        }
        Command::Serve { host, port } => {
            let mut config = ServerConfig::from_env();
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let rt = Runtime::new()?;
            rt.block_on(run_server(config, Arc::new(Mutex::new(game)), None))
        }
    }
}

/// Drive `game` from text commands until `quit` or end of input
fn play<R, I, W>(game: &mut Game<R>, input: I, mut out: W, json: bool) -> Result<()>
where
    R: TileRng,
    I: BufRead,
    W: Write,
{
    print_state(game, &mut out, json)?;

    for line in input.lines() {
        let line = line?;
        let cmd = line.trim();
        if cmd.is_empty() {
            continue;
        }

        match cmd.to_lowercase().as_str() {
            "quit" | "q" | "exit" => break,
            "restart" => game.restart(),
            "show" => {}
            other => match Direction::from_str(other) {
                Some(dir) => {
                    let turn = game.apply(dir);
                    if turn.applied && !turn.moved {
                        if json {
                            print_notice(&mut out, "no_move", dir.as_str())?;
                        } else {
                            writeln!(out, "nothing moves {}", dir)?;
                        }
                        continue;
                    }
                }
                None => {
                    warn!("unknown command {:?}", other);
                    if json {
                        print_notice(&mut out, "unknown_command", other)?;
                    } else {
                        writeln!(out, "commands: up/down/left/right (u/d/l/r), restart, show, quit")?;
                    }
                    continue;
                }
            },
        }

        print_state(game, &mut out, json)?;
    }

    out.flush()?;
    Ok(())
}

/// One-line JSON notice, so `--json` output stays machine-readable
fn print_notice<W: Write>(out: &mut W, notice: &str, input: &str) -> Result<()> {
    serde_json::to_writer(&mut *out, &json!({ "notice": notice, "input": input }))?;
    writeln!(out)?;
    Ok(())
}

fn print_state<R: TileRng, W: Write>(game: &Game<R>, out: &mut W, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, &game.snapshot())?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{}", game.grid())?;
    writeln!(out, "score: {}  moves: {}", game.score(), game.moves())?;
    if game.game_over() {
        writeln!(out, "game over (type restart or quit)")?;
    }
    Ok(())
}
