//! Headless simulator: seats automatic players and prints each hand's outcome as JSON lines.
//!
//! Table settings come from `HOLDEM_*` variables and the `HOLDEM_CONFIG` file; flags win.

use clap::{Parser, ValueEnum};
use holdem_engine::agents::{AgentError, AgentKind, AgentTable};
use holdem_engine::config::{ConfigError, TableConfig};
use holdem_engine::game::{Game, HandSetup};
use holdem_engine::logging::{self, LogFormat};
use holdem_engine::state::GameState;
use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum AgentArg {
    /// Checks or calls every time.
    CallingStation,
    /// Uniformly random legal actions.
    Random,
    /// Plays by estimated hand strength.
    Strength,
}

impl From<AgentArg> for AgentKind {
    fn from(a: AgentArg) -> Self {
        match a {
            AgentArg::CallingStation => AgentKind::CallingStation,
            AgentArg::Random => AgentKind::Random,
            AgentArg::Strength => AgentKind::Strength,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "holdem", version, about = "Play simulated Texas Hold'em hands between agents")]
struct Cli {
    /// Hands to play; the session stops early when one player holds every chip.
    #[arg(long, default_value_t = 1)]
    hands: usize,
    #[arg(long, default_value_t = 3)]
    players: usize,
    /// Deck and agent seed. Hand `n` uses `seed + n - 1`.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = AgentArg::Strength)]
    agent: AgentArg,
    #[arg(long)]
    small_blind: Option<u64>,
    #[arg(long)]
    big_blind: Option<u64>,
    #[arg(long)]
    stack: Option<u64>,
    /// Emit logs as JSON on stderr.
    #[arg(long)]
    json_log: bool,
    /// Print every state snapshot, not just hand outcomes.
    #[arg(long)]
    snapshots: bool,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Line<'a> {
    Snapshot { state: &'a GameState },
    Outcome { hand: usize, outcome: &'a holdem_engine::game::HandOutcome },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = if cli.json_log { LogFormat::Json } else { LogFormat::Text };
    if let Err(e) = logging::init(format) {
        eprintln!("{e}");
    }
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = TableConfig::load()?.config;
    if let Some(v) = cli.small_blind {
        config.small_blind = v;
    }
    if let Some(v) = cli.big_blind {
        config.big_blind = v;
    }
    if let Some(v) = cli.stack {
        config.starting_stack = v;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;

    let seats = config.seats(cli.players)?;
    let agent_seed = config.seed.unwrap_or_else(rand::random);
    let ids: Vec<_> = seats.iter().map(|s| s.id.clone()).collect();
    let mut table = AgentTable::uniform(&ids, cli.agent.into(), agent_seed);

    let mut game = Game::new();
    if cli.snapshots {
        game.set_sink(|state: &GameState| match serde_json::to_string(&Line::Snapshot { state }) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!(error = %e, "snapshot not encoded"),
        });
    }

    info!(hands = cli.hands, players = cli.players, agent = ?cli.agent, seed = ?config.seed, "session started");
    let outcomes = table.play_session(&mut game, HandSetup::from_config(&config, seats), cli.hands)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (i, outcome) in outcomes.iter().enumerate() {
        serde_json::to_writer(&mut out, &Line::Outcome { hand: i + 1, outcome })?;
        writeln!(out)?;
    }
    out.flush()?;
    info!(played = outcomes.len(), "session finished");
    Ok(())
}
