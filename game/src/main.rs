use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use qblock_engine::HeadlessRunner;
use qblock_game::logging::init_tracing;
use qblock_game::playtest::{PlacementLogic, PlaytestState, SessionInput};
use qblock_game::{ConfigStore, GameSession};

#[derive(Parser, Debug)]
#[command(name = "qblock", about = "Headless block-placement puzzle runner")]
struct Args {
    /// Config file; defaults to $QBLOCK_CONFIG_PATH or ~/.config/qblock/config.json.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Tracing filter, e.g. "info", "qblock_engine=debug".
    #[arg(long, default_value = "info")]
    log: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the starting grid and piece set.
    Show,
    /// Apply a JSON array of inputs and print the final state.
    Replay {
        script: PathBuf,
        /// Also print the final snapshot as JSON after the text summary.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log);

    let store = args
        .config
        .map(ConfigStore::new)
        .unwrap_or_else(ConfigStore::from_env);
    let config = store.load();
    info!(path = %store.path().display(), "config loaded");

    match args.command {
        Command::Show => {
            let session = GameSession::new(config)?;
            print!("{}", render_session(&session));
        }
        Command::Replay { script, json } => {
            let text = fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let inputs: Vec<SessionInput> = serde_json::from_str(&text)
                .with_context(|| format!("parsing script {}", script.display()))?;

            let logic = PlacementLogic::new(config)?;
            let mut runner = HeadlessRunner::new(logic);
            let frames = runner.run(inputs);
            let state = runner.into_state();

            print!("{}", render_summary(frames, &state));
            if json {
                println!("{}", serde_json::to_string_pretty(&state.session.snapshot())?);
            }
        }
    }
    Ok(())
}

fn render_session(session: &GameSession) -> String {
    let engine = session.engine();
    let mut out = format!(
        "score {} moves {}\n{}",
        engine.score(),
        engine.moves_remaining(),
        engine.grid()
    );
    for piece in session.pieces() {
        out.push_str(&format!("piece {} ({})\n", piece.id, piece.color));
        for row in piece.shape.to_bits() {
            let line: String = row
                .iter()
                .map(|&c| if c == 1 { '#' } else { ' ' })
                .collect();
            out.push_str(&format!("  {}\n", line.trim_end()));
        }
    }
    out
}

fn render_summary(frames: usize, state: &PlaytestState) -> String {
    format!(
        "{frames} inputs: {} accepted, {} rejected, {} lines cleared\n{}",
        state.accepted,
        state.rejected,
        state.lines_cleared,
        render_session(&state.session)
    )
}
