use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use qblock_game::api::{AppState, resolve_api_addr, serve};
use qblock_game::logging::init_tracing;
use qblock_game::{ConfigStore, GameSession};

#[derive(Parser, Debug)]
#[command(name = "qblock_api", about = "Local control API for a qblock frontend")]
struct Args {
    /// Config file; defaults to $QBLOCK_CONFIG_PATH or ~/.config/qblock/config.json.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Tracing filter, e.g. "info", "debug".
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log);

    let store = args
        .config
        .map(ConfigStore::new)
        .unwrap_or_else(ConfigStore::from_env);
    let session = GameSession::new(store.load())?;

    let addr = resolve_api_addr(|k| std::env::var(k).ok());
    serve(addr, AppState::new(session)).await?;
    Ok(())
}
