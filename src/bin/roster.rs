use std::env;
use std::io;
use std::time::Duration;

use clap::Parser;
use team_roster::console::{MenuOptions, RosterApp, DEFAULT_TABLE_WIDTH};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding Team.json and Player.json. Must already exist.
    #[arg(short, long)]
    data_dir: Option<String>,

    /// How long feedback messages stay on screen, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pause_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let data_dir = args
        .data_dir
        .or_else(|| env::var("ROSTER_DATA_DIR").ok())
        .unwrap_or_else(|| "data".to_string());

    let options = MenuOptions {
        pause: Duration::from_millis(args.pause_ms),
        table_width: DEFAULT_TABLE_WIDTH,
    };

    log::info!("Using data directory {}", data_dir);
    let stdin = io::stdin();
    let mut app = RosterApp::open(&data_dir, stdin.lock(), io::stdout(), options)?;
    app.run()?;

    Ok(())
}
