use log::{error, info};
use std::env;
use std::io::{self, Write};
use std::process;

use great_escape_bot::bot::Bot;
use great_escape_bot::config::Config;
use great_escape_bot::debug_logger::DebugLogger;
use great_escape_bot::protocol::{ProtocolError, ProtocolReader};

fn run() -> Result<(), ProtocolError> {
    // Load configuration once at startup
    let config = Config::load_or_default();
    let mut debug_logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path);
    let bot = Bot::new(config);

    let stdin = io::stdin();
    let mut reader = ProtocolReader::new(stdin.lock());
    let setup = reader.read_setup()?;
    info!(
        "Game start: {}x{} board, {} players, playing as {}",
        setup.width, setup.height, setup.player_count, setup.my_id
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut turn = 0u32;

    while let Some(state) = reader.read_turn(setup.player_count)? {
        let decision = bot.get_move(&setup, &state, turn);
        writeln!(out, "{}", decision.action)?;
        out.flush()?;

        debug_logger.log_move(turn, &setup, &state, &decision.action);
        turn += 1;
    }

    info!("Input closed after {} turns", turn);
    Ok(())
}

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead. Logs go to stderr, stdout belongs to the host.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Great Escape bot...");

    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}
