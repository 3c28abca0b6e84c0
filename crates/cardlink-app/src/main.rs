//! Main application entry point.

use cardlink_app::{App, AppError};
use std::io::Read;
use std::path::PathBuf;

fn config_path() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        log::warn!("Ignoring unknown argument {}", arg);
    }
    None
}

fn run() -> Result<(), AppError> {
    let mut app = App::from_config_path(config_path().as_deref())?;
    app.mount();

    let mut script = String::new();
    std::io::stdin().read_to_string(&mut script)?;
    app.replay_json(&script)?;

    println!("{}", app.snapshot_json()?);
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Starting Cardlink");

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
