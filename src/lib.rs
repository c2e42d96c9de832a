pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pairing;
pub mod services;
pub mod snapshot;

pub use config::PairingSettings;
pub use domain::{HistoryRecord, PlayerId, PlayerRecord};
pub use errors::PairingError;
pub use pairing::{Pairing, PairingResult, compute_pairings};

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::{Command, SnapshotArgs};
use crate::config::settings::AppConfig;
use crate::services::PairingService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_pair(input: &SnapshotArgs, output: Option<&std::path::Path>) -> Result<()> {
    let service = PairingService::new(load_config(input)?);
    service.run_pair(&input.standings, input.history.as_deref(), output)?;
    Ok(())
}

pub fn handle_costs(input: &SnapshotArgs) -> Result<()> {
    let service = PairingService::new(load_config(input)?);
    service.run_costs(&input.standings, input.history.as_deref())
}

fn load_config(input: &SnapshotArgs) -> Result<AppConfig> {
    let pairing = match &input.config {
        Some(path) => PairingSettings::from_toml_file(path)?,
        None => PairingSettings::default(),
    };
    Ok(AppConfig::with_pairing(pairing))
}
