use anyhow::Result;

use league_pairing::cli::Command;
use league_pairing::{handle_costs, handle_pair, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Pair { input, output } => handle_pair(input, output.as_deref()),
        Command::Costs { input } => handle_costs(input),
    }
}
