use clap::Parser;
use webgate_sync::cli::commands::{SyncOptions, cmd_get, cmd_set, cmd_sync};
use webgate_sync::cli::config::{Cli, Commands, load_config, resolve_connection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Endpoint and timeout: CLI > config > defaults
    let connection = resolve_connection(&cli, &config);

    match cli.command {
        Commands::Sync {
            interval_ms,
            once,
            trace,
        } => {
            let options = SyncOptions {
                interval_ms,
                once,
                trace,
                verbose: cli.verbose,
            };
            cmd_sync(&config, &connection, &options)?;
        }
        Commands::Get { variables } => {
            cmd_get(&connection, &variables)?;
        }
        Commands::Set { variable, value } => {
            cmd_set(&connection, &variable, &value)?;
        }
    }

    Ok(())
}
