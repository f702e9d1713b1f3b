use anyhow::Result;
use colored::Colorize;

use crate::app::{get_config_dir, init_config, Config};

use super::Commands;

/// Handle CLI subcommands. Returns true when the command was fully handled
/// and the chat should not start.
pub fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            let (path, created) = init_config()?;
            if created {
                println!("Created default configuration at: {}", path.display().to_string().green());
            } else {
                println!("Configuration already exists at: {}", path.display());
            }
            Ok(true)
        }
        Commands::Status => {
            show_status(config)?;
            Ok(true)
        }
        Commands::Chat => Ok(false),
    }
}

/// Show configuration and credential status. Never prints the key itself.
fn show_status(config: &Config) -> Result<()> {
    println!("SafeSpace Status:");
    println!();

    let config_path = get_config_dir()?.join("config.toml");
    if config_path.exists() {
        println!("  [OK] Configuration: {}", config_path.display());
    } else {
        println!("  {} Configuration: Not found (using defaults)", "[WARNING]".yellow());
    }

    println!("  Model: {}", config.model.name.green());
    println!("  Endpoint: {}", config.api.endpoint);

    if config.api.has_api_key() {
        println!("  [OK] {}: Set", config.api.api_key_env);
    } else {
        println!(
            "  {} {}: Not set (sends will fail)",
            "[ERROR]".red(),
            config.api.api_key_env
        );
    }

    println!("  Log file: {}", config.logging.resolved_file().display());
    println!();
    Ok(())
}
