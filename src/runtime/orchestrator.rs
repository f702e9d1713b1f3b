use anyhow::Result;
use colored::Colorize;
use tracing::{info, warn};

use crate::{
    app::{load_config, Config},
    cli::{handle_command, Cli},
    gateway::SessionGateway,
    tui::{run_ui, App},
    utils::init_logger,
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = match load_config(cli.config.as_deref()) {
            Ok(cfg) => cfg,
            // An explicit file that fails to load is fatal
            Err(e) if cli.config.is_some() => return Err(e),
            Err(e) => {
                eprintln!("{} Failed to load config: {:#}. Using defaults.", "warning:".yellow(), e);
                Config::default()
            }
        };

        Ok(Self::with_config(cli, config))
    }

    /// Build from already loaded configuration; CLI overrides win
    pub fn with_config(cli: Cli, mut config: Config) -> Self {
        if let Some(model) = &cli.model {
            config.model.name = model.clone();
        }
        if cli.verbose {
            config.logging.level = "debug".to_string();
        }
        Self { cli, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config)? {
                return Ok(());
            }
        }

        let log_file = self.config.logging.resolved_file();
        if let Err(e) = init_logger(&self.config.logging.level, &log_file) {
            eprintln!("{} Logging disabled: {:#}", "warning:".yellow(), e);
        }

        info!(model = %self.config.model.name, "Starting SafeSpace");
        if !self.config.api.has_api_key() {
            warn!(
                "{} is not set; sends will fail until it is",
                self.config.api.api_key_env
            );
        }

        let gateway = SessionGateway::global(&self.config);
        let app = App::new(self.config.model.name.clone());

        run_ui(app, gateway).await
    }
}
