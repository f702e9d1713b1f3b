use anyhow::Result;
use clap::Parser;

use safespace::{cli::Cli, runtime::Orchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let orchestrator = Orchestrator::new(cli)?;
    orchestrator.run().await
}
