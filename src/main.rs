mod api;
mod cli;
mod command;
mod config;
mod events;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use api::CiClient;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is reserved for rendered output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        addr,
        token,
        output,
        color,
        command,
    } = Cli::parse();

    let file_config = config::Config::load()?;
    let address = file_config.resolve_address(addr)?;
    let token = file_config.resolve_token(token)?;
    let client = CiClient::new(&address, &token)?;

    match command {
        Commands::Build(cmd) => command::build::run(cmd.into_config(output, color), &client).await,
        Commands::Hook(cmd) => command::hook::run(cmd.into_config(output, color), &client).await,
        Commands::Log(cmd) => command::log::run(cmd.into_config(output, color), &client).await,
        Commands::Step(cmd) => command::step::run(cmd.into_config(output, color), &client).await,
        Commands::Dashboard(cmd) => {
            command::dashboard::run(cmd.into_config(output, color), &client).await
        }
        Commands::Settings(cmd) => {
            command::settings::run(cmd.into_config(output, color), &client).await
        }
    }
}
