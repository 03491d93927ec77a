//! Shoal CLI - IPTV proxy entry point
//!
//! Provides command-line access to the Shoal proxy server.

mod commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "shoal")]
#[command(about = "A backend proxy for Xtream-style IPTV providers")]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    commands::handle_command(cli.command).await?;

    Ok(())
}
