//! CLI command implementations

use clap::Subcommand;
use shoal_core::{IptvConfig, IptvError};
use tracing::{info, warn};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to bind to
        #[arg(short, long, default_value = "8001")]
        port: u16,
    },
}

/// Handle the CLI command
///
/// # Errors
/// - `IptvError::Io` - Failed to bind or serve on the requested address
pub async fn handle_command(command: Commands) -> Result<(), IptvError> {
    match command {
        Commands::Serve { host, port } => serve(host, port).await,
    }
}

/// Start the proxy server with configuration from the environment
async fn serve(host: String, port: u16) -> Result<(), IptvError> {
    let config = IptvConfig::from_env();

    if config.is_configured() {
        info!("Connecting to Xtream server: {}", config.base_url);
    } else {
        warn!("IPTV credentials not configured. Running in limited mode.");
    }

    println!("Shoal IPTV proxy running on http://{host}:{port}");
    println!("Press Ctrl+C to stop the server");

    shoal_web::run_server(config, &host, port).await
}
