use std::path::PathBuf;

use clap::Parser;

/// Faultline demo host
#[derive(Debug, Parser)]
#[command(name = "faultline", about = "HTTP error normalization demo server")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "faultline.toml", env = "FAULTLINE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "FAULTLINE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
