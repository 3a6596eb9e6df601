use std::net::SocketAddr;
use std::path::Path;

use faultline_core::FilterConfig;
use serde::Deserialize;

/// Top-level host configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Address to bind; defaults to 0.0.0.0:3000
    #[serde(default)]
    pub listen_address: Option<SocketAddr>,
    /// Exception filter configuration
    #[serde(default)]
    pub filter: FilterConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing file yields the defaults; a present file must parse
    /// and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails,
    /// or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
        let config: Self = toml::from_str(&raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;
        config.filter.validate()?;

        Ok(config)
    }
}
