use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TOOLS_CONFIG: &str = "tools/tools.json";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

// Everything the gateway needs at boot, read once from the environment
#[derive(Debug, Clone)]
pub struct Settings {
    pub tools_config: PathBuf,
    pub addr: SocketAddr,
    pub webhook_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let tools_config: PathBuf = lookup("TOOLS_CONFIG")
            .unwrap_or_else(|| DEFAULT_TOOLS_CONFIG.to_string())
            .into();

        let addr_raw = lookup("GATEWAY_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr_raw
            .parse()
            .with_context(|| format!("GATEWAY_ADDR is not a socket address: '{}'", addr_raw))?;

        let timeout_ms = match lookup("WEBHOOK_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("WEBHOOK_TIMEOUT_MS must be milliseconds: '{}'", raw))?,
            None => DEFAULT_TIMEOUT_MS,
        };

        Ok(Self {
            tools_config,
            addr,
            webhook_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
