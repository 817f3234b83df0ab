//! Same-origin relay for `/api/predict`.
//!
//! Usage:
//!   CARDIORISK_API_URL=https://risk.example.org risk_proxy

use anyhow::{Context, Result};

use cardiorisk::adapters::proxy;
use cardiorisk::{logging, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    let _guard = logging::init(&config, false)?;

    proxy::serve(config.proxy_addr, &config)
        .await
        .with_context(|| format!("risk proxy failed on {}", config.proxy_addr))?;

    Ok(())
}
