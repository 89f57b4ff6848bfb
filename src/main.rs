//!
//! faceauth portal binary
//! ----------------------
//! Command-line entry point. Configuration comes from flags and environment variables;
//! see `--help`.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use faceauth_portal::config::{has_flag, PortalConfig, USAGE};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    let _ = fmt().with_env_filter(filter).try_init();

    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let config = PortalConfig::from_env_and_args(&args);
    info!(target: "startup", "RUST_LOG='{}', http_port={}", rust_log, config.http_port);

    faceauth_portal::server::run(config).await
}
