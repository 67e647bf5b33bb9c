//! report-router: run one report event and print its response envelope.
//!
//! Usage: `report-router [EVENT_FILE]`. The event is read from stdin when no
//! file is given.

use std::io::Read;

use report_router::config::Config;
use report_router::utils::bootstrap::{build_router, init_tracing};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load(None)?;
    let router = build_router(&config).await?;

    let raw = match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "Reading event from file");
            tokio::fs::read_to_string(&path).await?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let event: serde_json::Value = serde_json::from_str(&raw)?;

    let envelope = match router.handle(&event).await {
        Ok(envelope) => envelope,
        Err(e) => {
            error!(error = %e, "Invocation aborted");
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string(&envelope)?);
    Ok(())
}
