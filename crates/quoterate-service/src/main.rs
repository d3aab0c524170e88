//! QuoteRate Service Binary
//!
//! Loads fixtures and prints one JSON quote view per line.

use anyhow::{bail, Result};
use tracing::{error, info};

use quoterate_service::{telemetry, FixtureSet, QuoteView, ServiceConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ServiceConfig::load()?;

    // Initialize tracing
    telemetry::init(&config.log_level);

    info!("Starting QuoteRate v{}", quoterate_common::VERSION);
    info!("Loaded configuration: {:?}", config);

    let service = FixtureSet::load_dir(&config.fixtures_dir).await?.install()?;

    let views = match config.quote_id {
        Some(id) => vec![(id, service.view(id))],
        None => service.views(),
    };

    let mut failed = 0usize;
    for (id, view) in views {
        match view {
            Ok(view) => println!("{}", render(&view, config.pretty)?),
            Err(e) => {
                error!(quote_id = id, error = %e, "Failed to rate quote");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} quote(s) could not be rated", failed);
    }
    Ok(())
}

fn render(view: &QuoteView, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(view)
    } else {
        serde_json::to_string(view)
    }
}
