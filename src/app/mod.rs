pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, LogLevel};
pub use logging::{LoggingSystem, setup_logging};

use crate::client::LogClient;
use crate::domain::LogEvent;
use anyhow::{Context, bail};
use clap::Parser;
use serde_json::Value;
use tracing::{error, info};

/// One-shot command line shipper: sends a single event and reports the outcome.
#[derive(Parser, Debug, Clone)]
#[command(name = "loggly-shipper", author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    /// Free-text message to send
    #[arg(long, conflicts_with = "record", required_unless_present = "record")]
    pub message: Option<String>,

    /// Structured record to send, as a JSON object
    #[arg(long)]
    pub record: Option<String>,

    /// Extra tag for this event (repeatable)
    #[arg(long = "tag")]
    pub event_tags: Vec<String>,
}

impl Cli {
    pub fn event(&self) -> anyhow::Result<LogEvent> {
        if let Some(message) = &self.message {
            return Ok(LogEvent::message(message.clone()));
        }

        let Some(raw) = &self.record else {
            bail!("either --message or --record is required");
        };

        match serde_json::from_str::<Value>(raw).context("--record is not valid JSON")? {
            Value::Object(fields) => Ok(LogEvent::record(fields)),
            _ => bail!("--record must be a JSON object"),
        }
    }
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = cli.config.clone().resolve()?;
    config.post_process();
    config.validate()?;

    setup_logging(config.log_level)?;
    info!(
        "Starting loggly-shipper v{} (endpoint={}, default_tags={:?})",
        get_version(),
        config.endpoint,
        config.tags
    );

    let event = cli.event()?;
    let client = LogClient::new(config.client_config())?;

    match client.deliver(event, cli.event_tags.clone()).await {
        Ok(response) => {
            info!(status = response.status, "event accepted");
            println!("{}", response.body);
            Ok(())
        }
        Err(e) => {
            error!("Failed to ship event: {e}");
            Err(e.into())
        }
    }
}
