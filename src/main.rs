use clap::Parser;
use loggly_shipper::app::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run(Cli::parse()).await
}
