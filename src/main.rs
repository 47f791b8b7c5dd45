//! Fan-out gateway (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────────────┐
//!                        │                  FAN-OUT GATEWAY                    │
//!                        │                                                     │
//!   GET/POST /api/1      │  ┌────────┐    ┌─────────┐    ┌──────────────────┐  │
//!   ─────────────────────┼─▶│  http  │───▶│ fan-out │───▶│ downstream client│──┼──▶ /api/2
//!                        │  │ server │    │ + shared│    │   (reqwest)      │──┼──▶ /api/3
//!                        │  └────────┘    │ deadline│    └──────────────────┘  │
//!                        │       ▲        └────┬────┘                          │
//!   200 {api2, api3}     │       │             ▼                               │
//!   ◀────────────────────┼───────┴──────  aggregator (all-or-nothing) ◀────────┤
//!   or empty 500         │                                                     │
//!                        │  config · observability · lifecycle                 │
//!                        └────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use fanout_gateway::lifecycle::startup;

#[derive(Parser)]
#[command(name = "fanout-gateway")]
#[command(about = "Fans one request out to several downstream APIs under a shared deadline", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = startup::load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        fanout_gateway::config::validate_config(&config)
            .map_err(fanout_gateway::config::ConfigError::Validation)?;
    }

    startup::run(config).await?;
    Ok(())
}
