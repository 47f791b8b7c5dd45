use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the fan-out gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call /api/1 (fans out to /api/2 and /api/3)
    Fanout {
        /// Delay for /api/2 in ms; sends a POST when both delays are given
        #[arg(long, requires = "api3_delay")]
        api2_delay: Option<i64>,
        /// Delay for /api/3 in ms
        #[arg(long, requires = "api2_delay")]
        api3_delay: Option<i64>,
    },
    /// Call /api/2 or /api/3 directly
    Single {
        /// Which api to call (2 or 3)
        #[arg(value_parser = clap::value_parser!(u8).range(2..=3))]
        api: u8,
        /// Delay in ms; sends a POST when given
        #[arg(long)]
        delay: Option<i64>,
    },
    /// Check gateway liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Fanout {
            api2_delay: Some(api2),
            api3_delay: Some(api3),
        } => client
            .post(format!("{}/api/1", base))
            .json(&json!({ "api2Delay": api2, "api3Delay": api3 })),
        Commands::Fanout { .. } => client.get(format!("{}/api/1", base)),
        Commands::Single {
            api,
            delay: Some(delay),
        } => client.post(format!("{}/api/{}", base, api)).json(&delay),
        Commands::Single { api, delay: None } => client.get(format!("{}/api/{}", base, api)),
        Commands::Health => client.get(format!("{}/health", base)),
    };

    let started = std::time::Instant::now();
    let res = request.send().await?;
    let status = res.status();
    let body = res.text().await?;
    let elapsed_ms = started.elapsed().as_millis();

    if !status.is_success() {
        eprintln!("Error: {} ({} ms)", status, elapsed_ms);
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&body) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", body),
    }
    println!("({} ms)", elapsed_ms);
    Ok(())
}
