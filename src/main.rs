// src/main.rs
// hawkai - one-shot CLI shell around the HawkAI provider client

use anyhow::{Result, anyhow};
use clap::Parser;
use hawkai_client::{AiClient, Provider};
use std::io::Read;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hawkai")]
#[command(about = "Send a prompt to the configured AI provider")]
#[command(version)]
struct Cli {
    /// AI provider to use (gemini or openai)
    #[arg(short, long, default_value = "gemini")]
    provider: String,

    /// API key; falls back to the provider's environment variable
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Prompt text; read from stdin when omitted
    prompt: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let provider = Provider::from_str(&cli.provider)
        .ok_or_else(|| anyhow!("unknown provider: {}", cli.provider))?;

    let api_key = match cli.api_key {
        Some(key) => key,
        None => std::env::var(provider.api_key_env_var()).map_err(|_| {
            anyhow!(
                "no API key: pass --api-key or set {}",
                provider.api_key_env_var()
            )
        })?,
    };

    let text = if cli.prompt.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        cli.prompt.join(" ")
    };

    // Composition root: one client per process
    let client = AiClient::default();
    let message = client.initialize(provider, &api_key)?;
    info!("{message}");

    let reply = client.generate_response(&text).await?;
    println!("{reply}");

    Ok(())
}
