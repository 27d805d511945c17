//! mnemo-embed
//!
//! Resolve an Azure OpenAI embeddings deployment from config and flags, then
//! embed text with it.

mod commands;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mnemo_azure_openai::create_azure_openai_embedding_provider;
use mnemo_embedding::ChainedApiKeyResolver;
use tracing_subscriber::{EnvFilter, fmt};

use crate::settings::{Overrides, Settings};

/// mnemo-embed: turn text into vectors through Azure OpenAI.
#[derive(Parser, Debug)]
#[command(name = "mnemo-embed", version, about)]
struct Cli {
    /// TOML settings file.
    #[arg(long, env = "MNEMO_EMBED_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Deployment base URL (must carry `api-version`).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// API key. When absent the key is looked up in the settings file.
    #[arg(long, env = "AZURE_OPENAI_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Model name, optionally prefixed with `azure-openai/`.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Extra request header (NAME=VALUE). Repeatable.
    #[arg(long = "header", value_parser = parse_key_val, global = true)]
    headers: Vec<(String, String)>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Embed a single text.
    Query(commands::query::QueryArgs),
    /// Embed several texts in one request.
    Batch(commands::batch::BatchArgs),
    /// Validate settings without calling the endpoint.
    Check,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid NAME=VALUE: no `=` found in `{s}`"))?;
    Ok((name.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?.with_overrides(Overrides {
        base_url: cli.base_url,
        api_key: cli.api_key,
        model: cli.model,
        headers: cli.headers,
        timeout_secs: cli.timeout_secs,
    });

    let resolver = ChainedApiKeyResolver::standard();
    let provider =
        create_azure_openai_embedding_provider(&settings.options, &resolver, settings.timeout())
            .await?;
    tracing::debug!(endpoint = %provider.client().endpoint(), "embedding provider ready");

    match cli.command {
        Command::Query(args) => commands::query::run(&provider, &args, &cli.format).await,
        Command::Batch(args) => commands::batch::run(&provider, &args, &cli.format).await,
        Command::Check => commands::check::run(&provider, &cli.format),
    }
}
