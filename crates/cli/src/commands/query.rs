use clap::Args;
use mnemo_embedding::EmbeddingProvider;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Text to embed.
    pub text: String,
}

pub async fn run(
    provider: &dyn EmbeddingProvider,
    args: &QueryArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let vector = provider.embed_query(&args.text).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&vector)?);
        }
        OutputFormat::Text => {
            println!("{}", super::summarize(&vector));
        }
    }

    Ok(())
}
