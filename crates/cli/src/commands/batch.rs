use std::io::Read;

use clap::Args;
use mnemo_embedding::EmbeddingProvider;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Texts to embed. Reads one text per non-empty stdin line when omitted.
    pub texts: Vec<String>,
}

fn read_stdin_lines() -> anyhow::Result<Vec<String>> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(non_empty_lines(&input))
}

fn non_empty_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

pub async fn run(
    provider: &dyn EmbeddingProvider,
    args: &BatchArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let texts = if args.texts.is_empty() {
        read_stdin_lines()?
    } else {
        args.texts.clone()
    };

    let vectors = provider.embed_batch(&texts).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&vectors)?);
        }
        OutputFormat::Text => {
            println!("{} embeddings:", vectors.len());
            for (text, vector) in texts.iter().zip(&vectors) {
                println!("  {text:?} {}", super::summarize(vector));
            }
        }
    }

    Ok(())
}
