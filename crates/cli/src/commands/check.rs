use mnemo_azure_openai::AzureOpenAiEmbeddingProvider;
use mnemo_embedding::EmbeddingProvider;

use crate::OutputFormat;

pub fn run(provider: &AzureOpenAiEmbeddingProvider, format: &OutputFormat) -> anyhow::Result<()> {
    let endpoint = provider.client().endpoint();
    let header_names: Vec<&str> = provider
        .resolved()
        .headers
        .keys()
        .map(String::as_str)
        .collect();

    match format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "provider": provider.id(),
                "endpoint": endpoint.as_str(),
                "apiVersion": endpoint.api_version(),
                "model": provider.model(),
                "headers": header_names,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("provider:    {}", provider.id());
            println!("endpoint:    {endpoint}");
            println!(
                "api-version: {}",
                endpoint.api_version().unwrap_or_default()
            );
            let model = provider.model();
            println!(
                "model:       {}",
                if model.is_empty() { "(server default)" } else { model }
            );
            println!("headers:     {}", header_names.join(", "));
        }
    }

    Ok(())
}
