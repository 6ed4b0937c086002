//! Show which adapters a pair of config references resolves to.

use anyhow::{Context, Result};
use clap::Args;
use cradle_providers::{Adapter, ConfigRef, EmbeddingSupport};
use serde_json::{Map, Value};

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Completion config path, or an inline JSON object
    pub completion: String,

    /// Embedding config path or JSON object
    ///
    /// Defaults to the completion reference, or to the redirect target's
    /// config file when the completion provider has no embeddings of its own.
    pub embedding: Option<String>,

    /// Also list the models each backend offers
    #[arg(long)]
    pub models: bool,
}

pub async fn run(ctx: &AppContext, args: ResolveArgs) -> Result<()> {
    let completion = parse_reference(&args.completion)?;
    let embedding = match &args.embedding {
        Some(raw) => parse_reference(raw)?,
        None => default_embedding(ctx, &completion)?,
    };

    let resolved = ctx.factory().resolve(&completion, &embedding).await?;

    print_adapter("Completion", resolved.completion.as_ref(), args.models).await;
    print_adapter("Embedding", resolved.embedding.as_ref(), args.models).await;
    println!("Shared:     {}", resolved.is_shared());
    Ok(())
}

/// A path, or an inline mapping when the argument is a JSON object.
fn parse_reference(raw: &str) -> Result<ConfigRef> {
    if raw.trim_start().starts_with('{') {
        let map: Map<String, Value> =
            serde_json::from_str(raw).context("inline config must be a JSON object")?;
        Ok(ConfigRef::Inline(map))
    } else {
        Ok(ConfigRef::from(raw))
    }
}

fn default_embedding(ctx: &AppContext, completion: &ConfigRef) -> Result<ConfigRef> {
    let descriptor = ctx.factory().select(completion)?;
    Ok(match descriptor.adapter.embeddings() {
        EmbeddingSupport::Native => completion.clone(),
        EmbeddingSupport::Redirect(target) => ctx.store().reference(ctx.require(target)?),
    })
}

async fn print_adapter(role: &str, adapter: &dyn Adapter, models: bool) {
    let runtime = adapter.runtime();
    println!("{role}:");
    println!("  provider: {} ({})", adapter.descriptor().key, adapter.kind());
    println!("  base_url: {}", runtime.base_url);
    println!("  model:    {}", runtime.comp_model);
    if let Some(emb) = &runtime.emb_model {
        println!("  emb:      {emb}");
    }
    if models {
        let available = adapter.list_available_models().await;
        if available.is_empty() {
            println!("  models:   (none)");
        } else {
            println!("  models:   {}", available.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_argument_becomes_inline_reference() {
        let reference = parse_reference(r#"{"provider": "ollama", "comp_model": "llava"}"#).unwrap();
        assert_eq!(reference.selector(), "ollama");
        assert!(reference.path().is_none());
    }

    #[test]
    fn plain_argument_is_a_path() {
        let reference = parse_reference("./conf/openai_config.json").unwrap();
        assert_eq!(reference.selector(), "./conf/openai_config.json");
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(parse_reference("{not json").is_err());
    }
}
