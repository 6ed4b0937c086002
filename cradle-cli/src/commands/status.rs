//! Provider status overview.

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use cradle_providers::cost::rate_label;
use cradle_providers::{ConfigStore, ProviderStatus};

use crate::context::AppContext;
use crate::prompts::print_header;

#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Show config path, default model and cost per provider
    #[arg(short, long)]
    pub details: bool,

    /// Only list providers that have been configured
    #[arg(short, long)]
    pub configured: bool,
}

pub async fn run(ctx: &AppContext, args: StatusArgs) -> Result<()> {
    let manager = ctx.manager();
    let statuses = manager.list_providers(!args.configured).await;
    let default = manager.default_provider();

    print_header("LLM Provider Status")?;
    match default {
        Some(descriptor) => println!("Default provider: {}", descriptor.name),
        None => println!("No default provider set"),
    }
    println!();

    if statuses.is_empty() {
        println!("No configured providers. Run 'cradle configure-endpoint <key>' or 'cradle set-default <key>'.");
        return Ok(());
    }

    let table = render_table(
        &statuses,
        default.map(|d| d.key),
        &ctx.store(),
        args.details,
    );
    println!("{table}");
    Ok(())
}

fn render_table(
    statuses: &[ProviderStatus<'_>],
    default: Option<&str>,
    store: &ConfigStore,
    details: bool,
) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("").fg(Color::Cyan),
        Cell::new("Key").fg(Color::Cyan),
        Cell::new("Provider").fg(Color::Cyan),
        Cell::new("Type").fg(Color::Cyan),
        Cell::new("Default").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
    ];
    if details {
        header.push(Cell::new("Config").fg(Color::Cyan));
        header.push(Cell::new("Model").fg(Color::Cyan));
        header.push(Cell::new("Cost").fg(Color::Cyan));
    }
    table.set_header(header);

    for status in statuses {
        let descriptor = status.descriptor;
        let mark = if status.available() {
            Cell::new("✓").fg(Color::Green)
        } else {
            Cell::new("✗").fg(Color::Red)
        };
        let is_default = if default == Some(descriptor.key) {
            "DEFAULT"
        } else {
            ""
        };

        let mut row = vec![
            mark,
            Cell::new(descriptor.key),
            Cell::new(descriptor.name),
            Cell::new(descriptor.kind().label()),
            Cell::new(is_default),
            Cell::new(&status.outcome.message),
        ];
        if details {
            row.push(Cell::new(store.display_path(descriptor).display()));
            row.push(Cell::new(descriptor.default_model));
            row.push(Cell::new(rate_label(descriptor)));
        }
        table.add_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use cradle_providers::{CheckOutcome, ProviderRegistry};

    fn statuses(registry: &ProviderRegistry) -> Vec<ProviderStatus<'_>> {
        vec![
            ProviderStatus {
                descriptor: registry.get("openai").unwrap(),
                outcome: CheckOutcome::fail("API key not found: OA_OPENAI_KEY"),
            },
            ProviderStatus {
                descriptor: registry.get("ollama").unwrap(),
                outcome: CheckOutcome::ok("Running with 1 model(s): llava"),
            },
        ]
    }

    #[test]
    fn table_marks_default_and_status() {
        let registry = ProviderRegistry::builtin();
        let statuses = statuses(&registry);
        let table = render_table(&statuses, Some("ollama"), &ConfigStore::new("."), false);
        let rendered = table.to_string();

        assert!(rendered.contains("Ollama (Local)"));
        assert!(rendered.contains("DEFAULT"));
        assert!(rendered.contains("API key not found: OA_OPENAI_KEY"));
        assert!(rendered.contains("LOCAL"));
        assert!(!rendered.contains("FREE"));
    }

    #[test]
    fn details_add_config_model_and_cost() {
        let registry = ProviderRegistry::builtin();
        let statuses = statuses(&registry);
        let table = render_table(&statuses, None, &ConfigStore::new("."), true);
        let rendered = table.to_string();

        assert!(rendered.contains("conf/ollama_config.json"));
        assert!(rendered.contains("llama3.2-vision"));
        assert!(rendered.contains("FREE"));
        assert!(rendered.contains("~$0.015/1K tokens"));
        assert!(!rendered.contains("DEFAULT"));
    }
}
