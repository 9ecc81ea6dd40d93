use anyhow::{Context, Result};
use clap::Args;
use idfill_core::Config;
use idfill_engine::{FillOutcome, FillProfile, FormPage, MemoryPage, Orchestrator};
use idfill_heuristics::find_name_field;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args)]
pub struct ReplayArgs {
    /// Page snapshot JSON (elements and labels)
    page: PathBuf,
    /// Handle of the field to type into
    #[arg(long)]
    field: String,
    /// Text typed into the field
    #[arg(long)]
    text: String,
    /// After the first event, type this name into the name field
    #[arg(long)]
    pick: Option<String>,
    /// Include the final page snapshot in the output
    #[arg(long)]
    dump_page: bool,
}

#[derive(Serialize)]
struct ReplayOutput {
    outcomes: Vec<FillOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<idfill_heuristics::PageSnapshot>,
}

pub async fn run(cfg: &Config, args: ReplayArgs) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.page)
        .await
        .with_context(|| format!("reading {}", args.page.display()))?;
    let page = Arc::new(
        MemoryPage::from_json(&raw)
            .with_context(|| format!("parsing {}", args.page.display()))?,
    );
    let defaults = super::prefs::effective_defaults(cfg)?;
    let engine = Arc::new(
        Orchestrator::new(
            page.clone(),
            super::open_store_for_lookup(cfg),
            FillProfile::from_config(cfg),
        )
        .with_defaults(defaults),
    );

    page.type_text(&args.field, &args.text)?;
    let mut outcomes = vec![engine.on_input(&args.field).await];

    if let Some(name) = args.pick {
        let snapshot = page.snapshot();
        let handle = find_name_field(&snapshot.elements, &engine.profile().keywords)
            .map(|el| el.handle.clone())
            .context("page has no name field")?;
        page.type_text(&handle, &name)?;
        outcomes.push(engine.on_input(&handle).await);
    }

    let output = ReplayOutput {
        outcomes,
        page: args.dump_page.then(|| page.snapshot()),
    };
    super::print_json(&output, true)
}
