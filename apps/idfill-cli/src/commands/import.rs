use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use idfill_core::{Config, Variant};
use idfill_events::{topics, Bus, Envelope};
use idfill_ingest::{ImportSpec, Importer};
use std::path::PathBuf;
use tokio::sync::broadcast::{error::RecvError, Receiver};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum VariantArg {
    Base,
    Extended,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Base => Variant::Base,
            VariantArg::Extended => Variant::Extended,
        }
    }
}

#[derive(Args)]
pub struct ImportArgs {
    /// Comma-separated file: name, identifier, gender[, birth year]
    file: PathBuf,
    /// Column layout; overrides [import].variant
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
    /// Rows per committed batch; overrides [import].batch_size
    #[arg(long)]
    batch_size: Option<usize>,
    /// Suppress progress lines
    #[arg(long)]
    quiet: bool,
    /// Emit the final report as JSON
    #[arg(long)]
    json: bool,
}

/// Echo import events to stderr until the bus closes. Returns the number of progress lines.
async fn print_progress(mut rx: Receiver<Envelope>, quiet: bool) -> usize {
    let mut lines = 0;
    loop {
        let env = match rx.recv().await {
            Ok(env) => env,
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "progress events dropped");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        match env.kind.as_str() {
            topics::TOPIC_IMPORT_PROGRESS => {
                lines += 1;
                if !quiet {
                    eprintln!("{}% done", env.u64_field("pct").unwrap_or(0));
                }
            }
            topics::TOPIC_IMPORT_FAILED if !quiet => {
                eprintln!("import failed: {}", env.payload);
            }
            _ => {}
        }
    }
    lines
}

pub async fn run(cfg: &Config, args: ImportArgs) -> Result<()> {
    let store = super::open_store(cfg)?;
    let mut spec = match args.variant {
        Some(v) => ImportSpec::for_variant(v.into()).with_batch_size(cfg.import.batch_size()),
        None => ImportSpec::from_config(&cfg.import),
    };
    if let Some(n) = args.batch_size {
        spec = spec.with_batch_size(n);
    }

    let bus = Bus::new(64);
    let mut rx = bus.subscribe();
    let printer = tokio::spawn(print_progress(rx, args.quiet));

    let importer = Importer::new(store, spec).with_bus(bus);
    let result = importer
        .import_file(&args.file)
        .await
        .with_context(|| format!("importing {}", args.file.display()));
    drop(importer);
    let _ = printer.await;

    let report = result?;
    if args.json {
        super::print_json(&report, false)?;
    } else {
        println!(
            "{} Records Saved ({} skipped, {} in store)",
            report.imported, report.skipped, report.stored
        );
    }
    Ok(())
}
