use anyhow::{bail, Result};
use clap::Args;
use idfill_core::Config;
use idfill_engine::typed_suffix;
use idfill_store::StoreStatus;

#[derive(Args)]
pub struct StatusArgs {
    /// Emit JSON
    #[arg(long)]
    json: bool,
}

pub fn status(cfg: &Config, args: StatusArgs) -> Result<()> {
    let store = super::open_store_for_lookup(cfg);
    let status = StoreStatus::of(store.as_ref());
    if args.json {
        return super::print_json(&status, false);
    }
    match status {
        StoreStatus::Ready { count } => println!("Ready: {count} records"),
        StoreStatus::NoData => println!("No data loaded"),
    }
    Ok(())
}

#[derive(Args)]
pub struct LookupArgs {
    /// Full or partial identifier; its last four characters must be digits
    identifier: String,
    /// Emit JSON
    #[arg(long)]
    json: bool,
}

pub async fn lookup(cfg: &Config, args: LookupArgs) -> Result<()> {
    let typed: String = args
        .identifier
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let Some(suffix) = typed_suffix(&typed) else {
        bail!("identifier must end in {} digits", idfill_store::SUFFIX_LEN);
    };
    let matches = match super::open_store_for_lookup(cfg) {
        Some(store) => store.find_by_suffix_async(&suffix).await?,
        None => Vec::new(),
    };
    if args.json {
        return super::print_json(&matches, true);
    }
    if matches.is_empty() {
        println!("no records end in {suffix}");
    }
    for m in &matches {
        let year = m.birth_year.as_deref().unwrap_or("-");
        println!("{}\t{}\t{}\t{}", m.name, m.suggestion_label(), m.gender, year);
    }
    Ok(())
}
