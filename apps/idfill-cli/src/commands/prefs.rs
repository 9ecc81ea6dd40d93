use anyhow::Result;
use clap::{Args, Subcommand};
use idfill_core::prefs::{load_prefs, prefs_path, save_prefs};
use idfill_core::{Config, FillDefaults};

#[derive(Subcommand)]
pub enum PrefsCmd {
    /// Print the effective fill defaults (JSON)
    Show,
    /// Update one or both defaults
    Set(SetArgs),
}

#[derive(Args)]
pub struct SetArgs {
    #[arg(long)]
    sub_district: Option<String>,
    #[arg(long)]
    block: Option<String>,
}

pub fn effective_defaults(cfg: &Config) -> Result<FillDefaults> {
    let path = prefs_path(&idfill_core::state_dir());
    load_prefs(&path, FillDefaults::from_config(&cfg.defaults))
}

pub fn run(cfg: &Config, cmd: PrefsCmd) -> Result<()> {
    match cmd {
        PrefsCmd::Show => super::print_json(&effective_defaults(cfg)?, true),
        PrefsCmd::Set(args) => {
            let mut prefs = effective_defaults(cfg)?;
            if let Some(v) = args.sub_district {
                prefs.sub_district = v.trim().to_string();
            }
            if let Some(v) = args.block {
                prefs.block = v.trim().to_string();
            }
            let path = prefs_path(&idfill_core::state_dir());
            save_prefs(&path, &prefs)?;
            tracing::info!(path = %path.display(), "fill defaults saved");
            super::print_json(&prefs, true)
        }
    }
}
