//! Dataset load command

use crate::config::Config;
use crate::dataset::Dataset;
use crate::db::Store;
use crate::loader::{Loader, PassOutcome};
use anyhow::Context;
use std::path::Path;

pub async fn cmd_load(config: &Config, csv: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = csv.unwrap_or(config.dataset.path.as_path());

    let store = Store::connect(&config.store.database_url).await?;
    store.initialize_schema().await?;

    let dataset = Dataset::from_path(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    println!("Read {} rows from {}", dataset.len(), path.display());

    let mut loader_config = config.loader.clone();
    loader_config.force = force;

    let report = Loader::new(&store, loader_config).run(&dataset).await?;

    println!("{:-<70}", "");
    for pass in &report.passes {
        match &pass.outcome {
            PassOutcome::Committed { rows } => {
                println!("  {:<28} committed   {rows:>8} rows", pass.pass);
            }
            PassOutcome::RolledBack { error } => {
                println!("  {:<28} ROLLED BACK {error}", pass.pass);
            }
        }
    }
    println!("{:-<70}", "");

    let failed = report.rolled_back().count();
    if failed > 0 {
        anyhow::bail!("{failed} pass(es) rolled back");
    }

    println!("Load complete.");
    Ok(())
}
