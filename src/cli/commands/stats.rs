//! Row counts per table

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_stats(config: &Config) -> anyhow::Result<()> {
    let store = Store::connect(&config.store.database_url).await?;
    let counts = store.counts().await?;

    println!("Database: {}", config.store.database_url);
    println!("{:-<70}", "");
    for count in counts {
        println!("  {:<28} {:>10}", count.table, count.rows);
    }
    println!("{:-<70}", "");

    if let Some(year) = store.latest_release_year().await? {
        println!("Latest release year: {year}");
    }

    Ok(())
}
