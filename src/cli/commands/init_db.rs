//! Schema initializer command

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_init_db(config: &Config) -> anyhow::Result<()> {
    let store = Store::connect(&config.store.database_url).await?;
    store.initialize_schema().await?;
    store.ping().await?;

    println!("Schema ready at {}", config.store.database_url);
    Ok(())
}
