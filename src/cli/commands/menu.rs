//! Interactive query menu command

use crate::cli::menu::Menu;
use crate::config::Config;
use crate::db::Store;

pub async fn cmd_menu(config: &Config) -> anyhow::Result<()> {
    let store = Store::connect(&config.store.database_url).await?;
    store.initialize_schema().await?;
    println!("Connected to {}", config.store.database_url);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut menu = Menu::new(&store, &config.analytics, stdin.lock(), stdout.lock());
    menu.run().await
}
