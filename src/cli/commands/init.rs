//! Default config file creation

use crate::config::Config;
use std::path::Path;

/// Writes the default config to `target`, or to `config.toml` in the working
/// directory when no `--config` was given.
pub fn cmd_init(target: Option<&Path>) -> anyhow::Result<()> {
    let path = target.map_or_else(Config::default_config_path, Path::to_path_buf);

    if Config::create_default_if_missing(&path)? {
        println!("Created {} with default settings.", path.display());
        println!("Edit it, then run: moviedb init-db");
    } else {
        println!("{} already exists, left untouched.", path.display());
    }
    Ok(())
}
