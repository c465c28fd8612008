use std::path::Path;

use crate::config::Config;

pub fn cmd_init(path: Option<&Path>) -> anyhow::Result<()> {
    let default_path = Config::default_config_path();
    let path = path.unwrap_or(&default_path);

    if Config::create_default_if_missing(path)? {
        println!("Created default config at {}", path.display());
    } else {
        println!("Config already exists at {}", path.display());
    }

    Ok(())
}
