//! Config command handlers (show, init, path)

use std::path::Path;

use daystamp_core::config::Config;

/// Print the effective config as TOML
pub fn handle_show(config: &Config) -> Result<(), String> {
    let toml = config.to_toml().map_err(|e| e.to_string())?;
    print!("{}", toml);
    Ok(())
}

/// Write a default config file
pub fn handle_init(path: Option<&Path>, force: bool) -> Result<(), String> {
    let path = path.ok_or("Could not determine config directory")?;
    Config::init_at(path, force).map_err(|e| e.to_string())?;
    println!("✓ Created config at {}", path.display());
    Ok(())
}

/// Print the config file path
pub fn handle_path(path: Option<&Path>) -> Result<(), String> {
    let path = path.ok_or("Could not determine config directory")?;
    println!("{}", path.display());
    Ok(())
}
