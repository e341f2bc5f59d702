use anyhow::Result;
use cognita_config::Config;
use std::path::Path;

/// Write the example config to `path`, or to the default location
pub fn execute(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };
    Config::write_example(&path)?;
    println!("Wrote example config to {}", path.display());
    Ok(())
}
