use crate::config::default_config_template;
use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

const CONFIG_FILE: &str = "riskmap.toml";

/// Write the commented default configuration to `riskmap.toml` in the
/// current directory.
pub fn init_config(force: bool) -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() && !force {
        bail!("{CONFIG_FILE} already exists; use --force to overwrite");
    }
    fs::write(path, default_config_template()?)?;
    println!("Wrote {CONFIG_FILE}");
    Ok(())
}
