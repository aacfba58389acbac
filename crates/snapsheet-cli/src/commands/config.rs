use std::path::Path;

use anyhow::Result;

use snapsheet_core::SheetConfig;

use crate::OutputFormat;

pub fn show(config: &SheetConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}

pub fn path(explicit: Option<&Path>) -> Result<()> {
    match explicit {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", SheetConfig::config_path().display()),
    }
    Ok(())
}

pub fn init() -> Result<()> {
    let path = SheetConfig::config_path();
    if path.exists() {
        println!("Configuration already exists at {}", path.display());
        return Ok(());
    }

    SheetConfig::default().save()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
