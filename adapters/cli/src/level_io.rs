//! Loading and storing levels and generator settings.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_chase_core::Level;
use maze_chase_system_generation::GenerationConfig;

use crate::level_transfer;

/// Loads a level from a transfer string or a TOML file path and validates it.
pub(crate) fn load_level(source: &str) -> Result<Level> {
    let level = if level_transfer::is_transfer_string(source) {
        level_transfer::decode(source).context("failed to decode level transfer string")?
    } else {
        read_level(Path::new(source))?
    };
    level
        .validate()
        .with_context(|| format!("level from '{source}' is malformed"))?;
    Ok(level)
}

/// Reads a level stored as TOML.
pub(crate) fn read_level(path: &Path) -> Result<Level> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))?;
    level_from_toml(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

/// Writes a level as TOML, creating or replacing the file.
pub(crate) fn write_level(path: &Path, level: &Level) -> Result<()> {
    let contents = level_to_toml(level)?;
    fs::write(path, contents)
        .with_context(|| format!("failed to write level file {}", path.display()))
}

pub(crate) fn level_from_toml(contents: &str) -> Result<Level> {
    toml::from_str(contents).context("failed to parse level toml contents")
}

pub(crate) fn level_to_toml(level: &Level) -> Result<String> {
    toml::to_string(level).context("failed to serialise level as toml")
}

/// Reads generator settings; missing keys fall back to their defaults.
pub(crate) fn read_generation_config(path: &Path) -> Result<GenerationConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read generator config {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse generator config {}", path.display()))
}
