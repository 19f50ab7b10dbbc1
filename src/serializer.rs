//! Serialization module for writing the resolved operation model as YAML or JSON.
//!
//! The output is the normalized model itself (`path -> method -> operation`); shaping it
//! into a particular API-description format is left to downstream tooling.

use crate::operation::Operations;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes the operation model to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(operations: &Operations) -> Result<String> {
    debug!("Serializing {} paths to YAML", operations.len());
    serde_yaml::to_string(operations).context("Failed to serialize operations to YAML")
}

/// Serializes the operation model to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(operations: &Operations) -> Result<String> {
    debug!("Serializing {} paths to JSON", operations.len());
    serde_json::to_string_pretty(operations).context("Failed to serialize operations to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
