//! Snapshot file handling

use anyhow::{Context, Result};
use rwa_registry::{RegistryConfig, RegistrySnapshot, RwaRegistry};
use std::fs;
use std::path::Path;

/// Load the registry config, falling back to defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<RegistryConfig> {
    match path {
        Some(path) => RegistryConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(RegistryConfig::default()),
    }
}

/// Read and validate a snapshot file
pub fn load(path: &Path) -> Result<RwaRegistry> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot = RegistrySnapshot::from_json(&text)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    RwaRegistry::restore(snapshot).with_context(|| format!("restoring {}", path.display()))
}

/// Write a snapshot file, replacing any previous content in one rename
pub fn save(path: &Path, registry: &RwaRegistry) -> Result<()> {
    let json = registry.snapshot().to_json()?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("replacing snapshot {}", path.display()));
    }
    tracing::debug!(path = %path.display(), "snapshot saved");
    Ok(())
}
