//! One-time import of the legacy per-type task blacklist.

use serde::Deserialize;
use sim_world::SimulationHost;
use std::path::{Path, PathBuf};

use crate::config::SituationSettings;
use crate::error::ConfigError;

/// Where legacy blacklist entries come from.
pub trait LegacyBlacklistSource {
    /// Root task type ids listed by the legacy blacklist.
    fn load_roots(&self) -> Result<Vec<String>, ConfigError>;
}

/// A legacy blacklist stored as TOML: `blacklisted_roots = ["..."]`.
#[derive(Debug, Clone)]
pub struct LegacyBlacklistFile {
    path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyBlacklistDoc {
    #[serde(default)]
    blacklisted_roots: Vec<String>,
}

impl LegacyBlacklistFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LegacyBlacklistSource for LegacyBlacklistFile {
    fn load_roots(&self) -> Result<Vec<String>, ConfigError> {
        let content = std::fs::read_to_string(&self.path)?;
        let doc: LegacyBlacklistDoc = toml::from_str(&content)?;
        Ok(doc.blacklisted_roots)
    }
}

impl LegacyBlacklistSource for Vec<String> {
    fn load_roots(&self) -> Result<Vec<String>, ConfigError> {
        Ok(self.clone())
    }
}

/// Move legacy entries the host still knows into the global type blacklist.
///
/// Runs once per settings file. The migrated flag is set even when the source
/// cannot be read, so a broken legacy file is not retried on every load.
/// Returns `true` when the settings changed and should be persisted.
pub fn migrate_legacy_blacklist(
    settings: &mut SituationSettings,
    source: &dyn LegacyBlacklistSource,
    host: &dyn SimulationHost,
) -> bool {
    if settings.legacy_blacklist_migrated {
        return false;
    }
    settings.legacy_blacklist_migrated = true;

    let roots = match source.load_roots() {
        Ok(roots) => roots,
        Err(e) => {
            tracing::error!("Legacy blacklist migration failed: {}", e);
            return true;
        }
    };

    let (known, skipped): (Vec<String>, Vec<String>) = roots
        .into_iter()
        .filter(|r| !r.is_empty())
        .partition(|r| host.knows_task_type(r));

    if known.is_empty() && skipped.is_empty() {
        tracing::info!("Legacy blacklist migration completed: no entries found");
        return true;
    }

    if !known.is_empty() {
        tracing::info!(
            "Migrated {} task type(s) to the type filter: {}",
            known.len(),
            known.join(", ")
        );
    }
    if !skipped.is_empty() {
        tracing::info!(
            "Skipped {} task type(s) unknown to the loaded content: {}",
            skipped.len(),
            skipped.join(", ")
        );
    }

    for root in known {
        settings.disable_type(root);
    }
    true
}
