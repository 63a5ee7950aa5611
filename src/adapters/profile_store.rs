//! Options profile persistence
//!
//! Save/load/list/delete `Options` profiles as pretty-printed JSON files,
//! one `<name>.json` per profile, in a directory chosen by the host.

use std::path::{Path, PathBuf};

use crate::domain::{IqError, IqResult, Options};

/// Name that cannot be deleted
const DEFAULT_PROFILE: &str = "Default";

/// Directory of JSON option profiles
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Open (and create if needed) the profile directory
    pub fn open(dir: impl Into<PathBuf>) -> IqResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            IqError::Profile(format!("Failed to create {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Write `options` under its own name, replacing any existing profile
    pub fn save(&self, options: &Options) -> IqResult<()> {
        let name = sanitize_name(&options.name)?;
        options.validate()?;
        let json = serde_json::to_string_pretty(options)
            .map_err(|e| IqError::Profile(format!("Serialization error: {e}")))?;
        std::fs::write(self.path_for(&name), json)
            .map_err(|e| IqError::Profile(format!("Failed to write profile '{name}': {e}")))?;
        log::info!("saved profile '{name}'");
        Ok(())
    }

    /// Read and validate a profile
    pub fn load(&self, name: &str) -> IqResult<Options> {
        let name = sanitize_name(name)?;
        let json = std::fs::read_to_string(self.path_for(&name))
            .map_err(|e| IqError::Profile(format!("Failed to read profile '{name}': {e}")))?;
        let options: Options = serde_json::from_str(&json)
            .map_err(|e| IqError::Profile(format!("Failed to parse profile '{name}': {e}")))?;
        options.validate()?;
        log::info!("loaded profile '{name}'");
        Ok(options)
    }

    /// Sorted names of all stored profiles
    pub fn list(&self) -> IqResult<Vec<String>> {
        let mut names: Vec<String> = std::fs::read_dir(&self.dir)
            .map_err(|e| IqError::Profile(format!("Failed to read profile dir: {e}")))?
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()?.to_str()? == "json" {
                    path.file_stem()?.to_str().map(String::from)
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> IqResult<()> {
        let name = sanitize_name(name)?;
        if name == DEFAULT_PROFILE {
            return Err(IqError::Profile(
                "Cannot delete the Default profile".to_string(),
            ));
        }
        let path = self.path_for(&name);
        if !path.exists() {
            return Err(IqError::Profile(format!("Profile '{name}' not found")));
        }
        std::fs::remove_file(&path)
            .map_err(|e| IqError::Profile(format!("Failed to delete profile '{name}': {e}")))?;
        log::info!("deleted profile '{name}'");
        Ok(())
    }
}

/// Reject names that could escape the profile directory.
/// Allows alphanumerics, spaces, hyphens and underscores.
fn sanitize_name(name: &str) -> IqResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(IqError::Profile("Profile name cannot be empty".to_string()));
    }
    if trimmed.contains("..") || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(IqError::Profile("Invalid profile name".to_string()));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_')
    {
        return Err(IqError::Profile(
            "Profile name contains invalid characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
