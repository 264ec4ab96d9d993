use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One project scene slot in the manifest: the scene identifier plus an
/// optional model file. A missing or unloadable model means the fallback
/// geometry gets attached instead.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSlot {
    pub id: String,
    #[serde(default)]
    pub model: Option<PathBuf>,
}

/// Demo-binary manifest listing the project scenes to register.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StageConfig {
    #[serde(default)]
    pub projects: Vec<ProjectSlot>,
}

impl StageConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse manifest {:?}", path))
    }
}
