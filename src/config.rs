use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Locations of everything weekspend keeps between runs.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    data_dir: PathBuf,
    reference_override: Option<PathBuf>,
}

impl Config {
    /// Resolve the per-user data directory and make sure it exists.
    pub(crate) fn load() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "weekspend", "weekspend")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::at(proj_dirs.data_dir())
    }

    /// Use `dir` as the data directory, creating it if needed.
    pub(crate) fn at(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Ok(Self {
            data_dir: dir.to_path_buf(),
            reference_override: None,
        })
    }

    /// Read benchmark figures from `path` instead of the data directory.
    pub(crate) fn with_reference(mut self, path: PathBuf) -> Self {
        self.reference_override = Some(path);
        self
    }

    pub(crate) fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub(crate) fn groups_path(&self) -> PathBuf {
        self.data_dir.join("category_groups.json")
    }

    pub(crate) fn budgets_path(&self) -> PathBuf {
        self.data_dir.join("budgets.json")
    }

    pub(crate) fn rules_path(&self) -> PathBuf {
        self.data_dir.join("rules.json")
    }

    pub(crate) fn reference_path(&self) -> PathBuf {
        self.reference_override
            .clone()
            .unwrap_or_else(|| self.data_dir.join("benchmarks.json"))
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join("weekspend.log")
    }
}
