//! Content factory for building catalogs from a data directory.

use std::path::{Path, PathBuf};

use pet_core::{AchievementTemplate, ActivityDefinition, SceneDefinition, SimConfig};

use crate::loaders::{AchievementLoader, ActivityLoader, ConfigLoader, LoadResult, SceneLoader};

/// Content factory that loads pet content from a data directory.
///
/// Files absent from the directory fall back to the embedded defaults.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── activities.ron
/// ├── scenes.ron
/// └── achievements.ron
/// ```
pub struct ContentFactory {
    data_dir: Option<PathBuf>,
}

impl ContentFactory {
    /// Creates a factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    /// Creates a factory serving only the embedded defaults.
    pub fn embedded() -> Self {
        Self { data_dir: None }
    }

    pub fn load_config(&self) -> LoadResult<SimConfig> {
        match self.existing("config.toml") {
            Some(path) => ConfigLoader::load(&path),
            None => Ok(SimConfig::default()),
        }
    }

    pub fn load_activities(&self) -> LoadResult<Vec<ActivityDefinition>> {
        match self.existing("activities.ron") {
            Some(path) => ActivityLoader::load(&path),
            None => ActivityLoader::embedded(),
        }
    }

    pub fn load_scenes(&self) -> LoadResult<Vec<SceneDefinition>> {
        match self.existing("scenes.ron") {
            Some(path) => SceneLoader::load(&path),
            None => SceneLoader::embedded(),
        }
    }

    pub fn load_achievements(&self) -> LoadResult<Vec<AchievementTemplate>> {
        match self.existing("achievements.ron") {
            Some(path) => AchievementLoader::load(&path),
            None => AchievementLoader::embedded(),
        }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    fn existing(&self, file: &str) -> Option<PathBuf> {
        let path = self.data_dir.as_ref()?.join(file);
        path.is_file().then_some(path)
    }
}

impl Default for ContentFactory {
    fn default() -> Self {
        Self::embedded()
    }
}
