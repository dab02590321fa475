//! Scene catalog loader.

use std::path::Path;

use pet_core::SceneDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const DEFAULT_SCENES: &str = include_str!("../../data/scenes.ron");

/// Scene catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneCatalog {
    pub scenes: Vec<SceneDefinition>,
}

/// Loader for the scene catalog.
pub struct SceneLoader;

impl SceneLoader {
    pub fn embedded() -> LoadResult<Vec<SceneDefinition>> {
        Self::parse(DEFAULT_SCENES)
    }

    pub fn load(path: &Path) -> LoadResult<Vec<SceneDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a RON scene catalog.
    ///
    /// Exactly one scene may omit its mood requirement; that scene is home.
    pub fn parse(content: &str) -> LoadResult<Vec<SceneDefinition>> {
        let catalog: SceneCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scene catalog RON: {}", e))?;

        match catalog.scenes.iter().filter(|s| s.is_home()).count() {
            1 => Ok(catalog.scenes),
            0 => anyhow::bail!("Scene catalog has no home scene"),
            n => anyhow::bail!("Scene catalog has {} home scenes, expected one", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pet_core::Mood;

    #[test]
    fn embedded_catalog_has_home_first() {
        let scenes = SceneLoader::embedded().unwrap();

        assert_eq!(scenes.len(), 8);
        assert_eq!(scenes[0].name, "normal_home");
        assert!(scenes[0].is_home());

        let beach = scenes.iter().find(|s| s.name == "beach").unwrap();
        assert_eq!(beach.mood_requirement, Some(Mood::Happy));
        assert_eq!(beach.unlock_level, 10);
    }

    #[test]
    fn missing_home_is_rejected() {
        let content = r#"(scenes: [
            (name: "play", display_name: "Playground", mood_requirement: Some(playing), unlock_level: 1),
        ])"#;

        assert!(SceneLoader::parse(content).is_err());
    }
}
