//! Achievement template loader.

use std::collections::HashSet;
use std::path::Path;

use pet_core::{AchievementTemplate, Requirement};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const DEFAULT_ACHIEVEMENTS: &str = include_str!("../../data/achievements.ron");

/// Achievement entry as written in data files.
///
/// The requirement is a kind string; `activity` names the activity for
/// `activity_count` requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementEntry {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub points: u32,
    pub requirement: String,
    #[serde(default)]
    pub activity: Option<String>,
    pub value: u64,
}

impl AchievementEntry {
    pub fn into_template(self) -> AchievementTemplate {
        AchievementTemplate {
            requirement: Requirement::from_kind(&self.requirement, self.activity),
            name: self.name,
            category: self.category,
            description: self.description,
            icon: self.icon,
            points: self.points,
            value: self.value,
        }
    }
}

/// Achievement catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementCatalog {
    pub achievements: Vec<AchievementEntry>,
}

/// Loader for achievement templates.
pub struct AchievementLoader;

impl AchievementLoader {
    pub fn embedded() -> LoadResult<Vec<AchievementTemplate>> {
        Self::parse(DEFAULT_ACHIEVEMENTS)
    }

    pub fn load(path: &Path) -> LoadResult<Vec<AchievementTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a RON achievement catalog.
    ///
    /// Unknown requirement kinds are kept as unsupported templates.
    pub fn parse(content: &str) -> LoadResult<Vec<AchievementTemplate>> {
        let catalog: AchievementCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse achievement catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for spec in &catalog.achievements {
            if !seen.insert(spec.name.as_str()) {
                anyhow::bail!("Duplicate achievement name '{}'", spec.name);
            }
        }

        Ok(catalog
            .achievements
            .into_iter()
            .map(AchievementEntry::into_template)
            .collect())
    }
}
