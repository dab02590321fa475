//! Activity catalog loader.

use std::collections::HashSet;
use std::path::Path;

use pet_core::ActivityDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const DEFAULT_ACTIVITIES: &str = include_str!("../../data/activities.ron");

/// Activity catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCatalog {
    pub activities: Vec<ActivityDefinition>,
}

/// Loader for the activity catalog.
pub struct ActivityLoader;

impl ActivityLoader {
    /// Built-in catalog shipped with the crate.
    pub fn embedded() -> LoadResult<Vec<ActivityDefinition>> {
        Self::parse(DEFAULT_ACTIVITIES)
    }

    /// Load activity catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ActivityDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a RON activity catalog.
    ///
    /// Names must be unique; lookups are by name.
    pub fn parse(content: &str) -> LoadResult<Vec<ActivityDefinition>> {
        let catalog: ActivityCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse activity catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for activity in &catalog.activities {
            if !seen.insert(activity.name.as_str()) {
                anyhow::bail!("Duplicate activity name '{}'", activity.name);
            }
        }

        Ok(catalog.activities)
    }
}
