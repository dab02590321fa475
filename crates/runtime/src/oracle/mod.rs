//! Runtime wrappers around static pet content oracles.
//!
//! These implementations expose `pet-core` oracle traits and bundle them into
//! an [`OracleManager`] so the runtime can build [`pet_core::PetEnv`] snapshots
//! on demand. The data is immutable at runtime; dynamic state lives in
//! repositories or [`pet_core::PetState`].
mod achievements;
mod activities;
mod scenes;

use pet_content::ContentFactory;
use pet_core::PetEnv;
use std::sync::Arc;

pub use achievements::AchievementOracleImpl;
pub use activities::ActivityOracleImpl;
pub use scenes::SceneOracleImpl;

use crate::api::{Result, RuntimeError};

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) activities: Arc<ActivityOracleImpl>,
    pub(crate) scenes: Arc<SceneOracleImpl>,
    pub(crate) achievements: Arc<AchievementOracleImpl>,
}

impl OracleManager {
    /// Creates a new oracle manager
    pub fn new(
        activities: Arc<ActivityOracleImpl>,
        scenes: Arc<SceneOracleImpl>,
        achievements: Arc<AchievementOracleImpl>,
    ) -> Self {
        Self {
            activities,
            scenes,
            achievements,
        }
    }

    /// Loads every catalog through a content factory.
    pub fn load(factory: &ContentFactory) -> Result<Self> {
        let activities = factory
            .load_activities()
            .map_err(|e| RuntimeError::Catalog(format!("{e:#}")))?;
        let scenes = factory
            .load_scenes()
            .map_err(|e| RuntimeError::Catalog(format!("{e:#}")))?;
        let achievements = factory
            .load_achievements()
            .map_err(|e| RuntimeError::Catalog(format!("{e:#}")))?;

        if activities.is_empty() {
            return Err(RuntimeError::MissingCatalogs);
        }
        let scenes = SceneOracleImpl::new(scenes).ok_or(RuntimeError::MissingCatalogs)?;

        Ok(Self::new(
            Arc::new(ActivityOracleImpl::new(activities)),
            Arc::new(scenes),
            Arc::new(AchievementOracleImpl::new(achievements)),
        ))
    }

    /// Loads the catalogs embedded in `pet-content`.
    pub fn load_default() -> Result<Self> {
        Self::load(&ContentFactory::embedded())
    }

    /// Converts oracle manager into PetEnv for pet-core
    pub fn as_env(&self) -> PetEnv<'_> {
        PetEnv::new(
            self.activities.as_ref(),
            self.scenes.as_ref(),
            self.achievements.as_ref(),
        )
    }

    pub fn activities(&self) -> &ActivityOracleImpl {
        &self.activities
    }

    pub fn scenes(&self) -> &SceneOracleImpl {
        &self.scenes
    }

    pub fn achievements(&self) -> &AchievementOracleImpl {
        &self.achievements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pet_core::{AchievementOracle, ActivityOracle, SceneOracle};

    #[test]
    fn default_catalogs_load() {
        let oracles = OracleManager::load_default().unwrap();

        assert_eq!(oracles.activities().activities().len(), 8);
        assert_eq!(oracles.scenes().home().name, "normal_home");
        assert_eq!(oracles.achievements().templates().len(), 7);
        assert!(oracles.as_env().activities().activity("Walk").is_some());
    }
}
