//! Traits describing the read-only catalogs.
//!
//! Oracles expose the activity catalog, the scene catalog and the achievement
//! templates. The [`PetEnv`] aggregate bundles them so the engine can reach
//! everything it needs without coupling to concrete implementations.

use crate::achievement::AchievementTemplate;
use crate::activity::ActivityDefinition;
use crate::mood::SceneDefinition;

/// Immutable catalog of activities, keyed by unique name.
pub trait ActivityOracle: Send + Sync {
    fn activity(&self, name: &str) -> Option<&ActivityDefinition>;

    /// All activities in catalog order.
    fn activities(&self) -> &[ActivityDefinition];
}

/// Immutable catalog of scenes.
pub trait SceneOracle: Send + Sync {
    /// All scenes in catalog order.
    fn scenes(&self) -> &[SceneDefinition];

    /// The designated fallback scene. Must always exist.
    fn home(&self) -> &SceneDefinition;
}

/// Achievement templates instantiated once per pet.
pub trait AchievementOracle: Send + Sync {
    fn templates(&self) -> &[AchievementTemplate];
}

/// Aggregates the read-only oracles required by [`crate::PetEngine`].
#[derive(Clone, Copy)]
pub struct PetEnv<'a> {
    activities: &'a dyn ActivityOracle,
    scenes: &'a dyn SceneOracle,
    achievements: &'a dyn AchievementOracle,
}

impl<'a> PetEnv<'a> {
    pub fn new(
        activities: &'a dyn ActivityOracle,
        scenes: &'a dyn SceneOracle,
        achievements: &'a dyn AchievementOracle,
    ) -> Self {
        Self {
            activities,
            scenes,
            achievements,
        }
    }

    pub fn activities(&self) -> &'a dyn ActivityOracle {
        self.activities
    }

    pub fn scenes(&self) -> &'a dyn SceneOracle {
        self.scenes
    }

    pub fn achievements(&self) -> &'a dyn AchievementOracle {
        self.achievements
    }
}
