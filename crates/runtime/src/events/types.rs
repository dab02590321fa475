//! Event types for different topics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pet_core::{AchievementDefinition, Mood, PetId, PetState, SceneDefinition};

/// Read-only view of a pet handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetSnapshot {
    pub state: PetState,
    pub mood: Mood,
    pub scene: SceneDefinition,
    /// Decay ticker is suspended.
    pub paused: bool,
    pub taken_at: DateTime<Utc>,
}

/// Why a [`PetEvent::StateChanged`] was published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeCause {
    Activity {
        name: String,
        experience_gained: u64,
        leveled_up: bool,
    },
    Tick,
    /// The action context expired and the mood fell back to idle.
    IdleReverted,
}

/// Events about the pet itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PetEvent {
    StateChanged {
        snapshot: Box<PetSnapshot>,
        cause: ChangeCause,
    },

    /// A tick left the pet with health below the mood threshold.
    Sick { pet: PetId, health: i32 },
}

/// Events related to achievements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AchievementEvent {
    Unlocked {
        pet: PetId,
        achievement: Box<AchievementDefinition>,
    },
}

/// Session lifecycle events (lightweight)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// Health reached zero; the pet has been reset to its initial values.
    Died { pet: PetId },

    Paused { pet: PetId },

    Resumed { pet: PetId },

    /// A write failed twice and is queued for the next attempt.
    PersistenceWarning { pet: PetId, error: String },
}
