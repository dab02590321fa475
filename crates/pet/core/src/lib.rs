//! Deterministic pet life-simulation rules.
//!
//! `pet-core` defines the canonical state of a pet and the pure functions that
//! evolve it: clamped attribute updates, activity resolution with leveling,
//! the periodic decay step, achievement evaluation, and mood/scene derivation.
//! All state mutation flows through [`engine::PetEngine`]; the async runtime
//! and content loaders depend on the types re-exported here.
pub mod achievement;
pub mod activity;
pub mod config;
pub mod decay;
pub mod engine;
pub mod env;
pub mod error;
pub mod mood;
pub mod state;

pub use achievement::{
    AchievementDefinition, AchievementEvaluator, AchievementTemplate, ActivityHistory, Requirement,
};
pub use activity::{ActivityDefinition, ActivityError, ActivityOutcome, ActivityResolver};
pub use config::SimConfig;
pub use decay::{DecayStep, TickOutcome};
pub use engine::PetEngine;
pub use env::{AchievementOracle, ActivityOracle, PetEnv, SceneOracle};
pub use error::{ErrorSeverity, PetError};
pub use mood::{ActionContext, Mood, SceneDefinition, available_scenes, derive_mood, select_scene};
pub use state::{
    Attribute, AttributeDelta, Attributes, InvariantViolation, PetId, PetProfile, PetState,
};
