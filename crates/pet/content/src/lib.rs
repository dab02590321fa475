//! Data-driven pet content and loaders.
//!
//! This crate ships the default catalogs and reads RON/TOML overrides:
//! - Activity catalog (RON)
//! - Scene catalog (RON)
//! - Achievement templates (RON)
//! - Simulation tuning (TOML)
//!
//! Content is consumed by runtime oracles and never appears in pet state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AchievementEntry, AchievementLoader, ActivityLoader, ConfigLoader, ContentFactory, SceneLoader,
};
