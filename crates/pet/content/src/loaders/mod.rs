//! Content loaders for reading pet data from files.
//!
//! Each loader parses a string (used for the embedded defaults) or a file on
//! disk, and validates the catalog before handing it out.

pub mod achievements;
pub mod activities;
pub mod config;
pub mod factory;
pub mod scenes;

pub use achievements::{AchievementEntry, AchievementLoader};
pub use activities::ActivityLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use scenes::SceneLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
