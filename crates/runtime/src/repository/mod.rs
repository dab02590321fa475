//! Repository layer for dynamic per-pet data
//!
//! Repositories handle data that CHANGES during a session:
//! - Pet state (for save/load)
//! - Achievement records
//! - The append-only activity log
//!
//! Static content (activities, scenes, achievement templates) is handled by
//! Oracles, not Repositories.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileRepository;
pub use memory::InMemoryRepository;
pub use traits::PetRepository;
pub use types::ActivityLogEntry;

/// Runs a repository call, retrying once on failure.
pub(crate) fn retry_once<T>(mut op: impl FnMut() -> Result<T>) -> Result<T> {
    op().or_else(|_| op())
}
