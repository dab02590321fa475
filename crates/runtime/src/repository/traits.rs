//! Repository contract for saving and loading per-pet data.

use pet_core::{AchievementDefinition, PetId, PetState};

use super::error::Result;
use super::types::ActivityLogEntry;

/// Storage gateway used by the runtime.
///
/// Calls are synchronous and made off the simulation worker, so
/// implementations may block on I/O. Pets never share records.
pub trait PetRepository: Send + Sync {
    /// Store a newly created pet with its locked achievement set.
    fn create_pet(&self, state: &PetState, achievements: &[AchievementDefinition]) -> Result<()>;

    /// Load a pet, `None` if it was never created.
    fn load_pet(&self, pet: PetId) -> Result<Option<PetState>>;

    /// Overwrite the stored state of an existing pet.
    fn save_pet(&self, state: &PetState) -> Result<()>;

    /// Append to the activity log. Entries are never mutated or deleted.
    fn append_activity_log(&self, entry: &ActivityLogEntry) -> Result<()>;

    fn load_achievements(&self, pet: PetId) -> Result<Vec<AchievementDefinition>>;

    /// Insert or replace one achievement record, keyed by name.
    fn save_achievement(&self, pet: PetId, achievement: &AchievementDefinition) -> Result<()>;

    /// How many times `activity` appears in the pet's log.
    fn count_activity(&self, pet: PetId, activity: &str) -> Result<u64>;
}
