//! Records shared by repository implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pet_core::{ActivityOutcome, Attributes, PetId};

/// One applied activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub pet: PetId,
    pub activity: String,
    pub performed_at: DateTime<Utc>,
    pub before: Attributes,
    pub after: Attributes,
    pub experience_gained: u64,
}

impl ActivityLogEntry {
    pub fn from_outcome(outcome: &ActivityOutcome, performed_at: DateTime<Utc>) -> Self {
        Self {
            pet: outcome.after.id,
            activity: outcome.activity.clone(),
            performed_at,
            before: outcome.before.attributes,
            after: outcome.after.attributes,
            experience_gained: outcome.experience_gained,
        }
    }
}
