//! State validation errors.

use crate::error::{ErrorSeverity, PetError};
use crate::state::{Attribute, PetId};

/// A pet state violates one of its structural invariants.
///
/// Raised when validating a state obtained from outside the engine (for
/// example a save file). The engine never produces such a state itself.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvariantViolation {
    /// A bounded attribute is outside `[0, 100]`.
    #[error("pet {pet}: {attribute} is {value}, expected a value in [0, 100]")]
    AttributeOutOfRange {
        pet: PetId,
        attribute: Attribute,
        value: i32,
    },

    /// Level must be at least 1.
    #[error("pet {pet}: level {level} is below 1")]
    LevelBelowOne { pet: PetId, level: u32 },
}

impl PetError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        // Corrupted state is reinitialized to defaults, play continues.
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AttributeOutOfRange { .. } => "INVARIANT_ATTRIBUTE_OUT_OF_RANGE",
            Self::LevelBelowOne { .. } => "INVARIANT_LEVEL_BELOW_ONE",
        }
    }
}
