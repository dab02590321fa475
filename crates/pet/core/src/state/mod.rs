//! Canonical pet state.
//!
//! [`PetState`] is owned exclusively by the simulation engine. The
//! presentation layer only ever sees cloned snapshots of it.
mod attributes;
mod error;

pub use attributes::{Attribute, AttributeDelta, Attributes, clamp_attribute};
pub use error::InvariantViolation;

use chrono::{DateTime, Utc};

/// Opaque pet identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PetId(pub u64);

impl core::fmt::Display for PetId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive identity of a pet. Survives resets.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PetProfile {
    pub name: String,
    pub species: String,
    pub breed: String,
}

impl PetProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for PetProfile {
    fn default() -> Self {
        Self {
            name: "Buddy".to_string(),
            species: "dog".to_string(),
            breed: "mixed".to_string(),
        }
    }
}

/// Complete simulation state of one pet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PetState {
    pub id: PetId,
    pub profile: PetProfile,
    pub attributes: Attributes,
    /// Always at least 1.
    pub level: u32,
    pub experience: u64,
    /// Seconds of sustained neglect.
    pub neglect_timer: u32,
    created_at: DateTime<Utc>,
}

impl PetState {
    /// A freshly created pet: every attribute at 100, level 1, no experience.
    pub fn new(id: PetId, profile: PetProfile, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            profile,
            attributes: Attributes::FULL,
            level: 1,
            experience: 0,
            neglect_timer: 0,
            created_at,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Restores the initial values while keeping identity and creation time.
    pub fn reset(&mut self) {
        self.attributes = Attributes::FULL;
        self.level = 1;
        self.experience = 0;
        self.neglect_timer = 0;
    }

    /// Clamped update of the bounded attributes.
    pub fn apply_delta(&mut self, delta: &AttributeDelta) -> &PetState {
        self.attributes.apply_delta(delta);
        self
    }

    /// Adds experience and returns the new total.
    pub fn gain_experience(&mut self, amount: u64) -> u64 {
        self.experience = self.experience.saturating_add(amount);
        self.experience
    }

    /// Raises the level by exactly one.
    pub fn level_up(&mut self) -> u32 {
        self.level = self.level.saturating_add(1);
        self.level
    }

    /// Whole days elapsed since creation, floored; never negative.
    pub fn days_alive(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days().max(0)
    }

    /// Checks the structural invariants of a state obtained from storage.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if let Some((attribute, value)) = self.attributes.out_of_range() {
            return Err(InvariantViolation::AttributeOutOfRange {
                pet: self.id,
                attribute,
                value,
            });
        }
        if self.level < 1 {
            return Err(InvariantViolation::LevelBelowOne {
                pet: self.id,
                level: self.level,
            });
        }
        Ok(())
    }
}
