//! Activity resolution: effect vector, experience, leveling.

use crate::config::SimConfig;
use crate::env::ActivityOracle;
use crate::error::{ErrorSeverity, PetError};
use crate::mood::ActionContext;
use crate::state::{AttributeDelta, PetState};

/// Catalog entry for a player action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityDefinition {
    /// Unique key.
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub effect: AttributeDelta,
    pub experience_points: u32,
    /// Mood shown while the activity is in flight.
    #[cfg_attr(feature = "serde", serde(default))]
    pub context: Option<ActionContext>,
}

impl ActivityDefinition {
    pub fn new(name: impl Into<String>, effect: AttributeDelta, experience_points: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            effect,
            experience_points,
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: ActionContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Errors raised while resolving an activity.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivityError {
    #[error("activity '{name}' not found in catalog")]
    NotFound { name: String },
}

impl PetError for ActivityError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "ACTIVITY_NOT_FOUND",
        }
    }
}

/// Result of resolving one activity against a pet state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityOutcome {
    pub activity: String,
    pub before: PetState,
    pub after: PetState,
    pub experience_gained: u64,
    pub leveled_up: bool,
    pub context: Option<ActionContext>,
}

/// Applies catalog activities to a pet state.
#[derive(Clone, Copy, Debug)]
pub struct ActivityResolver<'a> {
    config: &'a SimConfig,
}

impl<'a> ActivityResolver<'a> {
    pub fn new(config: &'a SimConfig) -> Self {
        Self { config }
    }

    /// Resolves `name` against `state` without touching it.
    ///
    /// At most one level is gained per application, even when the new
    /// experience total overshoots several thresholds.
    pub fn apply<O>(
        &self,
        activities: &O,
        name: &str,
        state: &PetState,
    ) -> Result<ActivityOutcome, ActivityError>
    where
        O: ActivityOracle + ?Sized,
    {
        let definition = activities
            .activity(name)
            .ok_or_else(|| ActivityError::NotFound {
                name: name.to_string(),
            })?;

        let mut after = state.clone();
        after.apply_delta(&definition.effect);

        let experience_gained = u64::from(definition.experience_points);
        let experience = after.gain_experience(experience_gained);

        let threshold = self.config.level_threshold(state.level);
        let leveled_up = experience >= threshold;
        if leveled_up {
            after.level_up();
        }

        Ok(ActivityOutcome {
            activity: definition.name.clone(),
            before: state.clone(),
            after,
            experience_gained,
            leveled_up,
            context: definition.context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Attributes, PetId, PetProfile};
    use chrono::Utc;

    struct Catalog(Vec<ActivityDefinition>);

    impl ActivityOracle for Catalog {
        fn activity(&self, name: &str) -> Option<&ActivityDefinition> {
            self.0.iter().find(|a| a.name == name)
        }

        fn activities(&self) -> &[ActivityDefinition] {
            &self.0
        }
    }

    fn catalog() -> Catalog {
        Catalog(vec![
            ActivityDefinition::new("Feed Pet", AttributeDelta::new(5, 20, 10, -5, 0), 10)
                .with_context(ActionContext::Eating),
            ActivityDefinition::new("Training", AttributeDelta::new(10, -5, 15, -10, 0), 25)
                .with_context(ActionContext::Playing),
            ActivityDefinition::new("Idle", AttributeDelta::ZERO, 0),
            ActivityDefinition::new("Jackpot", AttributeDelta::ZERO, 450),
        ])
    }

    fn pet() -> PetState {
        PetState::new(PetId(1), PetProfile::default(), Utc::now())
    }

    #[test]
    fn feeding_a_fresh_pet_clamps_at_full() {
        let config = SimConfig::default();
        let outcome = ActivityResolver::new(&config)
            .apply(&catalog(), "Feed Pet", &pet())
            .unwrap();

        let after = &outcome.after;
        assert_eq!(after.attributes, Attributes::clamped(100, 100, 100, 95, 100));
        assert_eq!(after.experience, 10);
        assert_eq!(after.level, 1);
        assert_eq!(outcome.experience_gained, 10);
        assert!(!outcome.leveled_up);
        assert_eq!(outcome.context, Some(ActionContext::Eating));
    }

    #[test]
    fn crossing_threshold_levels_up() {
        let config = SimConfig::default();
        let mut state = pet();
        state.experience = 95;

        let outcome = ActivityResolver::new(&config)
            .apply(&catalog(), "Training", &state)
            .unwrap();

        assert_eq!(outcome.after.experience, 120);
        assert_eq!(outcome.after.level, 2);
        assert!(outcome.leveled_up);
    }

    #[test]
    fn overshoot_gains_a_single_level() {
        let config = SimConfig::default();
        let mut state = pet();
        state.experience = 90;

        let outcome = ActivityResolver::new(&config)
            .apply(&catalog(), "Jackpot", &state)
            .unwrap();

        assert_eq!(outcome.after.experience, 540);
        assert_eq!(outcome.after.level, 2);
    }

    #[test]
    fn zero_activity_leaves_state_unchanged() {
        let config = SimConfig::default();
        let mut state = pet();
        state.attributes = Attributes::clamped(33, 44, 55, 66, 77);
        state.level = 3;

        let outcome = ActivityResolver::new(&config)
            .apply(&catalog(), "Idle", &state)
            .unwrap();

        assert_eq!(outcome.after.attributes, state.attributes);
        assert_eq!(outcome.after.level, 3);
        assert_eq!(outcome.after.experience, state.experience);
    }

    #[test]
    fn unknown_activity_is_not_found() {
        let config = SimConfig::default();
        let state = pet();

        let error = ActivityResolver::new(&config)
            .apply(&catalog(), "Juggling", &state)
            .unwrap_err();

        assert_eq!(
            error,
            ActivityError::NotFound {
                name: "Juggling".to_string()
            }
        );
        assert_eq!(error.severity(), ErrorSeverity::Validation);
    }
}
