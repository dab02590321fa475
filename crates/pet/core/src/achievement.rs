//! Achievement definitions and their evaluation.
//!
//! Unlocking is monotone: a definition only ever flips from locked to
//! unlocked, and unlocked definitions are never examined again.

use chrono::{DateTime, Utc};

use crate::state::{PetId, PetState};

/// Read access to the append-only activity log.
pub trait ActivityHistory {
    /// How many times `activity` was performed by `pet`.
    fn count(&self, pet: PetId, activity: &str) -> u64;
}

/// Condition guarding an achievement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Requirement {
    /// `level >= value`
    Level,
    /// `happiness >= value`
    Happiness,
    /// `health >= value`
    Health,
    /// Whole days since creation `>= value`
    DaysAlive,
    /// Logged occurrences of an activity `>= value`
    ActivityCount { activity: String },
    /// A kind this engine cannot measure. Never unlocks.
    Unsupported { kind: String },
}

impl Requirement {
    /// Maps a catalog kind string to a requirement.
    ///
    /// `activity_count` needs the activity name; without one, or for any
    /// unknown kind, the requirement is [`Requirement::Unsupported`].
    pub fn from_kind(kind: &str, activity: Option<String>) -> Self {
        match (kind, activity) {
            ("level", _) => Self::Level,
            ("happiness", _) => Self::Happiness,
            ("health", _) => Self::Health,
            ("days_alive", _) => Self::DaysAlive,
            ("activity_count", Some(activity)) => Self::ActivityCount { activity },
            (other, _) => Self::Unsupported {
                kind: other.to_string(),
            },
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::Level => "level",
            Self::Happiness => "happiness",
            Self::Health => "health",
            Self::DaysAlive => "days_alive",
            Self::ActivityCount { .. } => "activity_count",
            Self::Unsupported { kind } => kind,
        }
    }

    /// Current measured quantity, or `None` when the kind is unsupported.
    pub fn measure<H>(&self, state: &PetState, history: &H, now: DateTime<Utc>) -> Option<u64>
    where
        H: ActivityHistory + ?Sized,
    {
        match self {
            Self::Level => Some(u64::from(state.level)),
            Self::Happiness => Some(state.attributes.happiness.max(0) as u64),
            Self::Health => Some(state.attributes.health.max(0) as u64),
            Self::DaysAlive => Some(state.days_alive(now) as u64),
            Self::ActivityCount { activity } => Some(history.count(state.id, activity)),
            Self::Unsupported { .. } => None,
        }
    }
}

/// Static catalog entry, instantiated once per pet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AchievementTemplate {
    pub name: String,
    pub category: String,
    pub description: String,
    pub icon: String,
    pub points: u32,
    pub requirement: Requirement,
    pub value: u64,
}

/// Per-pet achievement record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AchievementDefinition {
    pub name: String,
    pub category: String,
    pub description: String,
    pub icon: String,
    pub points: u32,
    pub requirement: Requirement,
    pub value: u64,
    pub unlocked: bool,
    /// Set once, when unlocked.
    pub unlocked_at: Option<DateTime<Utc>>,
    /// Advisory only; never drives unlocking.
    pub current_progress: u64,
}

impl AchievementDefinition {
    /// Locked instance of a catalog template.
    pub fn from_template(template: &AchievementTemplate) -> Self {
        Self {
            name: template.name.clone(),
            category: template.category.clone(),
            description: template.description.clone(),
            icon: template.icon.clone(),
            points: template.points,
            requirement: template.requirement.clone(),
            value: template.value,
            unlocked: false,
            unlocked_at: None,
            current_progress: 0,
        }
    }

    fn unlock(&mut self, now: DateTime<Utc>) {
        self.unlocked = true;
        self.unlocked_at = Some(now);
        self.current_progress = self.value;
    }
}

/// Scans locked achievements and unlocks those whose requirement holds.
pub struct AchievementEvaluator;

impl AchievementEvaluator {
    /// Evaluates every locked definition in place.
    ///
    /// Returns clones of the definitions unlocked by this call, in input order.
    /// Progress of definitions that stay locked is refreshed.
    pub fn evaluate<H>(
        state: &PetState,
        history: &H,
        definitions: &mut [AchievementDefinition],
        now: DateTime<Utc>,
    ) -> Vec<AchievementDefinition>
    where
        H: ActivityHistory + ?Sized,
    {
        let mut unlocked = Vec::new();

        for definition in definitions.iter_mut().filter(|d| !d.unlocked) {
            let Some(measured) = definition.requirement.measure(state, history, now) else {
                continue;
            };

            if measured >= definition.value {
                definition.unlock(now);
                unlocked.push(definition.clone());
            } else {
                definition.current_progress = measured;
            }
        }

        unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PetProfile;
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;

    #[derive(Default)]
    struct Log(HashMap<String, u64>);

    impl ActivityHistory for Log {
        fn count(&self, _pet: PetId, activity: &str) -> u64 {
            self.0.get(activity).copied().unwrap_or(0)
        }
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn template(name: &str, requirement: Requirement, value: u64) -> AchievementDefinition {
        AchievementDefinition::from_template(&AchievementTemplate {
            name: name.to_string(),
            category: "test".to_string(),
            description: String::new(),
            icon: String::new(),
            points: 10,
            requirement,
            value,
        })
    }

    fn pet() -> PetState {
        PetState::new(PetId(1), PetProfile::default(), epoch())
    }

    #[test]
    fn kind_strings_map_to_requirements() {
        assert_eq!(Requirement::from_kind("level", None), Requirement::Level);
        assert_eq!(
            Requirement::from_kind("activity_count", Some("Walk".into())),
            Requirement::ActivityCount {
                activity: "Walk".into()
            }
        );
        assert_eq!(
            Requirement::from_kind("activity_count", None),
            Requirement::Unsupported {
                kind: "activity_count".into()
            }
        );
        assert_eq!(Requirement::from_kind("health_streak", None).kind(), "health_streak");
    }

    #[test]
    fn attribute_and_level_predicates() {
        let mut state = pet();
        state.level = 10;
        state.attributes.health = 90;

        let mut definitions = vec![
            template("Veteran", Requirement::Level, 10),
            template("Best Friend", Requirement::Happiness, 100),
            template("Healthy", Requirement::Health, 95),
        ];

        let unlocked =
            AchievementEvaluator::evaluate(&state, &Log::default(), &mut definitions, epoch());

        let names: Vec<_> = unlocked.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Veteran", "Best Friend"]);
        assert!(!definitions[2].unlocked);
        assert_eq!(definitions[2].current_progress, 90);
    }

    #[test]
    fn days_alive_uses_elapsed_whole_days() {
        let state = pet();
        let mut definitions = vec![template("First Steps", Requirement::DaysAlive, 1)];

        let now = epoch() + Duration::hours(23);
        assert!(AchievementEvaluator::evaluate(&state, &Log::default(), &mut definitions, now).is_empty());

        let now = epoch() + Duration::hours(24);
        let unlocked = AchievementEvaluator::evaluate(&state, &Log::default(), &mut definitions, now);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(definitions[0].unlocked_at, Some(now));
    }

    #[test]
    fn activity_count_unlocks_on_hundredth_feed() {
        let state = pet();
        let mut log = Log::default();
        log.0.insert("Feed Pet".to_string(), 99);

        let mut definitions = vec![template(
            "Chef",
            Requirement::ActivityCount {
                activity: "Feed Pet".into(),
            },
            100,
        )];

        assert!(AchievementEvaluator::evaluate(&state, &log, &mut definitions, epoch()).is_empty());
        assert_eq!(definitions[0].current_progress, 99);

        log.0.insert("Feed Pet".to_string(), 100);
        let unlocked = AchievementEvaluator::evaluate(&state, &log, &mut definitions, epoch());
        assert_eq!(unlocked.len(), 1);
        assert!(definitions[0].unlocked);

        // Monotone: nothing new on re-evaluation.
        let later = epoch() + Duration::days(1);
        assert!(AchievementEvaluator::evaluate(&state, &log, &mut definitions, later).is_empty());
        assert_eq!(definitions[0].unlocked_at, Some(epoch()));
    }

    #[test]
    fn unsupported_kind_never_unlocks() {
        let state = pet();
        let mut definitions = vec![template(
            "Clean Freak",
            Requirement::Unsupported {
                kind: "clean_streak".into(),
            },
            0,
        )];

        let unlocked =
            AchievementEvaluator::evaluate(&state, &Log::default(), &mut definitions, epoch());

        assert!(unlocked.is_empty());
        assert!(!definitions[0].unlocked);
    }

    #[test]
    fn unlocked_definitions_are_not_reexamined() {
        let mut state = pet();
        let mut definitions = vec![template("Best Friend", Requirement::Happiness, 100)];
        AchievementEvaluator::evaluate(&state, &Log::default(), &mut definitions, epoch());

        state.attributes.happiness = 0;
        let unlocked = AchievementEvaluator::evaluate(&state, &Log::default(), &mut definitions, epoch());

        assert!(unlocked.is_empty());
        assert!(definitions[0].unlocked);
        assert_eq!(definitions[0].current_progress, 100);
    }
}
