//! Single entry point for pet state mutation.
//!
//! [`PetEngine`] borrows the canonical [`PetState`] mutably for the duration
//! of one operation. Activities, decay ticks and achievement checks all go
//! through it so the runtime never edits attributes directly.

use chrono::{DateTime, Utc};

use crate::achievement::{AchievementDefinition, AchievementEvaluator, ActivityHistory};
use crate::activity::{ActivityError, ActivityOutcome, ActivityResolver};
use crate::config::SimConfig;
use crate::decay::{DecayStep, TickOutcome};
use crate::env::PetEnv;
use crate::mood::{ActionContext, Mood, SceneDefinition, derive_mood, select_scene};
use crate::state::PetState;

pub struct PetEngine<'a> {
    state: &'a mut PetState,
    config: &'a SimConfig,
}

impl<'a> PetEngine<'a> {
    pub fn new(state: &'a mut PetState, config: &'a SimConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &PetState {
        self.state
    }

    /// Resolves and commits an activity.
    ///
    /// The state is untouched when the activity is unknown.
    pub fn apply_activity(
        &mut self,
        env: PetEnv<'_>,
        name: &str,
    ) -> Result<ActivityOutcome, ActivityError> {
        let outcome = ActivityResolver::new(self.config).apply(env.activities(), name, self.state)?;
        *self.state = outcome.after.clone();
        Ok(outcome)
    }

    /// Runs one decay tick.
    pub fn tick(&mut self, context: Option<ActionContext>) -> TickOutcome {
        DecayStep::new(self.config).tick(self.state, context)
    }

    /// Unlocks every achievement whose requirement now holds.
    pub fn evaluate_achievements<H>(
        &self,
        history: &H,
        definitions: &mut [AchievementDefinition],
        now: DateTime<Utc>,
    ) -> Vec<AchievementDefinition>
    where
        H: ActivityHistory + ?Sized,
    {
        AchievementEvaluator::evaluate(self.state, history, definitions, now)
    }

    pub fn mood(&self, context: Option<ActionContext>) -> Mood {
        derive_mood(self.state, context)
    }

    /// Scene matching the current mood and level.
    pub fn scene<'e>(&self, env: PetEnv<'e>, context: Option<ActionContext>) -> &'e SceneDefinition {
        select_scene(self.mood(context), self.state.level, env.scenes())
    }
}
