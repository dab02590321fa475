//! The periodic decay step.
//!
//! One tick ages the decaying attributes, tracks sustained neglect, applies
//! the health consequences and resets a pet whose health ran out. Scheduling
//! (interval, pause/resume) is the runtime's concern; this module only knows
//! what a single tick does.

use crate::config::SimConfig;
use crate::mood::{ActionContext, Mood, derive_mood};
use crate::state::{Attribute, PetState};

/// What happened during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    /// Some decaying attribute is below the neglect threshold after decay.
    pub neglected: bool,
    /// Health was reduced by the neglect penalty.
    pub penalized: bool,
    /// Mood derived after the health update, before any reset.
    pub mood: Mood,
    /// Health reached zero and the pet was reset.
    pub died: bool,
}

/// Applies one decay tick using the tuning in [`SimConfig`].
#[derive(Clone, Copy, Debug)]
pub struct DecayStep<'a> {
    config: &'a SimConfig,
}

impl<'a> DecayStep<'a> {
    pub fn new(config: &'a SimConfig) -> Self {
        Self { config }
    }

    /// Runs one tick on `state`.
    ///
    /// The neglect timer is not cleared after a penalty: every further
    /// neglected tick applies the penalty again until care resumes.
    pub fn tick(&self, state: &mut PetState, context: Option<ActionContext>) -> TickOutcome {
        let config = self.config;

        for attribute in Attribute::DECAYING {
            state
                .attributes
                .adjust(attribute, config.decay_step.saturating_neg());
        }

        let neglected = state
            .attributes
            .any_decaying_below(config.neglect_threshold);

        let mut penalized = false;
        if neglected {
            state.neglect_timer = state
                .neglect_timer
                .saturating_add(config.neglect_increment_secs);
            if state.neglect_timer >= config.neglect_window_secs {
                state
                    .attributes
                    .adjust(Attribute::Health, config.health_penalty.saturating_neg());
                penalized = true;
            }
        } else {
            state.neglect_timer = 0;
            state
                .attributes
                .adjust(Attribute::Health, config.health_recovery);
        }

        let mood = derive_mood(state, context);

        let died = state.attributes.health <= 0;
        if died {
            state.reset();
        }

        TickOutcome {
            neglected,
            penalized,
            mood,
            died,
        }
    }
}
