//! [`pet_core::ActivityOracle`] backed by the loaded catalog.
use pet_core::{ActivityDefinition, ActivityOracle};
use std::collections::HashMap;

/// ActivityOracle implementation with a name index
pub struct ActivityOracleImpl {
    activities: Vec<ActivityDefinition>,
    index: HashMap<String, usize>,
}

impl ActivityOracleImpl {
    /// Later duplicates shadow earlier ones in lookups.
    pub fn new(activities: Vec<ActivityDefinition>) -> Self {
        let index = activities
            .iter()
            .enumerate()
            .map(|(position, activity)| (activity.name.clone(), position))
            .collect();

        Self { activities, index }
    }
}

impl ActivityOracle for ActivityOracleImpl {
    fn activity(&self, name: &str) -> Option<&ActivityDefinition> {
        self.index.get(name).map(|&position| &self.activities[position])
    }

    fn activities(&self) -> &[ActivityDefinition] {
        &self.activities
    }
}
