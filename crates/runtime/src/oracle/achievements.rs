//! [`pet_core::AchievementOracle`] over the template catalog.
use pet_core::{AchievementOracle, AchievementTemplate};

pub struct AchievementOracleImpl {
    templates: Vec<AchievementTemplate>,
}

impl AchievementOracleImpl {
    pub fn new(templates: Vec<AchievementTemplate>) -> Self {
        Self { templates }
    }
}

impl AchievementOracle for AchievementOracleImpl {
    fn templates(&self) -> &[AchievementTemplate] {
        &self.templates
    }
}
