//! [`pet_core::SceneOracle`] with a resolved home scene.
use pet_core::{SceneDefinition, SceneOracle};

pub struct SceneOracleImpl {
    scenes: Vec<SceneDefinition>,
    home: usize,
}

impl SceneOracleImpl {
    /// Returns `None` when the catalog has no home scene.
    pub fn new(scenes: Vec<SceneDefinition>) -> Option<Self> {
        let home = scenes.iter().position(SceneDefinition::is_home)?;
        Some(Self { scenes, home })
    }
}

impl SceneOracle for SceneOracleImpl {
    fn scenes(&self) -> &[SceneDefinition] {
        &self.scenes
    }

    fn home(&self) -> &SceneDefinition {
        &self.scenes[self.home]
    }
}
