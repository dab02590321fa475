//! Mood derivation and scene selection.
//!
//! Both functions are pure: the mood is a projection of the pet state plus the
//! activity currently "in flight", and the scene is a lookup in the static
//! scene catalog.

use crate::config::SimConfig;
use crate::env::SceneOracle;
use crate::state::PetState;

/// Mood label shown by the presentation layer.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Mood {
    #[default]
    Happy,
    Sad,
    Sick,
    Eating,
    Playing,
    Showering,
    Sleeping,
}

/// What the pet is busy with right after an activity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionContext {
    Eating,
    Playing,
    Showering,
    Sleeping,
}

impl From<ActionContext> for Mood {
    fn from(context: ActionContext) -> Self {
        match context {
            ActionContext::Eating => Mood::Eating,
            ActionContext::Playing => Mood::Playing,
            ActionContext::Showering => Mood::Showering,
            ActionContext::Sleeping => Mood::Sleeping,
        }
    }
}

/// Derives the mood of `state`.
///
/// Low health overrides everything, then low happiness; otherwise the action
/// context wins, falling back to the idle `Happy` label.
pub fn derive_mood(state: &PetState, context: Option<ActionContext>) -> Mood {
    if state.attributes.health < SimConfig::MOOD_THRESHOLD {
        return Mood::Sick;
    }
    if state.attributes.happiness < SimConfig::MOOD_THRESHOLD {
        return Mood::Sad;
    }
    context.map(Mood::from).unwrap_or(Mood::Happy)
}

/// Static scene record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneDefinition {
    pub name: String,
    pub display_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_path: String,
    /// `None` marks the home scene used as fallback.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mood_requirement: Option<Mood>,
    pub unlock_level: u32,
}

impl SceneDefinition {
    pub fn is_home(&self) -> bool {
        self.mood_requirement.is_none()
    }

    fn matches(&self, mood: Mood, level: u32) -> bool {
        self.mood_requirement == Some(mood) && self.unlock_level <= level
    }
}

/// Picks the highest-unlocked scene for `mood` at `level`.
///
/// Ties keep the earliest catalog entry. Falls back to the home scene when no
/// scene matches.
pub fn select_scene<S>(mood: Mood, level: u32, scenes: &S) -> &SceneDefinition
where
    S: SceneOracle + ?Sized,
{
    let mut best: Option<&SceneDefinition> = None;
    for scene in scenes.scenes().iter().filter(|s| s.matches(mood, level)) {
        match best {
            Some(current) if current.unlock_level >= scene.unlock_level => {}
            _ => best = Some(scene),
        }
    }
    best.unwrap_or_else(|| scenes.home())
}

/// All scenes unlocked at `level`, ordered by unlock level (stable).
pub fn available_scenes<S>(level: u32, scenes: &S) -> Vec<&SceneDefinition>
where
    S: SceneOracle + ?Sized,
{
    let mut unlocked: Vec<&SceneDefinition> = scenes
        .scenes()
        .iter()
        .filter(|scene| scene.unlock_level <= level)
        .collect();
    unlocked.sort_by_key(|scene| scene.unlock_level);
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PetId, PetProfile};
    use chrono::Utc;

    struct Catalog(Vec<SceneDefinition>);

    impl SceneOracle for Catalog {
        fn scenes(&self) -> &[SceneDefinition] {
            &self.0
        }

        fn home(&self) -> &SceneDefinition {
            &self.0[0]
        }
    }

    fn scene(name: &str, mood: Option<Mood>, unlock_level: u32) -> SceneDefinition {
        SceneDefinition {
            name: name.to_string(),
            display_name: name.to_string(),
            image_path: String::new(),
            mood_requirement: mood,
            unlock_level,
        }
    }

    fn catalog() -> Catalog {
        Catalog(vec![
            scene("normal_home", None, 1),
            scene("feeding", Some(Mood::Eating), 1),
            scene("play", Some(Mood::Playing), 1),
            scene("sick", Some(Mood::Sick), 1),
            scene("park", Some(Mood::Playing), 5),
            scene("garden", Some(Mood::Playing), 5),
            scene("beach", Some(Mood::Happy), 10),
        ])
    }

    fn pet() -> PetState {
        PetState::new(PetId(1), PetProfile::default(), Utc::now())
    }

    #[test]
    fn sickness_overrides_everything() {
        let mut state = pet();
        state.attributes.health = 49;
        state.attributes.happiness = 10;

        assert_eq!(derive_mood(&state, Some(ActionContext::Eating)), Mood::Sick);
    }

    #[test]
    fn sadness_overrides_context() {
        let mut state = pet();
        state.attributes.happiness = 49;

        assert_eq!(derive_mood(&state, Some(ActionContext::Playing)), Mood::Sad);
    }

    #[test]
    fn context_or_idle() {
        let state = pet();

        assert_eq!(derive_mood(&state, Some(ActionContext::Sleeping)), Mood::Sleeping);
        assert_eq!(derive_mood(&state, None), Mood::Happy);
    }

    #[test]
    fn threshold_is_strict() {
        let mut state = pet();
        state.attributes.health = 50;
        state.attributes.happiness = 50;

        assert_eq!(derive_mood(&state, None), Mood::Happy);
    }

    #[test]
    fn highest_unlocked_scene_wins() {
        let scenes = catalog();

        assert_eq!(select_scene(Mood::Playing, 1, &scenes).name, "play");
        assert_eq!(select_scene(Mood::Playing, 4, &scenes).name, "play");
        // park and garden tie at level 5: catalog order decides.
        assert_eq!(select_scene(Mood::Playing, 7, &scenes).name, "park");
    }

    #[test]
    fn falls_back_to_home() {
        let scenes = catalog();

        assert_eq!(select_scene(Mood::Happy, 9, &scenes).name, "normal_home");
        assert_eq!(select_scene(Mood::Happy, 10, &scenes).name, "beach");
        assert_eq!(select_scene(Mood::Sleeping, 99, &scenes).name, "normal_home");
    }

    #[test]
    fn available_scenes_by_level() {
        let scenes = catalog();

        let names: Vec<_> = available_scenes(5, &scenes)
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["normal_home", "feeding", "play", "sick", "park", "garden"]
        );
    }
}
