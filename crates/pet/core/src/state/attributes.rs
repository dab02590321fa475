//! Bounded pet attributes and the clamped update path.
//!
//! Every bounded attribute stays within
//! [`SimConfig::ATTRIBUTE_MIN`]..=[`SimConfig::ATTRIBUTE_MAX`] after any
//! mutation made through this module.

use crate::config::SimConfig;

/// One of the five bounded attributes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Attribute {
    Health,
    Hunger,
    Happiness,
    Energy,
    Cleanliness,
}

impl Attribute {
    /// Attributes that decay every tick and count towards neglect.
    pub const DECAYING: [Attribute; 4] = [
        Attribute::Hunger,
        Attribute::Energy,
        Attribute::Cleanliness,
        Attribute::Happiness,
    ];
}

/// Clamp a raw value into the bounded attribute range.
#[inline]
pub fn clamp_attribute(value: i32) -> i32 {
    value.clamp(SimConfig::ATTRIBUTE_MIN, SimConfig::ATTRIBUTE_MAX)
}

/// Current values of the five bounded attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    pub health: i32,
    pub hunger: i32,
    pub happiness: i32,
    pub energy: i32,
    pub cleanliness: i32,
}

impl Attributes {
    /// All attributes at their maximum (the state of a fresh pet).
    pub const FULL: Attributes = Attributes {
        health: SimConfig::ATTRIBUTE_MAX,
        hunger: SimConfig::ATTRIBUTE_MAX,
        happiness: SimConfig::ATTRIBUTE_MAX,
        energy: SimConfig::ATTRIBUTE_MAX,
        cleanliness: SimConfig::ATTRIBUTE_MAX,
    };

    /// Build attributes from raw values, clamping each into range.
    pub fn clamped(health: i32, hunger: i32, happiness: i32, energy: i32, cleanliness: i32) -> Self {
        Self {
            health: clamp_attribute(health),
            hunger: clamp_attribute(hunger),
            happiness: clamp_attribute(happiness),
            energy: clamp_attribute(energy),
            cleanliness: clamp_attribute(cleanliness),
        }
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Health => self.health,
            Attribute::Hunger => self.hunger,
            Attribute::Happiness => self.happiness,
            Attribute::Energy => self.energy,
            Attribute::Cleanliness => self.cleanliness,
        }
    }

    fn slot_mut(&mut self, attribute: Attribute) -> &mut i32 {
        match attribute {
            Attribute::Health => &mut self.health,
            Attribute::Hunger => &mut self.hunger,
            Attribute::Happiness => &mut self.happiness,
            Attribute::Energy => &mut self.energy,
            Attribute::Cleanliness => &mut self.cleanliness,
        }
    }

    /// Adds `amount` to one attribute and clamps the result.
    ///
    /// Saturating arithmetic keeps extreme catalog deltas from overflowing.
    pub fn adjust(&mut self, attribute: Attribute, amount: i32) -> i32 {
        let slot = self.slot_mut(attribute);
        *slot = clamp_attribute(slot.saturating_add(amount));
        *slot
    }

    /// Applies every component of `delta`; zero components leave the attribute as is.
    pub fn apply_delta(&mut self, delta: &AttributeDelta) {
        for (attribute, amount) in delta.iter() {
            if amount != 0 {
                self.adjust(attribute, amount);
            }
        }
    }

    /// Returns the first attribute outside the bounded range, if any.
    pub fn out_of_range(&self) -> Option<(Attribute, i32)> {
        use strum::IntoEnumIterator;

        Attribute::iter()
            .map(|attribute| (attribute, self.get(attribute)))
            .find(|(_, value)| {
                !(SimConfig::ATTRIBUTE_MIN..=SimConfig::ATTRIBUTE_MAX).contains(value)
            })
    }

    /// True when any decaying attribute is strictly below `threshold`.
    pub fn any_decaying_below(&self, threshold: i32) -> bool {
        Attribute::DECAYING
            .iter()
            .any(|attribute| self.get(*attribute) < threshold)
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::FULL
    }
}

/// Signed change applied to the bounded attributes.
///
/// Magnitudes are unconstrained; clamping happens when the delta is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttributeDelta {
    pub health: i32,
    pub hunger: i32,
    pub happiness: i32,
    pub energy: i32,
    pub cleanliness: i32,
}

impl AttributeDelta {
    pub const ZERO: AttributeDelta = AttributeDelta {
        health: 0,
        hunger: 0,
        happiness: 0,
        energy: 0,
        cleanliness: 0,
    };

    /// Tuple order: (health, hunger, happiness, energy, cleanliness).
    pub const fn new(health: i32, hunger: i32, happiness: i32, energy: i32, cleanliness: i32) -> Self {
        Self {
            health,
            hunger,
            happiness,
            energy,
            cleanliness,
        }
    }

    /// Sets one component (builder pattern).
    #[must_use]
    pub fn with(mut self, attribute: Attribute, amount: i32) -> Self {
        match attribute {
            Attribute::Health => self.health = amount,
            Attribute::Hunger => self.hunger = amount,
            Attribute::Happiness => self.happiness = amount,
            Attribute::Energy => self.energy = amount,
            Attribute::Cleanliness => self.cleanliness = amount,
        }
        self
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Health => self.health,
            Attribute::Hunger => self.hunger,
            Attribute::Happiness => self.happiness,
            Attribute::Energy => self.energy,
            Attribute::Cleanliness => self.cleanliness,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, i32)> + '_ {
        use strum::IntoEnumIterator;

        Attribute::iter().map(move |attribute| (attribute, self.get(attribute)))
    }
}
