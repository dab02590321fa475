/// Simulation constants and tunable parameters.
///
/// Every field has a default, so partially specified TOML files are valid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Wall-clock interval between decay ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Amount subtracted from hunger, energy, cleanliness and happiness per tick.
    pub decay_step: i32,
    /// A decaying attribute strictly below this value counts as neglect.
    pub neglect_threshold: i32,
    /// Accumulated neglect (seconds) after which health starts to drop.
    pub neglect_window_secs: u32,
    /// Seconds credited to the neglect timer for every neglected tick.
    pub neglect_increment_secs: u32,
    /// Health removed on each neglected tick once the window is reached.
    pub health_penalty: i32,
    /// Health restored on each tick without neglect.
    pub health_recovery: i32,
    /// Experience needed per level: the threshold at level `n` is `n * experience_per_level`.
    pub experience_per_level: u64,
    /// Time after the last activity before the mood falls back to idle, in milliseconds.
    pub idle_delay_ms: u64,
}

impl SimConfig {
    /// Lower bound of every bounded attribute.
    pub const ATTRIBUTE_MIN: i32 = 0;
    /// Upper bound of every bounded attribute.
    pub const ATTRIBUTE_MAX: i32 = 100;
    /// Health and happiness below this value drive the sick/sad moods.
    pub const MOOD_THRESHOLD: i32 = 50;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;
    pub const DEFAULT_DECAY_STEP: i32 = 1;
    pub const DEFAULT_NEGLECT_THRESHOLD: i32 = 50;
    pub const DEFAULT_NEGLECT_WINDOW_SECS: u32 = 60;
    pub const DEFAULT_NEGLECT_INCREMENT_SECS: u32 = 1;
    pub const DEFAULT_HEALTH_PENALTY: i32 = 5;
    pub const DEFAULT_HEALTH_RECOVERY: i32 = 1;
    pub const DEFAULT_EXPERIENCE_PER_LEVEL: u64 = 100;
    pub const DEFAULT_IDLE_DELAY_MS: u64 = 5_000;

    pub fn new() -> Self {
        Self {
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            decay_step: Self::DEFAULT_DECAY_STEP,
            neglect_threshold: Self::DEFAULT_NEGLECT_THRESHOLD,
            neglect_window_secs: Self::DEFAULT_NEGLECT_WINDOW_SECS,
            neglect_increment_secs: Self::DEFAULT_NEGLECT_INCREMENT_SECS,
            health_penalty: Self::DEFAULT_HEALTH_PENALTY,
            health_recovery: Self::DEFAULT_HEALTH_RECOVERY,
            experience_per_level: Self::DEFAULT_EXPERIENCE_PER_LEVEL,
            idle_delay_ms: Self::DEFAULT_IDLE_DELAY_MS,
        }
    }

    pub fn with_tick_interval_ms(mut self, tick_interval_ms: u64) -> Self {
        self.tick_interval_ms = tick_interval_ms;
        self
    }

    /// Experience required to leave `level`.
    pub fn level_threshold(&self, level: u32) -> u64 {
        u64::from(level).saturating_mul(self.experience_per_level)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
