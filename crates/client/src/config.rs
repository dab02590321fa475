//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use pet_core::{PetId, PetProfile};

/// Settings needed to open a pet session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub pet: PetId,
    pub profile: PetProfile,
    pub session_id: Option<String>,
    /// Where pet records are stored.
    pub save_data_dir: PathBuf,
    /// Directory with catalog overrides; embedded catalogs otherwise.
    pub content_dir: Option<PathBuf>,
    /// TOML simulation tuning; takes precedence over `content_dir/config.toml`.
    pub config_path: Option<PathBuf>,
    pub tick_interval_ms: Option<u64>,
    pub start_paused: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            pet: PetId(1),
            profile: PetProfile::default(),
            session_id: None,
            save_data_dir: default_data_dir(),
            content_dir: None,
            config_path: None,
            tick_interval_ms: None,
            start_paused: false,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PETPAL_PET_ID` - Pet to load or create (default: 1)
    /// - `PETPAL_PET_NAME` - Name given to a newly created pet (default: Buddy)
    /// - `PETPAL_PET_SPECIES` / `PETPAL_PET_BREED` - Profile of a new pet
    /// - `PETPAL_SESSION_ID` - Log session name (default: auto-generated)
    /// - `SAVE_DATA_DIR` - Directory for pet records (default: platform-specific)
    /// - `PETPAL_CONTENT_DIR` - Catalog and `config.toml` overrides
    /// - `PETPAL_CONFIG` - Simulation tuning TOML file
    /// - `PETPAL_TICK_MS` - Decay interval override in milliseconds
    /// - `PETPAL_START_PAUSED` - Start with decay suspended (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(id) = read_env::<u64>("PETPAL_PET_ID") {
            config.pet = PetId(id);
        }
        if let Ok(name) = env::var("PETPAL_PET_NAME") {
            config.profile.name = name;
        }
        if let Ok(species) = env::var("PETPAL_PET_SPECIES") {
            config.profile.species = species;
        }
        if let Ok(breed) = env::var("PETPAL_PET_BREED") {
            config.profile.breed = breed;
        }

        config.session_id = env::var("PETPAL_SESSION_ID").ok();

        if let Ok(dir) = env::var("SAVE_DATA_DIR") {
            config.save_data_dir = PathBuf::from(dir);
        }
        config.content_dir = env::var("PETPAL_CONTENT_DIR").ok().map(PathBuf::from);
        config.config_path = env::var("PETPAL_CONFIG").ok().map(PathBuf::from);

        config.tick_interval_ms = read_env::<u64>("PETPAL_TICK_MS").filter(|ms| *ms > 0);

        if let Some(paused) = read_env::<bool>("PETPAL_START_PAUSED") {
            config.start_paused = paused;
        }

        config
    }
}

/// Platform data directory, e.g. `~/.local/share/petpal` on Linux.
fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "petpal")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}

/// Platform cache directory for log files.
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "petpal")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/petpal"))
        .join("logs")
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
