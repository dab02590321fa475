//! File-based PetRepository implementation.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use pet_core::{AchievementDefinition, PetId, PetState};
use serde::Serialize;

use super::error::{RepositoryError, Result};
use super::traits::PetRepository;
use super::types::ActivityLogEntry;

const PET_FILE: &str = "pet.json";
const ACHIEVEMENTS_FILE: &str = "achievements.json";
const ACTIVITY_LOG_FILE: &str = "activity_log.jsonl";

/// File-based implementation of PetRepository.
///
/// # File Structure
///
/// ```text
/// {base_dir}/
///   └── pet_{id}/
///       ├── pet.json
///       ├── achievements.json
///       └── activity_log.jsonl
/// ```
///
/// JSON documents are replaced atomically through a temp file; the activity
/// log is append-only, one JSON entry per line.
pub struct FileRepository {
    base_dir: PathBuf,
}

impl FileRepository {
    /// Create a new file-based repository rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn pet_dir(&self, pet: PetId) -> PathBuf {
        self.base_dir.join(format!("pet_{}", pet))
    }

    fn existing_pet_dir(&self, pet: PetId) -> Result<PathBuf> {
        let dir = self.pet_dir(pet);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(RepositoryError::PetNotFound { pet })
        }
    }

    fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
        let temp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(value)?;

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }
}

impl PetRepository for FileRepository {
    fn create_pet(&self, state: &PetState, achievements: &[AchievementDefinition]) -> Result<()> {
        let dir = self.pet_dir(state.id);
        fs::create_dir_all(&dir)?;

        Self::write_json(&dir.join(PET_FILE), state)?;
        Self::write_json(&dir.join(ACHIEVEMENTS_FILE), achievements)?;

        // A new pet starts with an empty history.
        match fs::remove_file(dir.join(ACTIVITY_LOG_FILE)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        tracing::debug!("Created pet[{}] in {}", state.id, dir.display());
        Ok(())
    }

    fn load_pet(&self, pet: PetId) -> Result<Option<PetState>> {
        let path = self.pet_dir(pet).join(PET_FILE);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let state: PetState = serde_json::from_slice(&bytes)?;

        if state.id != pet {
            return Err(RepositoryError::CorruptedData(format!(
                "{} holds pet {}",
                path.display(),
                state.id
            )));
        }

        tracing::debug!("Loaded pet[{}] from {}", pet, path.display());
        Ok(Some(state))
    }

    fn save_pet(&self, state: &PetState) -> Result<()> {
        let dir = self.existing_pet_dir(state.id)?;
        Self::write_json(&dir.join(PET_FILE), state)
    }

    fn append_activity_log(&self, entry: &ActivityLogEntry) -> Result<()> {
        let dir = self.existing_pet_dir(entry.pet)?;

        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(ACTIVITY_LOG_FILE))?;
        file.write_all(&line)?;
        file.flush()?;

        Ok(())
    }

    fn load_achievements(&self, pet: PetId) -> Result<Vec<AchievementDefinition>> {
        let path = self.pet_dir(pet).join(ACHIEVEMENTS_FILE);

        if !path.exists() {
            return Ok(Vec::new());
        }

        let bytes = fs::read(&path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save_achievement(&self, pet: PetId, achievement: &AchievementDefinition) -> Result<()> {
        let dir = self.existing_pet_dir(pet)?;
        let mut achievements = self.load_achievements(pet)?;

        match achievements.iter_mut().find(|a| a.name == achievement.name) {
            Some(existing) => *existing = achievement.clone(),
            None => achievements.push(achievement.clone()),
        }

        Self::write_json(&dir.join(ACHIEVEMENTS_FILE), &achievements)
    }

    fn count_activity(&self, pet: PetId, activity: &str) -> Result<u64> {
        let path = self.pet_dir(pet).join(ACTIVITY_LOG_FILE);

        if !path.exists() {
            return Ok(0);
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        let mut count = 0;

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ActivityLogEntry>(&line) {
                Ok(entry) if entry.activity == activity => count += 1,
                Ok(_) => {}
                Err(e) => {
                    // A torn final write leaves a partial line behind.
                    tracing::warn!(
                        "Skipping malformed activity log line {} in {}: {}",
                        line_number + 1,
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(count)
    }
}
