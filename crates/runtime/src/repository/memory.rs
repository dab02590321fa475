//! In-memory PetRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use pet_core::{AchievementDefinition, PetId, PetState};

use super::error::{RepositoryError, Result};
use super::traits::PetRepository;
use super::types::ActivityLogEntry;

#[derive(Default)]
struct PetRecords {
    state: Option<PetState>,
    achievements: Vec<AchievementDefinition>,
    log: Vec<ActivityLogEntry>,
}

/// In-memory implementation of PetRepository.
///
/// Writes can be switched off with [`InMemoryRepository::set_unavailable`]
/// to exercise failure handling.
#[derive(Default)]
pub struct InMemoryRepository {
    pets: RwLock<HashMap<PetId, PetRecords>>,
    unavailable: AtomicBool,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail with [`RepositoryError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Store a state as-is, bypassing validation.
    pub fn insert_pet(&self, state: PetState) -> Result<()> {
        let mut pets = self.pets.write().map_err(|_| RepositoryError::LockPoisoned)?;
        let id = state.id;
        pets.entry(id).or_default().state = Some(state);
        Ok(())
    }

    /// Full activity log of one pet, oldest first.
    pub fn activity_log(&self, pet: PetId) -> Result<Vec<ActivityLogEntry>> {
        let pets = self.pets.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(pets.get(&pet).map(|r| r.log.clone()).unwrap_or_default())
    }

    fn write<T>(&self, f: impl FnOnce(&mut HashMap<PetId, PetRecords>) -> Result<T>) -> Result<T> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable);
        }
        let mut pets = self.pets.write().map_err(|_| RepositoryError::LockPoisoned)?;
        f(&mut pets)
    }
}

impl PetRepository for InMemoryRepository {
    fn create_pet(&self, state: &PetState, achievements: &[AchievementDefinition]) -> Result<()> {
        self.write(|pets| {
            pets.insert(
                state.id,
                PetRecords {
                    state: Some(state.clone()),
                    achievements: achievements.to_vec(),
                    log: Vec::new(),
                },
            );
            Ok(())
        })
    }

    fn load_pet(&self, pet: PetId) -> Result<Option<PetState>> {
        let pets = self.pets.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(pets.get(&pet).and_then(|r| r.state.clone()))
    }

    fn save_pet(&self, state: &PetState) -> Result<()> {
        self.write(|pets| match pets.get_mut(&state.id) {
            Some(records) => {
                records.state = Some(state.clone());
                Ok(())
            }
            None => Err(RepositoryError::PetNotFound { pet: state.id }),
        })
    }

    fn append_activity_log(&self, entry: &ActivityLogEntry) -> Result<()> {
        self.write(|pets| {
            pets.entry(entry.pet).or_default().log.push(entry.clone());
            Ok(())
        })
    }

    fn load_achievements(&self, pet: PetId) -> Result<Vec<AchievementDefinition>> {
        let pets = self.pets.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(pets
            .get(&pet)
            .map(|r| r.achievements.clone())
            .unwrap_or_default())
    }

    fn save_achievement(&self, pet: PetId, achievement: &AchievementDefinition) -> Result<()> {
        self.write(|pets| {
            let records = pets.entry(pet).or_default();
            match records
                .achievements
                .iter_mut()
                .find(|a| a.name == achievement.name)
            {
                Some(existing) => *existing = achievement.clone(),
                None => records.achievements.push(achievement.clone()),
            }
            Ok(())
        })
    }

    fn count_activity(&self, pet: PetId, activity: &str) -> Result<u64> {
        let pets = self.pets.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(pets
            .get(&pet)
            .map(|r| r.log.iter().filter(|e| e.activity == activity).count() as u64)
            .unwrap_or(0))
    }
}
