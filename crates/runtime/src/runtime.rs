//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to start a pet session.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use pet_core::{
    AchievementDefinition, AchievementOracle, ActivityOracle, PetId, PetProfile, PetState,
    SimConfig,
};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::OracleManager;
use crate::repository::{InMemoryRepository, PetRepository, RepositoryError, retry_once};
use crate::workers::{
    ActivityTally, Command, PersistCommand, PersistJob, PersistenceWorker, PetSession,
    SimulationWorker,
};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub sim: SimConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    pub persistence_buffer_size: usize,
    /// Start with the decay ticker suspended.
    pub start_paused: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            persistence_buffer_size: 256,
            start_paused: false,
        }
    }
}

/// Main runtime that orchestrates one pet session
///
/// Runtime owns the workers; [`RuntimeHandle`] is the cloneable façade for
/// clients.
pub struct Runtime {
    handle: RuntimeHandle,
    pet: PetId,
    recovery: Option<String>,

    sim_worker_handle: JoinHandle<()>,
    persistence_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn pet(&self) -> PetId {
        self.pet
    }

    /// Why the stored pet was replaced by a fresh one, if it was.
    pub fn recovery(&self) -> Option<&str> {
        self.recovery.as_deref()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Queued writes are attempted once more before the persistence worker
    /// exits.
    pub async fn shutdown(self) -> Result<()> {
        // The worker may already be gone; joining below still applies.
        if self.handle.shutdown().await.is_err() {
            warn!(target: "runtime", pet = %self.pet, "Simulation worker already stopped");
        }
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        self.persistence_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!(target: "runtime", pet = %self.pet, "Runtime shut down");
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum SessionRequest {
    Load(PetId),
    Create { pet: PetId, profile: PetProfile },
    LoadOrCreate { pet: PetId, profile: PetProfile },
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    repository: Option<Arc<dyn PetRepository>>,
    session: SessionRequest,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            repository: None,
            session: SessionRequest::LoadOrCreate {
                pet: PetId(1),
                profile: PetProfile::default(),
            },
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the simulation tuning
    pub fn sim_config(mut self, sim: SimConfig) -> Self {
        self.config.sim = sim;
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Set the storage backend. Defaults to [`InMemoryRepository`].
    pub fn repository(mut self, repository: Arc<dyn PetRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Resume an existing pet; fails with [`RuntimeError::PetNotFound`] if absent.
    pub fn load_pet(mut self, pet: PetId) -> Self {
        self.session = SessionRequest::Load(pet);
        self
    }

    /// Create a brand-new pet.
    pub fn create_pet(mut self, pet: PetId, profile: PetProfile) -> Self {
        self.session = SessionRequest::Create { pet, profile };
        self
    }

    /// Resume `pet` if it is stored, otherwise create it.
    pub fn load_or_create_pet(mut self, pet: PetId, profile: PetProfile) -> Self {
        self.session = SessionRequest::LoadOrCreate { pet, profile };
        self
    }

    pub fn start_paused(mut self, paused: bool) -> Self {
        self.config.start_paused = paused;
        self
    }

    /// Build the runtime
    ///
    /// Storage writes that fail while opening the pet do not abort the build;
    /// they are handed to the persistence worker and retried from there.
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingCatalogs)?;
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryRepository::new()));

        let mut deferred = DeferredWrites::default();
        let opened = open_pet(repository.as_ref(), &oracles, self.session, &mut deferred)?;
        let pet = opened.state.id;
        let (achievements, tally) = match opened.created {
            Some(achievements) => (achievements, ActivityTally::default()),
            None => (
                reconcile_achievements(repository.as_ref(), &oracles, pet, &mut deferred),
                seed_tally(repository.as_ref(), &oracles, pet),
            ),
        };

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let (persist_tx, persist_rx) =
            mpsc::channel::<PersistCommand>(self.config.persistence_buffer_size.max(1));

        let persistence_worker =
            PersistenceWorker::new(pet, repository, persist_rx, event_bus.clone());
        let persistence_worker_handle = tokio::spawn(async move {
            persistence_worker.run().await;
        });

        for job in deferred.0 {
            if persist_tx.send(PersistCommand::Persist(job)).await.is_err() {
                warn!(target: "runtime", pet = %pet, "Persistence worker stopped before startup writes were queued");
                break;
            }
        }

        let session = PetSession {
            state: opened.state,
            achievements,
            tally,
            start_paused: self.config.start_paused,
        };
        let sim_worker = SimulationWorker::new(
            session,
            self.config.sim,
            oracles.clone(),
            command_rx,
            persist_tx,
            event_bus.clone(),
        );
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        let handle = RuntimeHandle::new(command_tx, event_bus, oracles);

        Ok(Runtime {
            handle,
            pet,
            recovery: opened.recovery,
            sim_worker_handle,
            persistence_worker_handle,
        })
    }
}

/// Writes that failed during startup, in the order they were attempted.
#[derive(Default)]
struct DeferredWrites(Vec<PersistJob>);

impl DeferredWrites {
    /// Runs `write` with one retry; on failure `job` is kept for the
    /// persistence worker.
    fn attempt(
        &mut self,
        pet: PetId,
        job: PersistJob,
        write: impl FnMut() -> std::result::Result<(), RepositoryError>,
    ) -> bool {
        match retry_once(write) {
            Ok(()) => true,
            Err(error) => {
                warn!(target: "runtime", pet = %pet, job = job.label(), error = %error, "Startup write failed; queued for retry");
                self.0.push(job);
                false
            }
        }
    }
}

/// The pet a session starts with.
struct OpenedPet {
    state: PetState,
    /// Why the stored pet was replaced by a fresh one, if it was.
    recovery: Option<String>,
    /// Achievements of a brand-new pet; `None` when the pet was stored.
    created: Option<Vec<AchievementDefinition>>,
}

/// Loads or creates the pet.
///
/// A stored state that fails validation or cannot be decoded is replaced by
/// a fresh one. A pet that cannot be read at all aborts the build.
fn open_pet(
    repository: &dyn PetRepository,
    oracles: &OracleManager,
    session: SessionRequest,
    deferred: &mut DeferredWrites,
) -> Result<OpenedPet> {
    let (pet, profile) = match session {
        SessionRequest::Create { pet, profile } => {
            return Ok(create_pet(repository, oracles, pet, profile, deferred));
        }
        SessionRequest::Load(pet) => (pet, None),
        SessionRequest::LoadOrCreate { pet, profile } => (pet, Some(profile)),
    };

    match retry_once(|| repository.load_pet(pet)) {
        Ok(Some(mut state)) => match state.validate() {
            Ok(()) => {
                info!(target: "runtime", pet = %pet, level = state.level, "Pet loaded");
                Ok(OpenedPet {
                    state,
                    recovery: None,
                    created: None,
                })
            }
            Err(violation) => {
                let reason = violation.to_string();
                warn!(target: "runtime", pet = %pet, reason = %reason, "Stored pet is invalid; reinitializing");
                state.reset();
                let job = PersistJob::SavePet(Box::new(state.clone()));
                deferred.attempt(pet, job, || repository.save_pet(&state));
                Ok(OpenedPet {
                    state,
                    recovery: Some(reason),
                    created: None,
                })
            }
        },
        Ok(None) => match profile {
            Some(profile) => Ok(create_pet(repository, oracles, pet, profile, deferred)),
            None => Err(RuntimeError::PetNotFound { pet }),
        },
        Err(error) if error.is_corruption() => {
            let reason = error.to_string();
            warn!(target: "runtime", pet = %pet, reason = %reason, "Stored pet is unreadable; reinitializing");
            let state = PetState::new(pet, profile.unwrap_or_default(), Utc::now());
            let job = PersistJob::SavePet(Box::new(state.clone()));
            deferred.attempt(pet, job, || match repository.save_pet(&state) {
                Err(RepositoryError::PetNotFound { .. }) => repository.create_pet(&state, &[]),
                other => other,
            });
            Ok(OpenedPet {
                state,
                recovery: Some(reason),
                created: None,
            })
        }
        Err(error) => Err(error.into()),
    }
}

fn create_pet(
    repository: &dyn PetRepository,
    oracles: &OracleManager,
    pet: PetId,
    profile: PetProfile,
    deferred: &mut DeferredWrites,
) -> OpenedPet {
    let state = PetState::new(pet, profile, Utc::now());
    let achievements: Vec<_> = oracles
        .achievements()
        .templates()
        .iter()
        .map(AchievementDefinition::from_template)
        .collect();

    let job = PersistJob::CreatePet {
        state: Box::new(state.clone()),
        achievements: achievements.clone(),
    };
    if deferred.attempt(pet, job, || repository.create_pet(&state, &achievements)) {
        info!(target: "runtime", pet = %pet, name = %state.profile.name, "Pet created");
    }

    OpenedPet {
        state,
        recovery: None,
        created: Some(achievements),
    }
}

/// Aligns stored achievements with the catalog.
///
/// Catalog entries come first in catalog order; templates added since the pet
/// was created are stored locked. Stored records unknown to the catalog are
/// kept after them.
fn reconcile_achievements(
    repository: &dyn PetRepository,
    oracles: &OracleManager,
    pet: PetId,
    deferred: &mut DeferredWrites,
) -> Vec<AchievementDefinition> {
    let mut stored = match retry_once(|| repository.load_achievements(pet)) {
        Ok(stored) => stored,
        Err(error) if error.is_corruption() => {
            warn!(target: "runtime", pet = %pet, error = %error, "Stored achievements unreadable; starting locked");
            Vec::new()
        }
        Err(error) => {
            // Locked templates are not written back over records we could not read.
            warn!(target: "runtime", pet = %pet, error = %error, "Failed to load achievements; starting locked");
            return oracles
                .achievements()
                .templates()
                .iter()
                .map(AchievementDefinition::from_template)
                .collect();
        }
    };

    let mut achievements = Vec::with_capacity(stored.len());
    for template in oracles.achievements().templates() {
        match stored.iter().position(|a| a.name == template.name) {
            Some(index) => achievements.push(stored.remove(index)),
            None => {
                let definition = AchievementDefinition::from_template(template);
                let job = PersistJob::SaveAchievement(Box::new(definition.clone()));
                deferred.attempt(pet, job, || repository.save_achievement(pet, &definition));
                achievements.push(definition);
            }
        }
    }
    achievements.extend(stored);

    achievements
}

fn seed_tally(repository: &dyn PetRepository, oracles: &OracleManager, pet: PetId) -> ActivityTally {
    let mut tally = ActivityTally::default();
    for activity in oracles.activities().activities() {
        let count = retry_once(|| repository.count_activity(pet, &activity.name)).unwrap_or_else(
            |error: RepositoryError| {
                warn!(target: "runtime", pet = %pet, activity = %activity.name, error = %error, "Failed to count activity log");
                0
            },
        );
        tally.seed(&activity.name, count);
    }
    tally
}
