//! Persistence worker for best-effort storage writes.
//!
//! The simulation worker hands over cloned snapshots; this worker performs the
//! repository calls so I/O never runs inside a state mutation.
//!
//! # Failure Strategy
//!
//! Each write is attempted twice. A write that still fails stays queued and is
//! retried, in order, whenever the next write arrives (the next tick or
//! activity). Queued pet saves are coalesced so only the latest state is kept.
//! The in-memory pet remains authoritative meanwhile. Writes that failed while
//! the runtime was being built arrive first and follow the same rules.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use pet_core::{AchievementDefinition, PetId, PetState};

use crate::events::{Event, EventBus, LifecycleEvent};
use crate::repository::{ActivityLogEntry, PetRepository, RepositoryError, retry_once};

/// A single storage write.
#[derive(Debug, Clone)]
pub(crate) enum PersistJob {
    /// Startup creation that could not be stored right away.
    CreatePet {
        state: Box<PetState>,
        achievements: Vec<AchievementDefinition>,
    },
    SavePet(Box<PetState>),
    AppendLog(ActivityLogEntry),
    SaveAchievement(Box<AchievementDefinition>),
}

impl PersistJob {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            PersistJob::CreatePet { .. } => "create_pet",
            PersistJob::SavePet(_) => "save_pet",
            PersistJob::AppendLog(_) => "append_activity_log",
            PersistJob::SaveAchievement(_) => "save_achievement",
        }
    }
}

/// Commands that can be sent to the persistence worker
pub(crate) enum PersistCommand {
    Persist(PersistJob),
    /// Attempt every queued write, then report how many remain.
    Flush { reply: oneshot::Sender<usize> },
}

/// Background worker that handles all persistence operations
pub(crate) struct PersistenceWorker {
    pet: PetId,
    repository: Arc<dyn PetRepository>,
    command_rx: mpsc::Receiver<PersistCommand>,
    event_bus: EventBus,
    pending: VecDeque<PersistJob>,
    failing: bool,
}

impl PersistenceWorker {
    pub(crate) fn new(
        pet: PetId,
        repository: Arc<dyn PetRepository>,
        command_rx: mpsc::Receiver<PersistCommand>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            pet,
            repository,
            command_rx,
            event_bus,
            pending: VecDeque::new(),
            failing: false,
        }
    }

    /// Main worker loop
    pub(crate) async fn run(mut self) {
        info!(target: "runtime::persistence", pet = %self.pet, "PersistenceWorker started");

        while let Some(command) = self.command_rx.recv().await {
            match command {
                PersistCommand::Persist(job) => {
                    self.enqueue(job);
                    self.drain();
                }
                PersistCommand::Flush { reply } => {
                    self.drain();
                    if reply.send(self.pending.len()).is_err() {
                        debug!(target: "runtime::persistence", "Flush reply channel closed (caller dropped)");
                    }
                }
            }
        }

        // Cleanup phase: one last attempt at anything still queued
        self.drain();
        if self.pending.is_empty() {
            info!(target: "runtime::persistence", pet = %self.pet, "PersistenceWorker stopped");
        } else {
            warn!(
                target: "runtime::persistence",
                pet = %self.pet,
                pending = self.pending.len(),
                "PersistenceWorker stopped with unsaved writes"
            );
        }
    }

    fn enqueue(&mut self, job: PersistJob) {
        if matches!(job, PersistJob::SavePet(_)) {
            self.pending
                .retain(|queued| !matches!(queued, PersistJob::SavePet(_)));
        }
        self.pending.push_back(job);
    }

    /// Writes queued jobs in order, stopping at the first failure.
    fn drain(&mut self) {
        while let Some(job) = self.pending.front() {
            let label = job.label();
            match retry_once(|| self.write(job)) {
                Ok(()) => {
                    debug!(target: "runtime::persistence", pet = %self.pet, job = label, "Persisted");
                    self.pending.pop_front();
                }
                Err(error) => {
                    self.report_failure(label, &error);
                    return;
                }
            }
        }

        if self.failing {
            self.failing = false;
            info!(target: "runtime::persistence", pet = %self.pet, "Persistence recovered");
        }
    }

    fn write(&self, job: &PersistJob) -> Result<(), RepositoryError> {
        match job {
            PersistJob::CreatePet {
                state,
                achievements,
            } => self.repository.create_pet(state, achievements),
            PersistJob::SavePet(state) => self.repository.save_pet(state),
            PersistJob::AppendLog(entry) => self.repository.append_activity_log(entry),
            PersistJob::SaveAchievement(achievement) => {
                self.repository.save_achievement(self.pet, achievement)
            }
        }
    }

    fn report_failure(&mut self, job: &'static str, error: &RepositoryError) {
        warn!(
            target: "runtime::persistence",
            pet = %self.pet,
            job,
            pending = self.pending.len(),
            error = %error,
            "Write failed after retry; keeping it queued"
        );

        if !self.failing {
            self.failing = true;
            self.event_bus
                .publish(Event::Lifecycle(LifecycleEvent::PersistenceWarning {
                    pet: self.pet,
                    error: error.to_string(),
                }));
        }
    }
}
