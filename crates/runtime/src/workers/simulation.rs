//! Simulation worker that owns the authoritative [`pet_core::PetState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), applies
//! activities and decay ticks via [`pet_core::PetEngine`], and publishes
//! events to the EventBus. Being the only writer, it serializes ticks and
//! activities without a lock.

use std::collections::HashMap;
use std::future;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, Instant, sleep_until};
use tracing::{debug, info, warn};

use pet_core::{
    AchievementDefinition, ActionContext, ActivityHistory, Mood, PetEngine, PetId, PetState,
    SceneDefinition, SimConfig, available_scenes, derive_mood, select_scene,
};

use super::persistence::{PersistCommand, PersistJob};
use super::ticker::DecayTicker;
use crate::api::{ActivityReport, Result};
use crate::events::{
    AchievementEvent, ChangeCause, Event, EventBus, LifecycleEvent, PetEvent, PetSnapshot,
};
use crate::oracle::OracleManager;
use crate::repository::ActivityLogEntry;

/// Commands that can be sent to the simulation worker
pub(crate) enum Command {
    ApplyActivity {
        name: String,
        reply: oneshot::Sender<Result<ActivityReport>>,
    },
    Pause {
        reply: oneshot::Sender<bool>,
    },
    Resume {
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<PetSnapshot>,
    },
    Achievements {
        unlocked_only: bool,
        reply: oneshot::Sender<Vec<AchievementDefinition>>,
    },
    AvailableScenes {
        reply: oneshot::Sender<Vec<SceneDefinition>>,
    },
    /// Forwarded to the persistence worker behind every queued write.
    Flush {
        reply: oneshot::Sender<usize>,
    },
    Shutdown,
}

/// In-memory activity counts, seeded from the repository at startup.
#[derive(Debug, Clone, Default)]
pub(crate) struct ActivityTally {
    counts: HashMap<String, u64>,
}

impl ActivityTally {
    pub(crate) fn seed(&mut self, activity: &str, count: u64) {
        self.counts.insert(activity.to_string(), count);
    }

    fn record(&mut self, activity: &str) {
        *self.counts.entry(activity.to_string()).or_insert(0) += 1;
    }
}

impl ActivityHistory for ActivityTally {
    fn count(&self, _pet: PetId, activity: &str) -> u64 {
        self.counts.get(activity).copied().unwrap_or(0)
    }
}

/// Everything the worker needs to resume a pet.
pub(crate) struct PetSession {
    pub(crate) state: PetState,
    pub(crate) achievements: Vec<AchievementDefinition>,
    pub(crate) tally: ActivityTally,
    pub(crate) start_paused: bool,
}

/// Background task that processes pet commands and decay ticks.
pub(crate) struct SimulationWorker {
    state: PetState,
    achievements: Vec<AchievementDefinition>,
    tally: ActivityTally,
    config: SimConfig,
    oracles: OracleManager,
    /// Mood context of the last activity, until the idle deadline passes.
    context: Option<ActionContext>,
    idle_deadline: Option<Instant>,
    ticker: DecayTicker,
    command_rx: mpsc::Receiver<Command>,
    persist_tx: mpsc::Sender<PersistCommand>,
    event_bus: EventBus,
}

impl SimulationWorker {
    pub(crate) fn new(
        session: PetSession,
        config: SimConfig,
        oracles: OracleManager,
        command_rx: mpsc::Receiver<Command>,
        persist_tx: mpsc::Sender<PersistCommand>,
        event_bus: EventBus,
    ) -> Self {
        let ticker = DecayTicker::new(
            Duration::from_millis(config.tick_interval_ms),
            session.start_paused,
        );

        Self {
            state: session.state,
            achievements: session.achievements,
            tally: session.tally,
            config,
            oracles,
            context: None,
            idle_deadline: None,
            ticker,
            command_rx,
            persist_tx,
            event_bus,
        }
    }

    /// Main worker loop.
    ///
    /// A due tick is handled before a command that arrived at the same time.
    pub(crate) async fn run(mut self) {
        info!(
            target: "runtime::worker",
            pet = %self.state.id,
            paused = self.ticker.is_paused(),
            tick_ms = self.config.tick_interval_ms,
            "SimulationWorker started"
        );

        loop {
            tokio::select! {
                biased;

                _ = self.ticker.tick() => self.handle_tick().await,
                _ = idle_expired(self.idle_deadline) => self.handle_idle_expired(),
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd).await,
                },
            }
        }

        info!(target: "runtime::worker", pet = %self.state.id, "SimulationWorker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::ApplyActivity { name, reply } => {
                let result = self.handle_activity(name).await;
                if reply.send(result).is_err() {
                    debug!("ApplyActivity reply channel closed (caller dropped)");
                }
            }
            Command::Pause { reply } => {
                let changed = self.handle_pause().await;
                if reply.send(changed).is_err() {
                    debug!("Pause reply channel closed (caller dropped)");
                }
            }
            Command::Resume { reply } => {
                let changed = self.handle_resume();
                if reply.send(changed).is_err() {
                    debug!("Resume reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::Achievements {
                unlocked_only,
                reply,
            } => {
                if reply.send(self.list_achievements(unlocked_only)).is_err() {
                    debug!("Achievements reply channel closed (caller dropped)");
                }
            }
            Command::AvailableScenes { reply } => {
                let scenes = available_scenes(self.state.level, self.oracles.scenes())
                    .into_iter()
                    .cloned()
                    .collect();
                if reply.send(scenes).is_err() {
                    debug!("AvailableScenes reply channel closed (caller dropped)");
                }
            }
            Command::Flush { reply } => {
                if self
                    .persist_tx
                    .send(PersistCommand::Flush { reply })
                    .await
                    .is_err()
                {
                    warn!(target: "runtime::worker", "Persistence worker gone; flush dropped");
                }
            }
            Command::Shutdown => {}
        }
    }

    /// Resolve, commit, log, then evaluate achievements.
    async fn handle_activity(&mut self, name: String) -> Result<ActivityReport> {
        let pet = self.state.id;
        let env = self.oracles.as_env();

        let outcome = match PetEngine::new(&mut self.state, &self.config).apply_activity(env, &name)
        {
            Ok(outcome) => outcome,
            Err(error) => {
                debug!(target: "runtime::worker", pet = %pet, activity = %name, error = %error, "Activity rejected");
                return Err(error.into());
            }
        };

        let now = Utc::now();
        self.tally.record(&outcome.activity);
        self.set_context(outcome.context);

        self.persist(PersistJob::AppendLog(ActivityLogEntry::from_outcome(
            &outcome, now,
        )))
        .await;
        self.persist(PersistJob::SavePet(Box::new(self.state.clone())))
            .await;

        let unlocked = self.evaluate_achievements(now).await;

        debug!(
            target: "runtime::worker",
            pet = %pet,
            activity = %outcome.activity,
            experience = self.state.experience,
            level = self.state.level,
            "Activity applied"
        );
        if outcome.leveled_up {
            info!(target: "runtime::worker", pet = %pet, level = self.state.level, "Level up");
        }

        let snapshot = self.snapshot();
        self.publish_state(
            snapshot.clone(),
            ChangeCause::Activity {
                name: outcome.activity.clone(),
                experience_gained: outcome.experience_gained,
                leveled_up: outcome.leveled_up,
            },
        );

        Ok(ActivityReport {
            activity: outcome.activity,
            experience_gained: outcome.experience_gained,
            leveled_up: outcome.leveled_up,
            snapshot,
            unlocked,
        })
    }

    async fn handle_tick(&mut self) {
        let pet = self.state.id;
        let outcome = PetEngine::new(&mut self.state, &self.config).tick(self.context);

        debug!(
            target: "runtime::scheduler",
            pet = %pet,
            neglected = outcome.neglected,
            penalized = outcome.penalized,
            neglect_timer = self.state.neglect_timer,
            health = self.state.attributes.health,
            "Decay tick"
        );

        if outcome.died {
            info!(target: "runtime::scheduler", pet = %pet, "Pet died; state reset");
            self.set_context(None);
            self.event_bus
                .publish(Event::Lifecycle(LifecycleEvent::Died { pet }));
        } else if outcome.mood == Mood::Sick {
            self.event_bus.publish(Event::Pet(PetEvent::Sick {
                pet,
                health: self.state.attributes.health,
            }));
        }

        // A reset pet is back at full attributes; that is not an achievement.
        if !outcome.died {
            self.evaluate_achievements(Utc::now()).await;
        }
        self.publish_state(self.snapshot(), ChangeCause::Tick);
        self.persist(PersistJob::SavePet(Box::new(self.state.clone())))
            .await;
    }

    fn handle_idle_expired(&mut self) {
        self.set_context(None);
        debug!(target: "runtime::worker", pet = %self.state.id, "Action context expired");
        self.publish_state(self.snapshot(), ChangeCause::IdleReverted);
    }

    /// Pausing keeps the neglect timer; the state is saved as-is.
    async fn handle_pause(&mut self) -> bool {
        let changed = self.ticker.pause();
        if changed {
            let pet = self.state.id;
            info!(target: "runtime::scheduler", pet = %pet, neglect_timer = self.state.neglect_timer, "Decay paused");
            self.event_bus
                .publish(Event::Lifecycle(LifecycleEvent::Paused { pet }));
            self.persist(PersistJob::SavePet(Box::new(self.state.clone())))
                .await;
        }
        changed
    }

    fn handle_resume(&mut self) -> bool {
        let changed = self.ticker.resume();
        if changed {
            let pet = self.state.id;
            info!(target: "runtime::scheduler", pet = %pet, "Decay resumed");
            self.event_bus
                .publish(Event::Lifecycle(LifecycleEvent::Resumed { pet }));
        }
        changed
    }

    async fn evaluate_achievements(&mut self, now: DateTime<Utc>) -> Vec<AchievementDefinition> {
        let pet = self.state.id;
        let unlocked = PetEngine::new(&mut self.state, &self.config).evaluate_achievements(
            &self.tally,
            &mut self.achievements,
            now,
        );

        for achievement in &unlocked {
            info!(
                target: "runtime::worker",
                pet = %pet,
                achievement = %achievement.name,
                points = achievement.points,
                "Achievement unlocked"
            );
            self.event_bus
                .publish(Event::Achievement(AchievementEvent::Unlocked {
                    pet,
                    achievement: Box::new(achievement.clone()),
                }));
            self.persist(PersistJob::SaveAchievement(Box::new(achievement.clone())))
                .await;
        }

        unlocked
    }

    fn set_context(&mut self, context: Option<ActionContext>) {
        self.context = context;
        self.idle_deadline = context
            .map(|_| Instant::now() + Duration::from_millis(self.config.idle_delay_ms));
    }

    fn snapshot(&self) -> PetSnapshot {
        let mood = derive_mood(&self.state, self.context);
        let scene = select_scene(mood, self.state.level, self.oracles.scenes()).clone();

        PetSnapshot {
            state: self.state.clone(),
            mood,
            scene,
            paused: self.ticker.is_paused(),
            taken_at: Utc::now(),
        }
    }

    fn list_achievements(&self, unlocked_only: bool) -> Vec<AchievementDefinition> {
        let mut achievements: Vec<_> = self
            .achievements
            .iter()
            .filter(|a| a.unlocked || !unlocked_only)
            .cloned()
            .collect();

        // Unlocked first, most recent first; `None` sorts below any timestamp.
        achievements.sort_by(|a, b| {
            b.unlocked_at
                .cmp(&a.unlocked_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        achievements
    }

    fn publish_state(&self, snapshot: PetSnapshot, cause: ChangeCause) {
        self.event_bus.publish(Event::Pet(PetEvent::StateChanged {
            snapshot: Box::new(snapshot),
            cause,
        }));
    }

    async fn persist(&self, job: PersistJob) {
        if self
            .persist_tx
            .send(PersistCommand::Persist(job))
            .await
            .is_err()
        {
            warn!(target: "runtime::worker", pet = %self.state.id, "Persistence worker gone; write dropped");
        }
    }
}

async fn idle_expired(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending::<()>().await,
    }
}
