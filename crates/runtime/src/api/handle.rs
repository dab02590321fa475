//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! applying activities, controlling the decay ticker, or streaming events from
//! specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use pet_core::{AchievementDefinition, ActivityDefinition, ActivityOracle, SceneDefinition};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, PetSnapshot, Topic};
use crate::oracle::OracleManager;
use crate::workers::Command;

/// Result of a successfully applied activity.
#[derive(Debug, Clone)]
pub struct ActivityReport {
    pub activity: String,
    pub experience_gained: u64,
    pub leveled_up: bool,
    /// State after the activity, with its mood and scene.
    pub snapshot: PetSnapshot,
    /// Achievements unlocked by this activity, in catalog order.
    pub unlocked: Vec<AchievementDefinition>,
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    oracles: OracleManager,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        oracles: OracleManager,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            oracles,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Apply a catalog activity to the pet.
    ///
    /// Unknown names fail with [`RuntimeError::ActivityNotFound`] and leave
    /// the pet untouched.
    pub async fn apply_activity(&self, name: impl Into<String>) -> Result<ActivityReport> {
        let name = name.into();
        self.request(|reply| Command::ApplyActivity { name, reply })
            .await?
    }

    /// Suspend the decay ticker. Returns `false` if it was already paused.
    pub async fn pause(&self) -> Result<bool> {
        self.request(|reply| Command::Pause { reply }).await
    }

    /// Restart the decay ticker; the next tick fires one full interval later.
    /// Returns `false` if it was already running.
    pub async fn resume(&self) -> Result<bool> {
        self.request(|reply| Command::Resume { reply }).await
    }

    /// Current pet state with derived mood and scene.
    pub async fn snapshot(&self) -> Result<PetSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// The pet's achievements: unlocked first (most recent first), then by name.
    pub async fn achievements(&self, unlocked_only: bool) -> Result<Vec<AchievementDefinition>> {
        self.request(|reply| Command::Achievements {
            unlocked_only,
            reply,
        })
        .await
    }

    /// Scenes unlocked at the pet's current level, ordered by unlock level.
    pub async fn available_scenes(&self) -> Result<Vec<SceneDefinition>> {
        self.request(|reply| Command::AvailableScenes { reply }).await
    }

    /// Wait until every write queued so far has been attempted.
    ///
    /// Returns the number of writes still pending after failed attempts.
    pub async fn flush(&self) -> Result<usize> {
        self.request(|reply| Command::Flush { reply }).await
    }

    /// Stop the simulation worker after the commands already queued.
    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// The static activity catalog.
    pub fn activities(&self) -> Vec<ActivityDefinition> {
        self.oracles.activities().activities().to_vec()
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Pet` - State changes and sickness warnings
    /// - `Topic::Achievement` - Unlocked achievements
    /// - `Topic::Lifecycle` - Death, pause/resume and persistence warnings
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut pet_rx = handle.subscribe(Topic::Pet);
    /// while let Ok(event) = pet_rx.recv().await {
    ///     // Redraw the pet
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }
}
