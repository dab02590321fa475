#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::{Duration, advance};

use pet_core::{Attributes, PetId, PetProfile, PetState};
use runtime::{
    ActivityLogEntry, Event, InMemoryRepository, OracleManager, PetRepository, Runtime,
    RuntimeHandle, PetSnapshot,
};

pub const PET: PetId = PetId(1);

pub fn pet_with(attributes: Attributes) -> PetState {
    let mut state = PetState::new(PET, PetProfile::named("Rex"), Utc::now());
    state.attributes = attributes;
    state
}

/// Starts a runtime on the embedded catalogs.
pub async fn start(repository: Arc<InMemoryRepository>, paused: bool) -> Runtime {
    Runtime::builder()
        .oracles(OracleManager::load_default().expect("embedded catalogs load"))
        .repository(repository)
        .load_or_create_pet(PET, PetProfile::named("Rex"))
        .start_paused(paused)
        .build()
        .await
        .expect("runtime builds")
}

/// Starts a runtime on top of a stored pet.
pub async fn start_with(state: PetState, paused: bool) -> (Runtime, Arc<InMemoryRepository>) {
    let repository = Arc::new(InMemoryRepository::new());
    repository.insert_pet(state).expect("pet stored");
    let runtime = start(repository.clone(), paused).await;
    (runtime, repository)
}

/// Advances the paused clock by `ticks` decay intervals and returns the
/// resulting snapshot.
pub async fn run_ticks(handle: &RuntimeHandle, ticks: u32) -> PetSnapshot {
    for _ in 0..ticks {
        advance(Duration::from_secs(1)).await;
        handle.snapshot().await.expect("snapshot");
    }
    handle.snapshot().await.expect("snapshot")
}

pub fn log_entries(repository: &InMemoryRepository, activity: &str, count: usize) {
    for _ in 0..count {
        repository
            .append_activity_log(&ActivityLogEntry {
                pet: PET,
                activity: activity.to_string(),
                performed_at: Utc::now(),
                before: Attributes::FULL,
                after: Attributes::FULL,
                experience_gained: 10,
            })
            .expect("log entry stored");
    }
}

/// Everything already published on a topic.
pub fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
