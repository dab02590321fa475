//! Storage failures must never roll back or block the in-memory pet.

mod common;

use std::sync::Arc;

use runtime::{Event, InMemoryRepository, LifecycleEvent, PetRepository, Topic};

use common::{PET, drain, start};

#[tokio::test(start_paused = true)]
async fn failed_writes_are_queued_and_retried() {
    let repository = Arc::new(InMemoryRepository::new());
    let runtime = start(repository.clone(), true).await;
    let handle = runtime.handle();
    let mut lifecycle_rx = handle.subscribe(Topic::Lifecycle);

    repository.set_unavailable(true);
    let report = handle.apply_activity("Feed Pet").await.expect("feed");
    assert_eq!(report.snapshot.state.experience, 10);
    handle.apply_activity("Walk").await.expect("walk");

    let pending = handle.flush().await.expect("flush");
    assert!(pending > 0);
    assert_eq!(handle.snapshot().await.expect("snapshot").state.experience, 28);
    assert!(repository.activity_log(PET).expect("log").is_empty());

    // One warning per outage, not per failed write.
    let warnings = drain(&mut lifecycle_rx);
    assert!(matches!(
        warnings.as_slice(),
        [Event::Lifecycle(LifecycleEvent::PersistenceWarning { pet, .. })] if *pet == PET
    ));

    repository.set_unavailable(false);
    assert_eq!(handle.flush().await.expect("flush"), 0);

    let log = repository.activity_log(PET).expect("log");
    let activities: Vec<_> = log.iter().map(|e| e.activity.as_str()).collect();
    assert_eq!(activities, vec!["Feed Pet", "Walk"]);

    let stored = repository.load_pet(PET).expect("load").expect("stored");
    assert_eq!(stored.experience, 28);
    let achievements = repository.load_achievements(PET).expect("achievements");
    assert!(
        achievements
            .iter()
            .any(|a| a.name == "Best Friend" && a.unlocked)
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_attempts_pending_writes() {
    let repository = Arc::new(InMemoryRepository::new());
    let runtime = start(repository.clone(), true).await;
    let handle = runtime.handle();

    handle.apply_activity("Grooming").await.expect("grooming");
    runtime.shutdown().await.expect("shutdown");

    let stored = repository.load_pet(PET).expect("load").expect("stored");
    assert_eq!(stored.experience, 12);
    assert_eq!(repository.count_activity(PET, "Grooming").expect("count"), 1);
}

#[tokio::test(start_paused = true)]
async fn pet_created_during_outage_is_stored_later() {
    let repository = Arc::new(InMemoryRepository::new());
    repository.set_unavailable(true);

    let runtime = start(repository.clone(), true).await;
    let handle = runtime.handle();

    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.state.profile.name, "Rex");
    assert_eq!(handle.achievements(false).await.expect("achievements").len(), 7);

    handle.apply_activity("Feed Pet").await.expect("feed");
    assert!(handle.flush().await.expect("flush") > 0);
    assert_eq!(repository.load_pet(PET).expect("load"), None);

    repository.set_unavailable(false);
    assert_eq!(handle.flush().await.expect("flush"), 0);

    let stored = repository.load_pet(PET).expect("load").expect("stored");
    assert_eq!(stored.profile.name, "Rex");
    assert_eq!(stored.experience, 10);
    assert_eq!(repository.count_activity(PET, "Feed Pet").expect("count"), 1);

    let achievements = repository.load_achievements(PET).expect("achievements");
    assert_eq!(achievements.len(), 7);
    assert!(
        achievements
            .iter()
            .any(|a| a.name == "Best Friend" && a.unlocked)
    );
}
