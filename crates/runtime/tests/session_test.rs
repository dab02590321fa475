//! Activities, achievements and session setup through the public handle.

mod common;

use std::sync::Arc;

use chrono::Utc;
use pet_core::{Attributes, Mood, PetId, PetProfile, PetState};
use runtime::{
    AchievementEvent, ActivityLogEntry, ChangeCause, Event, FileRepository, InMemoryRepository,
    OracleManager, PetEvent, PetRepository, Runtime, RuntimeError, Topic,
};
use tokio::time::{Duration, advance};

use common::{PET, drain, log_entries, pet_with, start, start_with};

#[tokio::test(start_paused = true)]
async fn feeding_a_fresh_pet_clamps_at_full() {
    let runtime = start(Arc::new(InMemoryRepository::new()), true).await;
    let handle = runtime.handle();

    let report = handle.apply_activity("Feed Pet").await.expect("feed");

    let state = &report.snapshot.state;
    assert_eq!(state.attributes, Attributes::clamped(100, 100, 100, 95, 100));
    assert_eq!(state.experience, 10);
    assert_eq!(state.level, 1);
    assert!(!report.leveled_up);
    assert_eq!(report.snapshot.mood, Mood::Eating);
    assert_eq!(report.snapshot.scene.name, "feeding");
}

#[tokio::test(start_paused = true)]
async fn training_past_threshold_levels_up() {
    let mut state = pet_with(Attributes::FULL);
    state.experience = 95;
    let (runtime, _repository) = start_with(state, true).await;

    let report = runtime
        .handle()
        .apply_activity("Training")
        .await
        .expect("training");

    assert_eq!(report.snapshot.state.experience, 120);
    assert_eq!(report.snapshot.state.level, 2);
    assert!(report.leveled_up);
    assert_eq!(report.snapshot.scene.name, "play");
}

#[tokio::test(start_paused = true)]
async fn unknown_activity_is_rejected_without_changes() {
    let runtime = start(Arc::new(InMemoryRepository::new()), true).await;
    let handle = runtime.handle();
    let mut pet_rx = handle.subscribe(Topic::Pet);
    let before = handle.snapshot().await.expect("snapshot");

    let error = handle.apply_activity("Juggling").await.unwrap_err();

    assert!(matches!(error, RuntimeError::ActivityNotFound { ref name } if name == "Juggling"));
    let after = handle.snapshot().await.expect("snapshot");
    assert_eq!(after.state, before.state);
    assert!(drain(&mut pet_rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn activity_publishes_state_change() {
    let runtime = start(Arc::new(InMemoryRepository::new()), true).await;
    let handle = runtime.handle();
    let mut pet_rx = handle.subscribe(Topic::Pet);

    handle.apply_activity("Walk").await.expect("walk");

    let events = drain(&mut pet_rx);
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::Pet(PetEvent::StateChanged { snapshot, cause }) => {
            assert_eq!(snapshot.mood, Mood::Playing);
            assert_eq!(
                *cause,
                ChangeCause::Activity {
                    name: "Walk".to_string(),
                    experience_gained: 18,
                    leveled_up: false,
                }
            );
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn mood_reverts_to_idle_after_delay() {
    let runtime = start(Arc::new(InMemoryRepository::new()), true).await;
    let handle = runtime.handle();

    handle.apply_activity("Pet Bath").await.expect("bath");
    let mut pet_rx = handle.subscribe(Topic::Pet);

    advance(Duration::from_millis(4_999)).await;
    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.mood, Mood::Showering);
    assert_eq!(snapshot.scene.name, "showering");

    advance(Duration::from_millis(1)).await;
    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.mood, Mood::Happy);
    assert_eq!(snapshot.scene.name, "normal_home");

    let events = drain(&mut pet_rx);
    assert!(matches!(
        events.as_slice(),
        [Event::Pet(PetEvent::StateChanged {
            cause: ChangeCause::IdleReverted,
            ..
        })]
    ));
}

#[tokio::test(start_paused = true)]
async fn activity_without_context_keeps_idle_mood() {
    let runtime = start(Arc::new(InMemoryRepository::new()), true).await;

    let report = runtime
        .handle()
        .apply_activity("Vet Visit")
        .await
        .expect("vet visit");

    assert_eq!(report.snapshot.mood, Mood::Happy);
    assert_eq!(report.snapshot.scene.name, "normal_home");
}

#[tokio::test(start_paused = true)]
async fn hundredth_feed_unlocks_chef_once() {
    let repository = Arc::new(InMemoryRepository::new());
    repository
        .insert_pet(pet_with(Attributes::FULL))
        .expect("pet stored");
    log_entries(&repository, "Feed Pet", 98);

    let runtime = start(repository.clone(), true).await;
    let handle = runtime.handle();
    let mut achievement_rx = handle.subscribe(Topic::Achievement);

    let first = handle.apply_activity("Feed Pet").await.expect("feed 99");
    assert!(first.unlocked.iter().all(|a| a.name != "Chef"));

    let second = handle.apply_activity("Feed Pet").await.expect("feed 100");
    let chef: Vec<_> = second.unlocked.iter().filter(|a| a.name == "Chef").collect();
    assert_eq!(chef.len(), 1);
    assert_eq!(chef[0].current_progress, 100);

    let third = handle.apply_activity("Feed Pet").await.expect("feed 101");
    assert!(third.unlocked.is_empty());

    let chef_events = drain(&mut achievement_rx)
        .into_iter()
        .filter(|event| {
            matches!(event, Event::Achievement(AchievementEvent::Unlocked { achievement, .. })
                if achievement.name == "Chef")
        })
        .count();
    assert_eq!(chef_events, 1);

    assert_eq!(handle.flush().await.expect("flush"), 0);
    assert_eq!(repository.activity_log(PET).expect("log").len(), 101);
}

#[tokio::test(start_paused = true)]
async fn achievements_list_unlocked_first() {
    let runtime = start(Arc::new(InMemoryRepository::new()), true).await;
    let handle = runtime.handle();

    // A fresh pet is at full happiness.
    let report = handle.apply_activity("Nap Time").await.expect("nap");
    let unlocked: Vec<_> = report.unlocked.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(unlocked, vec!["Best Friend"]);

    let all = handle.achievements(false).await.expect("achievements");
    let names: Vec<_> = all.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Best Friend",
            "Chef",
            "Clean Freak",
            "First Steps",
            "Healthy Pet",
            "Player",
            "Veteran"
        ]
    );
    assert!(all[0].unlocked_at.is_some());

    let only = handle.achievements(true).await.expect("achievements");
    assert_eq!(only.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn scenes_follow_level() {
    let mut state = pet_with(Attributes::FULL);
    state.level = 5;
    let (runtime, _repository) = start_with(state, true).await;
    let handle = runtime.handle();

    let scenes = handle.available_scenes().await.expect("scenes");
    let names: Vec<_> = scenes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["normal_home", "feeding", "sleeping", "showering", "play", "sick", "park"]
    );

    let report = handle.apply_activity("Walk").await.expect("walk");
    assert_eq!(report.snapshot.scene.name, "park");
    assert_eq!(handle.activities().len(), 8);
}

#[tokio::test(start_paused = true)]
async fn invalid_stored_pet_is_reinitialized() {
    let mut state = pet_with(Attributes::FULL);
    state.attributes.happiness = 140;
    state.level = 3;
    let (runtime, repository) = start_with(state, true).await;

    assert!(runtime.recovery().is_some());
    let snapshot = runtime.handle().snapshot().await.expect("snapshot");
    assert_eq!(snapshot.state.attributes, Attributes::FULL);
    assert_eq!(snapshot.state.level, 1);
    assert_eq!(snapshot.state.profile.name, "Rex");

    let stored = repository.load_pet(PET).expect("load").expect("stored");
    assert!(stored.validate().is_ok());
}

#[tokio::test(start_paused = true)]
async fn loading_a_missing_pet_fails() {
    let result = Runtime::builder()
        .oracles(OracleManager::load_default().expect("catalogs"))
        .repository(Arc::new(InMemoryRepository::new()))
        .load_pet(PetId(7))
        .build()
        .await;

    assert!(matches!(result, Err(RuntimeError::PetNotFound { pet }) if pet == PetId(7)));
}

#[tokio::test(start_paused = true)]
async fn building_without_catalogs_fails() {
    let result = Runtime::builder().build().await;

    assert!(matches!(result, Err(RuntimeError::MissingCatalogs)));
}

#[tokio::test(start_paused = true)]
async fn file_repository_resumes_pet_after_shutdown() {
    let dir = tempfile::tempdir().expect("tempdir");
    let oracles = OracleManager::load_default().expect("catalogs");

    let runtime = Runtime::builder()
        .oracles(oracles.clone())
        .repository(Arc::new(FileRepository::new(dir.path()).expect("repo")))
        .create_pet(PET, PetProfile::named("Rex"))
        .start_paused(true)
        .build()
        .await
        .expect("first session");
    let handle = runtime.handle();
    handle.apply_activity("Walk").await.expect("walk");
    handle.apply_activity("Walk").await.expect("walk");
    runtime.shutdown().await.expect("shutdown");
    assert!(matches!(
        handle.snapshot().await,
        Err(RuntimeError::CommandChannelClosed)
    ));

    let runtime = Runtime::builder()
        .oracles(oracles)
        .repository(Arc::new(FileRepository::new(dir.path()).expect("repo")))
        .load_pet(PET)
        .start_paused(true)
        .build()
        .await
        .expect("second session");
    let snapshot = runtime.handle().snapshot().await.expect("snapshot");

    assert!(runtime.recovery().is_none());
    assert_eq!(snapshot.state.experience, 36);
    assert_eq!(snapshot.state.profile.name, "Rex");
    assert!(snapshot.paused);

    let unlocked = runtime.handle().achievements(true).await.expect("achievements");
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].name, "Best Friend");
}

#[tokio::test(start_paused = true)]
async fn creating_over_a_stored_pet_starts_a_new_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repository = Arc::new(FileRepository::new(dir.path()).expect("repo"));
    let previous = PetState::new(PET, PetProfile::named("Old"), Utc::now());
    repository.create_pet(&previous, &[]).expect("previous pet");
    for _ in 0..100 {
        repository
            .append_activity_log(&ActivityLogEntry {
                pet: PET,
                activity: "Feed Pet".to_string(),
                performed_at: Utc::now(),
                before: Attributes::FULL,
                after: Attributes::FULL,
                experience_gained: 10,
            })
            .expect("log entry");
    }

    let runtime = Runtime::builder()
        .oracles(OracleManager::load_default().expect("catalogs"))
        .repository(repository.clone())
        .create_pet(PET, PetProfile::named("New"))
        .start_paused(true)
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();

    assert_eq!(repository.count_activity(PET, "Feed Pet").expect("count"), 0);

    handle.apply_activity("Nap Time").await.expect("nap");
    let unlocked: Vec<_> = handle
        .achievements(true)
        .await
        .expect("achievements")
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(unlocked, ["Best Friend"]);
}
