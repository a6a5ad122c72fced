//! Seeding an empty store from the mirror log.

use std::sync::Arc;

use chrono::TimeDelta;
use rstest::rstest;
use serde_json::json;
use tasktrack::bootstrap::{SeedReport, seed_from_mirror};
use tasktrack::mirror::{
    MirrorEntity, MirrorEvent, MirrorLog, MirrorOperation, adapters::JsonlMirrorLog,
};
use tasktrack::store::InMemoryStore;
use tasktrack::task::services::{StartTaskRequest, StopSelector};
use tasktrack::user::domain::Pagination;
use tasktrack::user::services::CreateUserRequest;
use tempfile::TempDir;

use crate::in_memory::helpers::{StepClock, build_tracker};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restarted_store_is_seeded_from_jsonl_log() {
    let temp = TempDir::new().expect("temp dir");
    let log: Arc<dyn MirrorLog> = Arc::new(JsonlMirrorLog::new(temp.path()));
    let clock = Arc::new(StepClock::new());

    let first_run = build_tracker(Arc::new(InMemoryStore::new()), log.clone(), clock.clone());
    let kept = first_run
        .create_user(CreateUserRequest::new("1234 567890", "Ivanov", "Ivan", "Moscow"))
        .await
        .expect("user should be created");
    let removed = first_run
        .create_user(CreateUserRequest::new("4321 098765", "Petrov", "Pyotr", ""))
        .await
        .expect("user should be created");
    first_run
        .start_task(StartTaskRequest::new(kept.id(), "Closed"))
        .await
        .expect("start should succeed");
    clock.advance(TimeDelta::minutes(40));
    let closed = first_run
        .stop_task(StopSelector::LatestForUser(kept.id()))
        .await
        .expect("stop should succeed");
    let open = first_run
        .start_task(StartTaskRequest::new(kept.id(), "Open"))
        .await
        .expect("start should succeed");
    first_run
        .delete_user(removed.id())
        .await
        .expect("delete should succeed");

    let restarted = Arc::new(InMemoryStore::new());
    let report = seed_from_mirror(&*restarted, &*restarted, log.as_ref())
        .await
        .expect("seeding should succeed");
    assert_eq!(
        report,
        Some(SeedReport {
            users_restored: 1,
            tasks_restored: 2,
            tasks_skipped: 0,
        })
    );

    let second_run = build_tracker(restarted, log, clock);
    let users = second_run
        .list_users(Pagination::default())
        .await
        .expect("listing should succeed");
    assert_eq!(users, vec![kept.clone()]);
    let tasks = second_run
        .list_user_tasks(kept.id(), None)
        .await
        .expect("listing should succeed");
    assert_eq!(tasks, vec![closed, open]);

    let next = second_run
        .create_user(CreateUserRequest::new("5555 555555", "Sidorov", "Semyon", ""))
        .await
        .expect("user should be created");
    assert_eq!(next.id().value(), kept.id().value() + 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn populated_store_is_left_alone() {
    let temp = TempDir::new().expect("temp dir");
    let log: Arc<dyn MirrorLog> = Arc::new(JsonlMirrorLog::new(temp.path()));
    let store = Arc::new(InMemoryStore::new());
    let tracker = build_tracker(store.clone(), log.clone(), Arc::new(StepClock::new()));
    tracker
        .create_user(CreateUserRequest::new("1234 567890", "Ivanov", "Ivan", ""))
        .await
        .expect("user should be created");

    let report = seed_from_mirror(&*store, &*store, log.as_ref())
        .await
        .expect("seeding should succeed");
    assert_eq!(report, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn orphaned_and_duplicate_running_tasks_are_skipped() {
    let temp = TempDir::new().expect("temp dir");
    let log = JsonlMirrorLog::new(temp.path());
    let recorded_at = chrono::Utc::now();
    let user = json!({
        "id": 1,
        "passport": { "series": "1234", "number": "567890" },
        "surname": "Ivanov",
        "name": "Ivan",
        "patronymic": null,
        "address": "",
        "created_at": "2026-03-02T09:00:00Z",
        "updated_at": "2026-03-02T09:00:00Z"
    });
    let running = |id: i64, user_id: i64| {
        json!({
            "id": id,
            "user_id": user_id,
            "name": format!("Task {id}"),
            "hours": 0,
            "minutes": 0,
            "start_time": "2026-03-02T09:00:00Z",
            "end_time": null,
            "created_at": "2026-03-02T09:00:00Z",
            "updated_at": "2026-03-02T09:00:00Z"
        })
    };
    let events = [
        (MirrorEntity::User, 1, user),
        (MirrorEntity::Task, 1, running(1, 1)),
        (MirrorEntity::Task, 2, running(2, 1)),
        (MirrorEntity::Task, 3, running(3, 8)),
    ];
    for (entity, id, payload) in events {
        let event = MirrorEvent::new(entity, id, MirrorOperation::Insert, Some(payload), recorded_at);
        log.append(&event).await.expect("append should succeed");
    }

    let store = InMemoryStore::new();
    let report = seed_from_mirror(&store, &store, &log)
        .await
        .expect("seeding should succeed");

    assert_eq!(
        report,
        Some(SeedReport {
            users_restored: 1,
            tasks_restored: 1,
            tasks_skipped: 2,
        })
    );
}
