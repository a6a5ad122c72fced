//! End-to-end flows through [`TrackerApi`] over the in-memory store.

use chrono::TimeDelta;
use rstest::rstest;
use tasktrack::api::{TrackerApi, TrackerError};
use tasktrack::mirror::{MirrorEntity, MirrorOperation};
use tasktrack::task::domain::TaskTimeRange;
use tasktrack::task::services::{StartTaskRequest, StopSelector};
use tasktrack::user::domain::{Pagination, UserId};
use tasktrack::user::services::{CreateUserRequest, UpdateUserRequest};

use crate::in_memory::helpers::{TrackerHarness, harness};

async fn create(tracker: &dyn TrackerApi, passport: &str, surname: &str) -> UserId {
    tracker
        .create_user(CreateUserRequest::new(passport, surname, "Ivan", "Moscow"))
        .await
        .expect("user should be created")
        .id()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workday_report_lists_longest_task_first(harness: TrackerHarness) {
    let tracker = harness.tracker.as_ref();
    let user_id = create(tracker, "1234 567890", "Ivanov").await;

    for (name, minutes) in [("Standup", 15), ("Coding", 250), ("Review", 95)] {
        tracker
            .start_task(StartTaskRequest::new(user_id, name))
            .await
            .expect("start should succeed");
        harness.clock.advance(TimeDelta::minutes(minutes));
        tracker
            .stop_task(StopSelector::LatestForUser(user_id))
            .await
            .expect("stop should succeed");
    }

    let report = tracker
        .list_user_tasks(user_id, None)
        .await
        .expect("report should load");
    let summary: Vec<(&str, String)> = report
        .iter()
        .map(|task| (task.name(), task.tracked_time().to_string()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Coding", "4:10".to_owned()),
            ("Review", "1:35".to_owned()),
            ("Standup", "0:15".to_owned()),
        ]
    );

    let windowed = tracker
        .list_user_tasks(
            user_id,
            Some(TaskTimeRange::parse("2026-03-03", "2026-03-10").expect("valid range")),
        )
        .await
        .expect("report should load");
    assert!(windowed.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn errors_map_to_caller_categories(harness: TrackerHarness) {
    let tracker = harness.tracker.as_ref();
    let user_id = create(tracker, "1234 567890", "Ivanov").await;
    let missing = UserId::new(99).expect("valid id");

    let invalid = tracker
        .create_user(CreateUserRequest::new("12345 67890", "Petrov", "Pyotr", ""))
        .await;
    assert!(matches!(invalid, Err(TrackerError::Validation(_))));

    let not_found = tracker
        .update_user(missing, UpdateUserRequest::new().with_name("Ghost"))
        .await;
    assert!(matches!(not_found, Err(TrackerError::NotFound(_))));

    let no_owner = tracker
        .start_task(StartTaskRequest::new(missing, "Ghost"))
        .await;
    assert!(matches!(no_owner, Err(TrackerError::NotFound(_))));

    let nothing_running = tracker.stop_task(StopSelector::LatestForUser(user_id)).await;
    assert!(matches!(nothing_running, Err(TrackerError::NotFound(_))));

    let task = tracker
        .start_task(StartTaskRequest::new(user_id, "Once"))
        .await
        .expect("start should succeed");
    let second = tracker
        .start_task(StartTaskRequest::new(user_id, "Twice"))
        .await;
    assert!(matches!(second, Err(TrackerError::Conflict(_))));

    let selector = StopSelector::ById {
        user_id: Some(user_id),
        task_id: task.id(),
    };
    tracker
        .stop_task(selector)
        .await
        .expect("first stop should succeed");
    let again = tracker.stop_task(selector).await;
    assert!(matches!(again, Err(TrackerError::Conflict(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_user_removes_their_tasks_and_is_mirrored(harness: TrackerHarness) {
    let tracker = harness.tracker.as_ref();
    let user_id = create(tracker, "1234 567890", "Ivanov").await;
    let other = create(tracker, "4321 098765", "Petrov").await;
    let task = tracker
        .start_task(StartTaskRequest::new(user_id, "Open"))
        .await
        .expect("start should succeed");

    let deleted = tracker
        .delete_user(user_id)
        .await
        .expect("delete should succeed");
    assert_eq!(deleted.task_ids, vec![task.id()]);

    let users = tracker
        .list_users(Pagination::default())
        .await
        .expect("listing should succeed");
    let ids: Vec<UserId> = users.iter().map(|user| user.id()).collect();
    assert_eq!(ids, vec![other]);

    let again = tracker.delete_user(user_id).await;
    assert!(matches!(again, Err(TrackerError::NotFound(_))));

    let deletes: Vec<MirrorEntity> = harness
        .log
        .events()
        .iter()
        .filter(|event| event.operation == MirrorOperation::Delete)
        .map(|event| event.entity)
        .collect();
    assert_eq!(deletes, vec![MirrorEntity::Task, MirrorEntity::User]);
}
