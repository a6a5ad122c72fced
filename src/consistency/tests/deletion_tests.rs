//! Tests for atomic user removal over the in-memory store.

use std::sync::Arc;

use crate::consistency::{
    ports::CascadeError,
    services::{UserDeletionError, UserDeletionService},
};
use crate::mirror::{MirrorEntity, MirrorOperation, MirrorPublisher, adapters::InMemoryMirrorLog};
use crate::store::{InMemoryStore, StoreFault};
use crate::task::{
    domain::{NewTask, TaskId},
    ports::TaskRepository,
};
use crate::test_support::FixedClock;
use crate::user::{
    domain::{NewUser, Passport, UserId, UserProfile},
    ports::UserRepository,
};
use chrono::TimeDelta;
use rstest::{fixture, rstest};

struct Harness {
    service: UserDeletionService<InMemoryStore>,
    store: Arc<InMemoryStore>,
    clock: Arc<FixedClock>,
    log: Arc<InMemoryMirrorLog>,
}

impl Harness {
    async fn user_with_tasks(&self, passport: &str, task_count: usize) -> (UserId, Vec<TaskId>) {
        let new_user = NewUser::new(
            Passport::parse(passport).expect("valid passport"),
            UserProfile::new("Sidorov", "Semyon", "").expect("valid profile"),
            &*self.clock,
        );
        let user = UserRepository::insert(&*self.store, &new_user)
            .await
            .expect("user insert should succeed");

        let mut task_ids = Vec::with_capacity(task_count);
        for index in 0..task_count {
            let new_task = NewTask::start(user.id(), format!("Task {index}"), &*self.clock)
                .expect("valid task");
            let mut task = TaskRepository::insert(&*self.store, &new_task)
                .await
                .expect("task insert should succeed");
            self.clock.advance(TimeDelta::minutes(15));
            task.stop(&*self.clock).expect("task should stop");
            self.store
                .record_stop(&task)
                .await
                .expect("stop should be recorded");
            task_ids.push(task.id());
        }
        (user.id(), task_ids)
    }

    async fn remaining(&self, user_id: UserId) -> (bool, usize) {
        let user = UserRepository::find_by_id(&*self.store, user_id)
            .await
            .expect("user lookup should succeed");
        let tasks = self
            .store
            .list_for_user(user_id, None)
            .await
            .expect("task listing should succeed");
        (user.is_some(), tasks.len())
    }
}

#[fixture]
fn harness() -> Harness {
    let clock = Arc::new(FixedClock::morning());
    let log = Arc::new(InMemoryMirrorLog::new());
    let store = Arc::new(InMemoryStore::new());
    let mirror = MirrorPublisher::new(log.clone(), clock.clone());
    Harness {
        service: UserDeletionService::new(store.clone(), mirror),
        store,
        clock,
        log,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_user_and_owned_tasks_only(harness: Harness) {
    let (doomed, doomed_tasks) = harness.user_with_tasks("1111 111111", 3).await;
    let (kept, _) = harness.user_with_tasks("2222 222222", 2).await;

    let deleted = harness
        .service
        .delete_user(doomed)
        .await
        .expect("delete should succeed");

    assert_eq!(deleted.user_id, doomed);
    assert_eq!(deleted.task_ids, doomed_tasks);
    assert_eq!(harness.remaining(doomed).await, (false, 0));
    assert_eq!(harness.remaining(kept).await, (true, 2));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_delete_is_not_found(harness: Harness) {
    let (user_id, _) = harness.user_with_tasks("1111 111111", 1).await;
    harness
        .service
        .delete_user(user_id)
        .await
        .expect("first delete should succeed");

    let result = harness.service.delete_user(user_id).await;

    assert!(matches!(
        result,
        Err(UserDeletionError::Cascade(CascadeError::UserNotFound(id))) if id == user_id
    ));
}

#[rstest]
#[case(StoreFault::DeleteTasks)]
#[case(StoreFault::DeleteUser)]
#[tokio::test(flavor = "multi_thread")]
async fn failed_step_leaves_user_and_tasks_intact(harness: Harness, #[case] fault: StoreFault) {
    let (user_id, _) = harness.user_with_tasks("1111 111111", 2).await;
    harness.store.inject_fault(fault);

    let result = harness.service.delete_user(user_id).await;

    assert!(matches!(
        result,
        Err(UserDeletionError::Cascade(CascadeError::Persistence(_)))
    ));
    assert_eq!(harness.remaining(user_id).await, (true, 2));
    assert!(
        harness
            .log
            .events()
            .iter()
            .all(|event| event.operation != MirrorOperation::Delete),
        "a rolled back delete must not be mirrored"
    );

    harness
        .service
        .delete_user(user_id)
        .await
        .expect("retry after the one-shot fault should succeed");
    assert_eq!(harness.remaining(user_id).await, (false, 0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn committed_delete_is_mirrored_tasks_first(harness: Harness) {
    let (user_id, task_ids) = harness.user_with_tasks("1111 111111", 2).await;
    harness
        .service
        .delete_user(user_id)
        .await
        .expect("delete should succeed");

    let deletes: Vec<(MirrorEntity, i64)> = harness
        .log
        .events()
        .iter()
        .filter(|event| event.operation == MirrorOperation::Delete)
        .map(|event| (event.entity, event.entity_id))
        .collect();
    let mut expected: Vec<(MirrorEntity, i64)> = task_ids
        .iter()
        .map(|id| (MirrorEntity::Task, id.value()))
        .collect();
    expected.push((MirrorEntity::User, user_id.value()));
    assert_eq!(deletes, expected);
}
