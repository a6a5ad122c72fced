//! Persistence rules enforced by the `PostgreSQL` repositories.

use eyre::Result;
use tasktrack::task::domain::{
    NewTask, PersistedTaskData, Task, TaskId, TaskTimeRange, TrackedTime,
};
use tasktrack::task::ports::{TaskRepository, TaskRepositoryError};
use tasktrack::user::domain::{Pagination, User, UserId, UserPatch};
use tasktrack::user::ports::{UserRepository, UserRepositoryError};

use crate::postgres::helpers::{at, connect, new_user};

fn finished(id: i64, user_id: UserId, start: (u32, u32), end: (u32, u32)) -> Task {
    let (start_time, end_time) = (at(start.0, start.1), at(end.0, end.1));
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id).expect("valid id"),
        user_id,
        name: format!("Task {id}"),
        tracked: TrackedTime::between(start_time, end_time),
        start_time,
        end_time: Some(end_time),
        created_at: start_time,
        updated_at: end_time,
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn users_round_trip_and_page_by_id() -> Result<()> {
    let Some(pg) = connect().await? else {
        return Ok(());
    };

    let mut created = Vec::new();
    for (index, surname) in ["Ivanov", "Petrov", "Sidorov"].into_iter().enumerate() {
        let passport = format!("000{index} 00000{index}");
        created.push(UserRepository::insert(&pg.users, &new_user(&passport, surname)).await?);
    }
    let ids: Vec<i64> = created.iter().map(|user| user.id().value()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let page = pg.users.list(Pagination::from_query(Some(2), Some(2))).await?;
    assert_eq!(page, vec![created[2].clone()]);

    let mut changed: User = created[0].clone();
    let patch = UserPatch {
        patronymic: Some("Ivanovich".to_owned()),
        ..UserPatch::default()
    };
    changed.apply(patch, &mockable::DefaultClock)?;
    pg.users.update(&changed).await?;
    let stored = UserRepository::find_by_id(&pg.users, changed.id()).await?;
    assert_eq!(
        stored.and_then(|user| user.profile().patronymic().map(str::to_owned)),
        Some("Ivanovich".to_owned())
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_user_is_not_found() -> Result<()> {
    let Some(pg) = connect().await? else {
        return Ok(());
    };
    let ghost = new_user("1234 567890", "Ghost").into_user(UserId::new(500)?);

    let result = pg.users.update(&ghost).await;

    assert!(matches!(result, Err(UserRepositoryError::NotFound(id)) if id == ghost.id()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn restored_rows_move_the_sequence_after_sync() -> Result<()> {
    let Some(pg) = connect().await? else {
        return Ok(());
    };
    let restored = new_user("1234 567890", "Restored").into_user(UserId::new(10)?);
    pg.users.restore(&restored).await?;
    let duplicate = pg.users.restore(&restored).await;
    assert!(matches!(duplicate, Err(UserRepositoryError::DuplicateUser(_))));

    pg.store.sync_sequences().await?;
    let next = UserRepository::insert(&pg.users, &new_user("4321 098765", "Next")).await?;

    assert_eq!(next.id().value(), 11);
    assert_eq!(pg.users.next_free_id().await?.value(), 12);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn one_running_task_per_user_is_enforced() -> Result<()> {
    let Some(pg) = connect().await? else {
        return Ok(());
    };
    let user = UserRepository::insert(&pg.users, &new_user("1234 567890", "Ivanov")).await?;
    let clock = mockable::DefaultClock;

    let first = TaskRepository::insert(&pg.tasks, &NewTask::start(user.id(), "First", &clock)?)
        .await?;
    let second =
        TaskRepository::insert(&pg.tasks, &NewTask::start(user.id(), "Second", &clock)?).await;
    assert!(matches!(
        second,
        Err(TaskRepositoryError::ActiveTaskExists(id)) if id == user.id()
    ));

    let active = pg.tasks.find_active_for_user(user.id()).await?;
    assert_eq!(active.map(|task| task.id()), Some(first.id()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn task_for_missing_owner_is_rejected() -> Result<()> {
    let Some(pg) = connect().await? else {
        return Ok(());
    };
    let ghost = UserId::new(404)?;

    let result = TaskRepository::insert(
        &pg.tasks,
        &NewTask::start(ghost, "Nobody", &mockable::DefaultClock)?,
    )
    .await;

    assert!(matches!(result, Err(TaskRepositoryError::OwnerNotFound(id)) if id == ghost));
    assert!(pg.tasks.list_for_user(ghost, None).await?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_is_recorded_once() -> Result<()> {
    let Some(pg) = connect().await? else {
        return Ok(());
    };
    let user = UserRepository::insert(&pg.users, &new_user("1234 567890", "Ivanov")).await?;
    let clock = mockable::DefaultClock;
    let mut task = TaskRepository::insert(&pg.tasks, &NewTask::start(user.id(), "Once", &clock)?)
        .await?;
    task.stop(&clock)?;

    pg.tasks.record_stop(&task).await?;
    let again = pg.tasks.record_stop(&task).await;

    assert!(matches!(again, Err(TaskRepositoryError::NotRunning(id)) if id == task.id()));
    let stored = TaskRepository::find_by_id(&pg.tasks, task.id())
        .await?
        .expect("task should exist");
    assert!(!stored.is_running());
    assert_eq!(stored.tracked_time(), task.tracked_time());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_sorts_by_tracked_time_and_filters_by_day() -> Result<()> {
    let Some(pg) = connect().await? else {
        return Ok(());
    };
    let user = UserRepository::insert(&pg.users, &new_user("1234 567890", "Ivanov")).await?;
    for task in [
        finished(1, user.id(), (9, 0), (10, 0)),
        finished(2, user.id(), (10, 0), (12, 50)),
        finished(3, user.id(), (13, 0), (15, 10)),
    ] {
        pg.tasks.restore(&task).await?;
    }

    let all = pg.tasks.list_for_user(user.id(), None).await?;
    let rendered: Vec<String> = all
        .iter()
        .map(|task| task.tracked_time().to_string())
        .collect();
    assert_eq!(rendered, vec!["2:50", "2:10", "1:00"]);

    let elsewhere = TaskTimeRange::parse("2026-03-03", "2026-03-04")?;
    assert!(pg.tasks.list_for_user(user.id(), Some(elsewhere)).await?.is_empty());
    let same_day = TaskTimeRange::parse("2026-03-02", "2026-03-02")?;
    assert_eq!(pg.tasks.list_for_user(user.id(), Some(same_day)).await?.len(), 3);
    Ok(())
}
