//! Transactional user removal against `PostgreSQL`.

use std::sync::Arc;

use eyre::Result;
use tasktrack::consistency::ports::CascadeError;
use tasktrack::consistency::services::{UserDeletionError, UserDeletionService};
use tasktrack::mirror::MirrorPublisher;
use tasktrack::task::domain::NewTask;
use tasktrack::task::ports::TaskRepository;
use tasktrack::user::ports::UserRepository;

use crate::postgres::helpers::{connect, new_user};

#[tokio::test(flavor = "multi_thread")]
async fn delete_cascades_and_second_delete_is_not_found() -> Result<()> {
    let Some(pg) = connect().await? else {
        return Ok(());
    };
    let clock = mockable::DefaultClock;
    let doomed = UserRepository::insert(&pg.users, &new_user("1111 111111", "Doomed")).await?;
    let kept = UserRepository::insert(&pg.users, &new_user("2222 222222", "Kept")).await?;
    let doomed_task =
        TaskRepository::insert(&pg.tasks, &NewTask::start(doomed.id(), "Gone", &clock)?).await?;
    TaskRepository::insert(&pg.tasks, &NewTask::start(kept.id(), "Stays", &clock)?).await?;

    let service = UserDeletionService::new(Arc::new(pg.cascade.clone()), MirrorPublisher::disabled());
    let deleted = service.delete_user(doomed.id()).await?;

    assert_eq!(deleted.task_ids, vec![doomed_task.id()]);
    assert!(UserRepository::find_by_id(&pg.users, doomed.id()).await?.is_none());
    assert!(pg.tasks.list_for_user(doomed.id(), None).await?.is_empty());
    assert_eq!(pg.tasks.list_for_user(kept.id(), None).await?.len(), 1);

    let again = service.delete_user(doomed.id()).await;
    assert!(matches!(
        again,
        Err(UserDeletionError::Cascade(CascadeError::UserNotFound(id))) if id == doomed.id()
    ));
    Ok(())
}
