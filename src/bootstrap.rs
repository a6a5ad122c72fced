//! Startup seeding of an empty store from the mirror log.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::mirror::{MirrorError, MirrorLog, replay::load_snapshot};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use crate::user::domain::Pagination;
use crate::user::ports::{UserRepository, UserRepositoryError};

/// Counts of rows restored from the mirror.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Users written to the store.
    pub users_restored: usize,
    /// Tasks written to the store.
    pub tasks_restored: usize,
    /// Tasks left out because their owner was missing or already had a
    /// running task.
    pub tasks_skipped: usize,
}

/// Errors raised while preparing the store at startup.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The mirror log could not be read or folded.
    #[error(transparent)]
    Mirror(#[from] MirrorError),
    /// A user could not be restored.
    #[error(transparent)]
    User(#[from] UserRepositoryError),
    /// A task could not be restored.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
}

/// Replays the mirror log into the store when it holds no users.
///
/// Returns `None` when the store already had data and nothing was replayed.
/// Users are restored first so that every restored task has its owner.
///
/// # Errors
///
/// Returns [`BootstrapError`] when the log cannot be read or a restore
/// fails for a reason other than a missing owner or a second running task.
pub async fn seed_from_mirror<U, T>(
    users: &U,
    tasks: &T,
    log: &dyn MirrorLog,
) -> Result<Option<SeedReport>, BootstrapError>
where
    U: UserRepository,
    T: TaskRepository,
{
    let existing = users.list(Pagination::from_query(Some(1), Some(1))).await?;
    if !existing.is_empty() {
        debug!("store already populated; mirror replay skipped");
        return Ok(None);
    }

    let snapshot = load_snapshot(log).await?;
    let mut report = SeedReport::default();
    let mut owners = BTreeSet::new();

    for user in &snapshot.users {
        users.restore(user).await?;
        owners.insert(user.id());
        report.users_restored += 1;
    }

    for task in &snapshot.tasks {
        if !owners.contains(&task.user_id()) {
            warn!(
                task_id = %task.id(),
                user_id = %task.user_id(),
                "mirrored task has no owner; skipped"
            );
            report.tasks_skipped += 1;
            continue;
        }
        match tasks.restore(task).await {
            Ok(()) => report.tasks_restored += 1,
            Err(TaskRepositoryError::ActiveTaskExists(user_id)) => {
                warn!(
                    task_id = %task.id(),
                    user_id = %user_id,
                    "mirrored task would be a second running task; skipped"
                );
                report.tasks_skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!(
        users = report.users_restored,
        tasks = report.tasks_restored,
        skipped = report.tasks_skipped,
        "store seeded from mirror log"
    );
    Ok(Some(report))
}
