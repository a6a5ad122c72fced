//! JSON-lines file mirror log.
//!
//! Users and tasks go to separate files, `users.jsonl` and `tasks.jsonl`,
//! inside one directory. Each line is one serialized [`MirrorEvent`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::mirror::{MirrorEntity, MirrorError, MirrorEvent, MirrorLog, MirrorResult};

/// Mirror log appending JSON lines to files in a directory.
#[derive(Debug)]
pub struct JsonlMirrorLog {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlMirrorLog {
    /// Creates a log rooted at `dir`. The directory is created on first
    /// append.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the file holding events for `entity`.
    #[must_use]
    pub fn path_for(&self, entity: MirrorEntity) -> PathBuf {
        let file = match entity {
            MirrorEntity::User => "users.jsonl",
            MirrorEntity::Task => "tasks.jsonl",
        };
        self.dir.join(file)
    }
}

#[async_trait]
impl MirrorLog for JsonlMirrorLog {
    async fn append(&self, event: &MirrorEvent) -> MirrorResult<()> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        let path = self.path_for(event.entity);

        let _guard = self.write_lock.lock().await;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| io_error(&self.dir, source))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| io_error(&path, source))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|source| io_error(&path, source))?;
        file.flush().await.map_err(|source| io_error(&path, source))
    }

    async fn read_all(&self, entity: MirrorEntity) -> MirrorResult<Vec<MirrorEvent>> {
        let path = self.path_for(entity);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(io_error(&path, source)),
        };

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|source| MirrorError::Corrupt {
                    path: path.clone(),
                    line: index + 1,
                    source,
                })
            })
            .collect()
    }
}

fn io_error(path: &Path, source: std::io::Error) -> MirrorError {
    MirrorError::Io {
        path: path.to_path_buf(),
        source,
    }
}
