//! JSON-file implementation of the snapshot store.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::WeatherSnapshot;
use crate::error::StoreError;

const DEFAULT_FILE_NAME: &str = "weather.json";

/// Stores the latest [`WeatherSnapshot`] as a pretty-printed JSON file.
///
/// Writes go to a uniquely named temporary sibling that is renamed over the
/// target, so a concurrent reader sees either the previous snapshot or the
/// new one, and concurrent writers (`serve` plus a cron `scrape`) never
/// share a temp file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored snapshot, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read and
    /// [`StoreError::Json`] if it does not hold a snapshot.
    pub async fn load(&self) -> Result<Option<WeatherSnapshot>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Stamps `snapshot` with the current time and replaces the stored file.
    ///
    /// Returns the snapshot as written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory cannot be created or the file
    /// cannot be written.
    pub async fn save(&self, snapshot: WeatherSnapshot) -> Result<WeatherSnapshot, StoreError> {
        let snapshot = snapshot.stamped(Utc::now());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(&snapshot)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::info!(path = %self.path.display(), "snapshot saved");
        Ok(snapshot)
    }

    /// Copies the stored file into `dir` under the same file name.
    ///
    /// Returns the path of the copy.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if nothing is stored yet or the copy fails.
    pub async fn mirror_to(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        tokio::fs::create_dir_all(dir).await?;
        let target = dir.join(self.file_name());
        tokio::fs::copy(&self.path, &target).await?;
        tracing::debug!(target = %target.display(), "snapshot mirrored");
        Ok(target)
    }

    fn file_name(&self) -> &OsStr {
        self.path
            .file_name()
            .unwrap_or_else(|| OsStr::new(DEFAULT_FILE_NAME))
    }

    /// `.weather.json.<uuid>.tmp` next to the target.
    fn temp_path(&self) -> PathBuf {
        let mut name = OsStr::new(".").to_os_string();
        name.push(self.file_name());
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}
