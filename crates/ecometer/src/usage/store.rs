use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use super::domain::UsageDocument;

/// Storage abstraction so the usage service can be exercised in isolation.
pub trait UsageStore: Send + Sync {
    fn load(&self) -> Result<UsageDocument, StoreError>;
    fn save(&self, document: &UsageDocument) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("usage store unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("usage document at {path} is corrupt: {reason}")]
    CorruptDocument { path: PathBuf, reason: String },
    #[error("bill image {path} does not exist")]
    MissingAsset { path: PathBuf },
}

/// Whole-document JSON persistence. Every save rewrites the file in place;
/// a crash mid-write can leave it truncated.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Same as [`UsageStore::load`] with an explicit join date for the seed
    /// document.
    pub fn load_or_seed(&self, today: NaiveDate) -> Result<UsageDocument, StoreError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no usage document yet, using seed data");
                return Ok(UsageDocument::seed(today));
            }
            Err(source) => {
                warn!(path = %self.path.display(), error = %source, "usage document unreadable");
                return Err(StoreError::Unavailable {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let document: UsageDocument = serde_json::from_slice(&raw).map_err(|err| {
            warn!(path = %self.path.display(), error = %err, "usage document failed to parse");
            StoreError::CorruptDocument {
                path: self.path.clone(),
                reason: err.to_string(),
            }
        })?;

        document
            .validate()
            .map_err(|reason| StoreError::CorruptDocument {
                path: self.path.clone(),
                reason,
            })?;

        Ok(document)
    }
}

impl UsageStore for JsonFileStore {
    fn load(&self) -> Result<UsageDocument, StoreError> {
        self.load_or_seed(Local::now().date_naive())
    }

    fn save(&self, document: &UsageDocument) -> Result<(), StoreError> {
        let unavailable = |source: std::io::Error| StoreError::Unavailable {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(unavailable)?;
        }

        let payload = serde_json::to_vec_pretty(document).map_err(|err| {
            unavailable(std::io::Error::new(ErrorKind::InvalidData, err))
        })?;
        std::fs::write(&self.path, payload).map_err(unavailable)
    }
}
