use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::store::StoreError;

const MAX_NAME_ATTEMPTS: u32 = 100;

/// Directory of uploaded bill images. The usage document only keeps the
/// generated filename.
#[derive(Debug, Clone)]
pub struct BillImageStore {
    dir: PathBuf,
}

impl BillImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the upload as `bill_<timestamp>.<ext>` and returns the filename.
    /// An existing image is never replaced: a second upload within the same
    /// second becomes `bill_<timestamp>_2.<ext>`, and so on.
    pub fn save(
        &self,
        original_name: &str,
        bytes: &[u8],
        uploaded_at: NaiveDateTime,
    ) -> Result<String, StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Unavailable {
            path: self.dir.clone(),
            source,
        })?;

        let base = bill_filename(original_name, uploaded_at);
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let filename = numbered_filename(&base, attempt);
            let path = self.dir.join(&filename);
            let unavailable = |source: std::io::Error| StoreError::Unavailable {
                path: path.clone(),
                source,
            };

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(bytes).map_err(unavailable)?;
                    return Ok(filename);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(unavailable(err)),
            }
        }

        Err(StoreError::Unavailable {
            path: self.dir.join(&base),
            source: std::io::Error::new(
                ErrorKind::AlreadyExists,
                format!("no free name after {MAX_NAME_ATTEMPTS} attempts"),
            ),
        })
    }

    /// Joins `filename` onto the bills directory without touching the disk.
    pub fn image_path_for(&self, filename: Option<&str>) -> Option<PathBuf> {
        let filename = filename.map(str::trim).filter(|name| !name.is_empty())?;
        Some(self.dir.join(filename))
    }

    /// Like [`Self::image_path_for`] but requires the file to exist.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, StoreError> {
        if !is_plain_filename(filename) {
            return Err(StoreError::MissingAsset {
                path: PathBuf::from(filename),
            });
        }

        let path = self.dir.join(filename);
        if path.is_file() {
            Ok(path)
        } else {
            Err(StoreError::MissingAsset { path })
        }
    }
}

fn numbered_filename(base: &str, attempt: u32) -> String {
    if attempt == 1 {
        return base.to_string();
    }
    match base.rsplit_once('.') {
        Some((stem, extension)) => format!("{stem}_{attempt}.{extension}"),
        None => format!("{base}_{attempt}"),
    }
}

pub fn bill_filename(original_name: &str, uploaded_at: NaiveDateTime) -> String {
    format!(
        "bill_{}.{}",
        uploaded_at.format("%Y%m%d_%H%M%S"),
        extension_of(original_name)
    )
}

fn extension_of(original_name: &str) -> String {
    let extension: String = Path::new(original_name.trim())
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    if extension.is_empty() {
        "bin".to_string()
    } else {
        extension
    }
}

// Stored names never contain separators, so anything else cannot be ours.
fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\'])
}
