//! Staging of uploaded logo files in the scratch directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use sanitize_filename::sanitize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file type not allowed: {0}")]
    NotAllowed(String),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Logo formats accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoFormat {
    Png,
    Jpeg,
    Gif,
    Svg,
}

impl LogoFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Uses the text after the last dot; a name without a dot has no format.
    pub fn from_filename(filename: &str) -> Option<Self> {
        filename
            .rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Svg)
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Svg => "image/svg+xml",
        }
    }
}

pub fn allowed_file(filename: &str) -> bool {
    LogoFormat::from_filename(filename).is_some()
}

/// A file in a scratch directory that is removed when dropped.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    format: LogoFormat,
    armed: bool,
}

impl StagedFile {
    pub fn adopt(path: PathBuf, format: LogoFormat) -> Self {
        Self {
            path,
            format,
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> LogoFormat {
        self.format
    }

    /// Leaves the file on disk and returns its path.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed staged file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove staged file {}: {}", self.path.display(), e),
        }
    }
}

/// Writes an uploaded file into `dir` under a sanitized, collision-free name.
pub fn stage_upload(dir: &Path, filename: &str, bytes: &[u8]) -> Result<StagedFile, StorageError> {
    let format = LogoFormat::from_filename(filename)
        .ok_or_else(|| StorageError::NotAllowed(filename.to_string()))?;

    let staged_name = format!("{}_{}", Uuid::new_v4().simple(), sanitize(filename));
    let path = dir.join(staged_name);

    fs::write(&path, bytes).map_err(|source| StorageError::Write {
        path: path.clone(),
        source,
    })?;
    debug!("Staged upload {} as {}", filename, path.display());

    Ok(StagedFile::adopt(path, format))
}
