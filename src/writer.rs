//! Commits generated text to `<dir>/<Category>.java`.
//!
//! Each file is written in full to a temporary file in the output directory
//! and then renamed over the target, so readers observe either the previous
//! contents or the new ones. The temporary file is removed on every failure
//! path when it is dropped.
//!
//! Existing files are overwritten without any conflict detection; two runs
//! targeting the same category and directory simply leave the last one's
//! output behind.

use std::{
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{emit::EXTENSION, error::WriteError};


#[derive(Debug, Clone)]
pub struct Writer {
    dir: PathBuf,
}

impl Writer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, category: &str) -> PathBuf {
        self.dir.join(format!("{category}.{EXTENSION}"))
    }

    /// Atomically replace the file for `category` with `text`.
    pub fn commit(&self, category: &str, text: &str) -> Result<PathBuf, WriteError> {
        let path = self.path_for(category);

        fs::create_dir_all(&self.dir).map_err(|source| WriteError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let mut file = NamedTempFile::new_in(&self.dir).map_err(|source| WriteError::Open {
            path: path.clone(),
            source,
        })?;

        write_all(&mut file, text, &path).map_err(|source| WriteError::Write {
            path: path.clone(),
            source,
        })?;

        file.persist(&path).map_err(|err| WriteError::Persist {
            path: path.clone(),
            source: err.error,
        })?;

        tracing::debug!(path = %path.display(), bytes = text.len(), "committed");
        Ok(path)
    }

    /// Whether the committed file for `category` already holds exactly `text`.
    pub fn is_up_to_date(&self, category: &str, text: &str) -> Result<bool, WriteError> {
        let path = self.path_for(category);
        match fs::read(&path) {
            Ok(current) => Ok(current == text.as_bytes()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(WriteError::Read { path, source }),
        }
    }
}

fn write_all(file: &mut NamedTempFile, text: &str, target: &Path) -> io::Result<()> {
    file.write_all(text.as_bytes())?;
    file.flush()?;
    match fs::metadata(target) {
        // keep the permissions of the file being replaced
        Ok(meta) => file.as_file().set_permissions(meta.permissions())?,
        Err(_) => set_default_permissions(file)?,
    }
    file.as_file().sync_all()
}

#[cfg(unix)]
fn set_default_permissions(file: &NamedTempFile) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt as _;

    // temporary files start out as 0600
    file.as_file()
        .set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_: &NamedTempFile) -> io::Result<()> {
    Ok(())
}
