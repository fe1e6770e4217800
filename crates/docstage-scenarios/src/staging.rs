//! Staging directory MkDocs builds from.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::collector::CollectError;

/// The transient `docs` directory assembled for one run.
#[derive(Debug, Clone)]
pub struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    /// Create the staging directory, reusing it if it already exists.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, CollectError> {
        let path = path.into();
        fs::create_dir_all(&path).map_err(|e| CollectError::CreateDir {
            path: path.display().to_string(),
            source: e,
        })?;

        tracing::debug!("Staging directory ready at {}", path.display());
        Ok(Self { path })
    }

    /// Path of the staging directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy the site home page into the root of the staging directory.
    ///
    /// Unlike scenario files, the home page never overwrites: an existing
    /// file with the same name is reported as a conflict.
    pub fn copy_home_page(&self, home_page: &Path) -> Result<PathBuf, CollectError> {
        let file_name = home_page
            .file_name()
            .ok_or_else(|| CollectError::SourceNotFound(home_page.display().to_string()))?;
        let target = self.path.join(file_name);

        let copy_error = |e: io::Error| CollectError::Copy {
            from: home_page.display().to_string(),
            to: target.display().to_string(),
            source: e,
        };

        let mut reader = File::open(home_page).map_err(copy_error)?;
        let mut writer = match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(CollectError::HomePageConflict(target.display().to_string()));
            }
            Err(e) => return Err(copy_error(e)),
        };
        io::copy(&mut reader, &mut writer).map_err(copy_error)?;

        tracing::info!("Copied home page to {}", target.display());
        Ok(target)
    }

    /// Delete the staging directory and everything in it.
    pub fn remove(self) -> Result<(), CollectError> {
        fs::remove_dir_all(&self.path).map_err(|e| CollectError::Remove {
            path: self.path.display().to_string(),
            source: e,
        })?;

        tracing::info!("Removed {}", self.path.display());
        Ok(())
    }
}
