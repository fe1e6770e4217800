//! Scenario collector.
//!
//! Copies the contents of scenario directories into the staging directory,
//! keeping their relative layout.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::catalog::ScenarioCatalog;

/// Summary of what a copy wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Directories created or reused
    pub directories: usize,

    /// Files copied
    pub files: usize,

    /// Bytes copied
    pub bytes: u64,
}

impl CopyStats {
    fn merge(&mut self, other: CopyStats) {
        self.directories += other.directories;
        self.files += other.files;
        self.bytes += other.bytes;
    }
}

/// Errors that can occur while staging content.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("Scenario directory not found: {0}")]
    SourceNotFound(String),

    #[error("Failed to read {path}: {message}")]
    Walk { path: String, message: String },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Home page already exists in staging directory: {0}")]
    HomePageConflict(String),

    #[error("Failed to remove staging directory {path}: {source}")]
    Remove {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Copy the contents of `source` into `dest`.
///
/// `dest` and all directories below it are created first, then every file is
/// copied over any file already at the same relative path. The source
/// directory itself is not recreated: `source/a/b.md` lands at `dest/a/b.md`.
pub fn copy_scenario(source: &Path, dest: &Path) -> Result<CopyStats, CollectError> {
    if !source.is_dir() {
        return Err(CollectError::SourceNotFound(source.display().to_string()));
    }

    let mut stats = CopyStats::default();

    fs::create_dir_all(dest).map_err(|e| CollectError::CreateDir {
        path: dest.display().to_string(),
        source: e,
    })?;

    for dir in walk(source, |entry| entry.file_type().is_dir())? {
        let target = dest.join(relative_to(&dir, source));
        fs::create_dir_all(&target).map_err(|e| CollectError::CreateDir {
            path: target.display().to_string(),
            source: e,
        })?;
        stats.directories += 1;
    }

    for file in walk(source, |entry| !entry.file_type().is_dir())? {
        let target = dest.join(relative_to(&file, source));
        let bytes = fs::copy(&file, &target).map_err(|e| CollectError::Copy {
            from: file.display().to_string(),
            to: target.display().to_string(),
            source: e,
        })?;
        stats.files += 1;
        stats.bytes += bytes;
    }

    Ok(stats)
}

/// Copy the scenarios picked by `selectors` into `dest`.
///
/// Stops at the first scenario that fails; scenarios copied before it stay
/// in place.
pub fn collect<S: AsRef<str>>(
    catalog: &ScenarioCatalog,
    selectors: &[S],
    dest: &Path,
) -> Result<CopyStats, CollectError> {
    let mut total = CopyStats::default();

    for scenario in catalog.select(selectors) {
        tracing::info!("Copying scenario {}", scenario.tag);
        let stats = copy_scenario(&scenario.source_dir, dest)?;
        tracing::debug!(
            "Scenario {}: {} directories, {} files, {} bytes",
            scenario.tag,
            stats.directories,
            stats.files,
            stats.bytes
        );
        total.merge(stats);
    }

    Ok(total)
}

/// Collect every entry below `root` matching `keep`, excluding `root` itself.
fn walk(
    root: &Path,
    keep: impl Fn(&walkdir::DirEntry) -> bool,
) -> Result<Vec<PathBuf>, CollectError> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| CollectError::Walk {
            path: e
                .path()
                .unwrap_or(root)
                .display()
                .to_string(),
            message: e.to_string(),
        })?;

        if keep(&entry) {
            paths.push(entry.into_path());
        }
    }

    Ok(paths)
}

fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
