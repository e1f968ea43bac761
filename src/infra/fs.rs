//! # File System Operations Module / 文件系统操作模块
//!
//! This module discovers feature files under a root directory and prepares
//! report directories before a feature run starts.
//!
//! 此模块在根目录下发现 feature 文件，并在 feature 运行开始前准备报告目录。

use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::config::FeatureFileConfig;
use crate::core::error::SplitError;

/// Recursively lists every file under `root` as an absolute path.
///
/// Entries are visited depth-first and sorted by file name within each
/// directory, so the order is stable for a given filesystem state.
///
/// # Errors
/// `SplitError::Io` if `root` does not exist or any directory below it
/// cannot be read.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, SplitError> {
    let root = absolute_path(root)?;
    let mut files = Vec::new();

    for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
            SplitError::Io {
                path,
                source: e.into(),
            }
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Keeps the paths whose form relative to `root` matches the glob `mask`.
///
/// A `*` also crosses directory separators, so `*.feature` matches files at
/// any depth.
pub fn filter_by_mask(
    root: &Path,
    paths: Vec<PathBuf>,
    mask: &str,
) -> Result<Vec<PathBuf>, SplitError> {
    let pattern = Pattern::new(mask).map_err(|source| SplitError::InvalidMask {
        pattern: mask.to_string(),
        source,
    })?;

    Ok(paths
        .into_iter()
        .filter(|path| {
            let relative = path.strip_prefix(root).unwrap_or(path);
            pattern.matches_path(relative)
        })
        .collect())
}

/// Lists the feature files under a directory source.
pub fn feature_files(root: &Path, mask: &str) -> Result<Vec<PathBuf>, SplitError> {
    let root = absolute_path(root)?;
    let files = list_files(&root)?;
    filter_by_mask(&root, files, mask)
}

/// Gets the absolute, canonical form of an existing path.
///
/// # Errors
/// `SplitError::Io` if the path does not exist.
pub fn absolute_path(path: &Path) -> Result<PathBuf, SplitError> {
    fs::canonicalize(path).map_err(|source| SplitError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates the directories a feature run writes into: the parent of every
/// report file and every output folder. Relative paths are resolved against
/// the engine's working directory.
pub fn prepare_report_dirs(config: &FeatureFileConfig) -> std::io::Result<()> {
    let base_dir = config.engine.working_dir.clone().unwrap_or_default();
    let report_parents = config
        .report_paths()
        .into_iter()
        .filter_map(|p| p.parent().map(Path::to_path_buf))
        .filter(|p| !p.as_os_str().is_empty());

    for dir in report_parents.chain(config.output_folders()) {
        fs::create_dir_all(base_dir.join(dir))?;
    }
    Ok(())
}
