//! # Output Path Rewriter / 输出路径重写器
//!
//! Embeds a worker index into report destinations so that concurrent feature
//! runs sharing one nominal report path write to disjoint locations.
//!
//! 将工作索引嵌入报告目标路径，使共享同一名义报告路径的并发 feature 运行
//! 写入互不相交的位置。
//!
//! Two strategies exist:
//! - report files (kind-prefixed or bare): `dir/name.json` becomes `dir/<index>/name.json`
//! - output folders: `dir` becomes `dir/<index>`
//!
//! Rewriting is not idempotent. Always rewrite from the original, un-rewritten value.

use std::path::{Path, PathBuf};

use crate::core::config::{Plugin, ReportDestination, ReportKind};
use crate::core::models::WorkerIndex;

/// Rewrites a report path string, preserving a known kind prefix.
///
/// Returns `None` when the path has no file name to anchor the index on.
///
/// ```
/// use parallel_features::core::rewrite::rewrite;
/// assert_eq!(rewrite("json:out/report.json", 3).as_deref(), Some("json:out/3/report.json"));
/// assert_eq!(rewrite("out/report.html", 0).as_deref(), Some("out/0/report.html"));
/// ```
pub fn rewrite(path: &str, index: usize) -> Option<String> {
    match split_kind_prefix(path) {
        Some((kind, rest)) => {
            insert_index_segment(rest, index).map(|rewritten| format!("{kind}:{rewritten}"))
        }
        None => insert_index_segment(path, index),
    }
}

/// Rewrites the filesystem path of a report destination.
pub fn rewrite_destination(
    dest: &ReportDestination,
    index: WorkerIndex,
) -> Option<ReportDestination> {
    let path = dest.path.to_str()?;
    insert_index_segment(path, index.get()).map(|rewritten| ReportDestination {
        kind: dest.kind,
        path: PathBuf::from(rewritten),
    })
}

/// Rewrites a plugin. Console plugins have no path and are returned unchanged.
pub fn rewrite_plugin(plugin: &Plugin, index: WorkerIndex) -> Option<Plugin> {
    match plugin {
        Plugin::Console(kind) => Some(Plugin::Console(*kind)),
        Plugin::Destination(dest) => rewrite_destination(dest, index).map(Plugin::Destination),
    }
}

/// Appends the worker index to an output folder: `dir` becomes `dir/<index>`.
pub fn append_index_dir(dir: &Path, index: WorkerIndex) -> PathBuf {
    dir.join(index.to_string())
}

fn split_kind_prefix(path: &str) -> Option<(ReportKind, &str)> {
    let (prefix, rest) = path.split_once(':')?;
    prefix.parse::<ReportKind>().ok().map(|kind| (kind, rest))
}

fn insert_index_segment(path: &str, index: usize) -> Option<String> {
    let as_path = Path::new(path);
    let name = as_path.file_name()?.to_str()?;
    match as_path.parent().map(|p| p.to_string_lossy()) {
        Some(parent) if !parent.is_empty() => {
            let parent = parent.strip_suffix('/').unwrap_or(&parent);
            Some(format!("{parent}/{index}/{name}"))
        }
        _ => Some(format!("{index}/{name}")),
    }
}
