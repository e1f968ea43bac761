//! # Configuration Splitter Module / 配置拆分模块
//!
//! Expands the feature sources of an aggregate [`RunConfig`] into individual
//! feature files and clones the configuration once per file, rewriting every
//! report destination with the file's worker index.
//!
//! 将聚合 [`RunConfig`] 的特性来源展开为单个 feature 文件，
//! 并为每个文件克隆一次配置，用该文件的工作索引重写所有报告目标。

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::config::{ExtendedOptions, FeatureFileConfig, Plugin, RunConfig};
use crate::core::error::SplitError;
use crate::core::models::WorkerIndex;
use crate::core::rewrite::{append_index_dir, rewrite, rewrite_plugin};
use crate::infra::fs;

/// Resolves every feature source into feature files, in discovery order.
///
/// Directory sources are expanded recursively and filtered by the feature
/// mask. File sources are taken as-is. A file reachable through several
/// sources is kept once, at its first position.
///
/// # Errors
/// - `SplitError::Io` if a source does not exist or cannot be read
/// - `SplitError::EmptyFeatureSet` if nothing is found
pub fn collect_feature_files(config: &RunConfig) -> Result<Vec<PathBuf>, SplitError> {
    let sources = &config.cucumber.features;
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for source in sources {
        let source_path = fs::absolute_path(source)?;
        let discovered = if source_path.is_dir() {
            fs::feature_files(&source_path, &config.feature_mask)?
        } else {
            vec![source_path]
        };
        tracing::debug!(
            source = %source.display(),
            count = discovered.len(),
            "expanded feature source"
        );

        for file in discovered {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    if files.is_empty() {
        return Err(SplitError::EmptyFeatureSet {
            sources: sources.clone(),
        });
    }
    Ok(files)
}

/// Splits an aggregate configuration into one configuration per feature file.
///
/// The clone at position `i` references only the `i`-th discovered feature
/// file and writes its reports under index `i`. All other options are copied
/// verbatim.
///
/// # Errors
/// Any error from [`collect_feature_files`], or `SplitError::ConfigClone` if a
/// report destination cannot be rewritten or two clones would share an
/// output location.
pub fn split(config: &RunConfig) -> Result<Vec<FeatureFileConfig>, SplitError> {
    let files = collect_feature_files(config)?;

    let clones = files
        .into_iter()
        .enumerate()
        .map(|(i, feature)| clone_for_feature(config, WorkerIndex(i), feature))
        .collect::<Result<Vec<_>, _>>()?;

    check_disjoint_outputs(&clones)?;
    tracing::debug!(count = clones.len(), "split configuration");
    Ok(clones)
}

/// Builds the configuration clone for a single feature file.
pub fn clone_for_feature(
    config: &RunConfig,
    index: WorkerIndex,
    feature: PathBuf,
) -> Result<FeatureFileConfig, SplitError> {
    let plugins = config
        .cucumber
        .plugins
        .iter()
        .map(|plugin| {
            rewrite_plugin(plugin, index).ok_or_else(|| {
                SplitError::clone_error(
                    &feature,
                    format!("plugin '{plugin}' has no file name to rewrite"),
                )
            })
        })
        .collect::<Result<Vec<Plugin>, _>>()?;

    let extended = config
        .extended
        .iter()
        .map(|ext| rewrite_extended(ext, index, &feature))
        .collect::<Result<Vec<_>, _>>()?;

    let mut cucumber = config.cucumber.clone();
    cucumber.features = vec![feature.clone()];
    cucumber.plugins = plugins;

    Ok(FeatureFileConfig {
        index,
        feature,
        engine: config.engine.clone(),
        cucumber,
        extended,
    })
}

fn rewrite_extended(
    ext: &ExtendedOptions,
    index: WorkerIndex,
    feature: &Path,
) -> Result<ExtendedOptions, SplitError> {
    let rewrite_one = |path: &String| {
        rewrite(path, index.get()).ok_or_else(|| {
            SplitError::clone_error(
                feature,
                format!("report path '{path}' has no file name to rewrite"),
            )
        })
    };
    let rewrite_all = |paths: &[String]| paths.iter().map(rewrite_one).collect::<Result<Vec<_>, _>>();

    Ok(ExtendedOptions {
        output_folder: ext
            .output_folder
            .as_deref()
            .map(|dir| append_index_dir(dir, index)),
        json_report: ext.json_report.as_ref().map(rewrite_one).transpose()?,
        json_usage_report: ext.json_usage_report.as_ref().map(rewrite_one).transpose()?,
        json_reports: rewrite_all(&ext.json_reports)?,
        json_usage_reports: rewrite_all(&ext.json_usage_reports)?,
        ..ext.clone()
    })
}

/// A clone may name one location twice (an extended block usually reads the
/// json plugin's output, and blocks may share an output folder), but no
/// location may be shared by two clones.
fn check_disjoint_outputs(clones: &[FeatureFileConfig]) -> Result<(), SplitError> {
    let mut seen = HashSet::new();
    for clone in clones {
        let own: HashSet<PathBuf> = clone
            .report_paths()
            .into_iter()
            .chain(clone.output_folders())
            .collect();
        for path in own {
            if !seen.insert(path.clone()) {
                return Err(SplitError::clone_error(
                    &clone.feature,
                    format!("output location '{}' is shared with another feature", path.display()),
                ));
            }
        }
    }
    Ok(())
}
