//! # Split Command Module / 拆分命令模块
//!
//! Prints the per-feature configurations the `run` command would execute,
//! without running anything.
//!
//! 打印 `run` 命令将要执行的每个 feature 的配置，但不运行任何内容。

use anyhow::{Context, Result};
use colored::*;
use std::{fs, path::PathBuf};

use crate::{cli::commands::run::setup_and_parse_config, core::splitter, infra::t};

/// Executes the split command.
///
/// # Arguments
/// * `config` - Path to the run configuration file
/// * `output` - Optional file to write the JSON plan to instead of stdout
pub fn execute(config: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let (run_config, _) = setup_and_parse_config(&config)?;
    let clones = splitter::split(&run_config)?;
    let json = serde_json::to_string_pretty(&clones).context("Failed to serialize split plan")?;

    match output {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("Failed to write split plan: {}", path.display()))?;
            eprintln!(
                "{}",
                t!("split.written", count = clones.len(), path = path.display()).green()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
