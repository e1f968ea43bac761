//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command, which splits the configured
//! suite into one run per feature file and executes them on the worker pool.
//!
//! 此模块实现了 `run` 命令，将配置的测试套件拆分为每个 feature 文件一次运行，
//! 并在工作池上执行它们。

use anyhow::{Context, Result};
use colored::*;
use std::{fs, path::Path, path::PathBuf, sync::Arc};

use crate::{
    core::{
        config::{self, RunConfig},
        execution::CommandEngine,
        orchestrator::Orchestrator,
    },
    infra::t,
    reporting::{
        console::{print_failure_details, print_summary},
        html::generate_html_report,
    },
};

/// Executes the run command with the provided arguments.
///
/// # Arguments
/// * `config` - Path to the run configuration file
/// * `jobs` - Optional override of the thread count
/// * `html` - Optional path for the HTML run summary
/// * `lang_override` - Language passed on the command line, if any
///
/// # Returns
/// `Ok(true)` if every feature passed, `Ok(false)` if any failed, and an
/// error if the run could not start.
pub async fn execute(
    config: PathBuf,
    jobs: Option<usize>,
    html: Option<PathBuf>,
    lang_override: Option<String>,
) -> Result<bool> {
    let (run_config, config_path) = setup_and_parse_config(&config)?;

    let requested = lang_override.unwrap_or_else(|| run_config.language.clone());
    let locale = crate::resolve_locale(&requested);
    rust_i18n::set_locale(locale);

    println!(
        "{}",
        t!("loading_config", locale = locale, path = config_path.display())
    );

    let orchestrator = Orchestrator::new(Arc::new(CommandEngine::new())).with_jobs(jobs);
    let capacity = orchestrator.resolve_thread_count(&run_config);
    println!(
        "{}",
        t!("running_with_threads", locale = locale, count = capacity).bold()
    );

    let summary = orchestrator
        .run(&run_config)
        .await
        .with_context(|| t!("run_start_failed", locale = locale).to_string())?;

    print_summary(&summary, locale);

    if let Some(report_path) = &html {
        println!(
            "\n{}",
            t!("generating_html", locale = locale, path = report_path.display())
        );
        if let Err(e) = generate_html_report(&summary, report_path, locale) {
            eprintln!("{} {:#}", t!("html_failed", locale = locale).red(), e);
        }
    }

    if summary.verdict.is_passed() {
        println!("\n{}", t!("all_features_passed", locale = locale).green().bold());
        Ok(true)
    } else {
        print_failure_details(&summary.failures(), locale);
        println!(
            "\n{}",
            t!("features_failed", locale = locale, count = summary.failed_count())
                .red()
                .bold()
        );
        Ok(false)
    }
}

/// Resolves and parses the run configuration file.
pub(crate) fn setup_and_parse_config(config_path_arg: &Path) -> Result<(RunConfig, PathBuf)> {
    let config_path = fs::canonicalize(config_path_arg).with_context(|| {
        t!("config_read_failed_path", path = config_path_arg.display()).to_string()
    })?;

    let run_config = config::load_run_config(&config_path)
        .with_context(|| t!("config_parse_failed").to_string())?;

    // Relative feature sources and working directories are relative to the config file.
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok((anchor_paths(run_config, &base_dir), config_path))
}

fn anchor_paths(mut config: RunConfig, base_dir: &Path) -> RunConfig {
    config.cucumber.features = config
        .cucumber
        .features
        .into_iter()
        .map(|p| if p.is_relative() { base_dir.join(p) } else { p })
        .collect();
    config.engine.working_dir = Some(match config.engine.working_dir.take() {
        Some(dir) if dir.is_relative() => base_dir.join(dir),
        Some(dir) => dir,
        None => base_dir.to_path_buf(),
    });
    config
}
