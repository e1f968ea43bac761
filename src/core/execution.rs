//! # Execution Module / 执行模块
//!
//! This module defines the boundary to the external scenario engine and the
//! runnable unit the worker pool executes: one feature file configuration
//! paired with an engine invocation.
//!
//! 此模块定义了与外部场景引擎的边界，以及工作池执行的可运行单元：
//! 一个 feature 文件配置与一次引擎调用的组合。

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use colored::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::config::{FeatureFileConfig, Plugin, ReportKind};
use crate::core::models::{FailureReason, UnitInfo, UnitOutcome};
use crate::infra::{command, fs, t};

/// What the scenario engine reports for one feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub passed: bool,
    pub details: String,
}

impl ScenarioReport {
    pub fn passed(details: impl Into<String>) -> Self {
        Self {
            passed: true,
            details: details.into(),
        }
    }

    pub fn failed(details: impl Into<String>) -> Self {
        Self {
            passed: false,
            details: details.into(),
        }
    }
}

/// The external BDD engine that runs the scenarios of a single feature file.
///
/// An `Err` means the engine could not be invoked; failing scenarios are an
/// `Ok` report with `passed == false`.
#[async_trait]
pub trait ScenarioEngine: Send + Sync {
    async fn run_scenarios(&self, config: &FeatureFileConfig) -> Result<ScenarioReport>;
}

/// Error raised by [`CommandEngine`] when its timeout elapses.
#[derive(Debug, thiserror::Error)]
#[error("engine timed out after {0:?}")]
pub struct EngineTimeout(pub Duration);

/// Runs a command template once per feature file.
///
/// The template is shell-expanded, split into arguments, and each argument has
/// its placeholders substituted:
///
/// | placeholder        | value                                              |
/// |--------------------|----------------------------------------------------|
/// | `{feature}`        | the feature file                                   |
/// | `{index}`          | the worker index                                   |
/// | `{tags}`           | tag filters joined with ` and `                    |
/// | `{name}`           | name filters joined with `|`                       |
/// | `{output_folder}`  | the first rewritten extended output folder         |
/// | `{report:<kind>}`  | the rewritten path of the first plugin of `<kind>` |
/// | `{plugins}`        | one argument per plugin (whole argument only)      |
#[derive(Debug, Clone, Default)]
pub struct CommandEngine;

impl CommandEngine {
    pub fn new() -> Self {
        Self
    }

    /// Builds the argument vector for a feature file.
    pub fn build_args(config: &FeatureFileConfig) -> Result<Vec<String>> {
        let template = &config.engine.command;
        let expanded = shellexpand::full(template)
            .with_context(|| format!("Failed to expand command: {template}"))?
            .to_string();
        let parts = shlex::split(&expanded)
            .ok_or_else(|| anyhow!("Failed to parse command: {}", expanded))?;

        if parts.is_empty() {
            return Err(anyhow!("Empty command after parsing."));
        }

        let mut args = Vec::with_capacity(parts.len());
        for part in parts {
            if part == "{plugins}" {
                args.extend(config.cucumber.plugins.iter().map(Plugin::to_string));
            } else {
                args.push(substitute(&part, config));
            }
        }
        Ok(args)
    }

    fn build_command(config: &FeatureFileConfig) -> Result<tokio::process::Command> {
        let args = Self::build_args(config)?;
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| anyhow!("Empty command after parsing."))?;

        let mut cmd = tokio::process::Command::new(program);
        cmd.args(rest).kill_on_drop(true);
        if let Some(dir) = &config.engine.working_dir {
            cmd.current_dir(dir);
        }
        cmd.env("PARALLEL_FEATURE", &config.feature)
            .env("PARALLEL_WORKER_INDEX", config.index.to_string())
            .env("PARALLEL_PLUGINS", joined_plugins(config))
            .env("PARALLEL_TAGS", config.cucumber.tags.join(" and "))
            .envs(&config.engine.env);
        Ok(cmd)
    }
}

#[async_trait]
impl ScenarioEngine for CommandEngine {
    async fn run_scenarios(&self, config: &FeatureFileConfig) -> Result<ScenarioReport> {
        fs::prepare_report_dirs(config).with_context(|| {
            format!(
                "Failed to create report directories for {}",
                config.feature.display()
            )
        })?;
        let cmd = Self::build_command(config)?;

        let execution = command::spawn_and_capture(cmd);
        let (status, output) = match config.engine.timeout_secs.map(Duration::from_secs) {
            Some(limit) => tokio::time::timeout(limit, execution)
                .await
                .map_err(|_| EngineTimeout(limit))?,
            None => execution.await,
        };
        let status = status.with_context(|| {
            format!("Failed to launch engine for {}", config.feature.display())
        })?;

        Ok(ScenarioReport {
            passed: status.success(),
            details: output,
        })
    }
}

fn substitute(part: &str, config: &FeatureFileConfig) -> String {
    let mut value = part
        .replace("{feature}", &config.feature.to_string_lossy())
        .replace("{index}", &config.index.to_string())
        .replace("{tags}", &config.cucumber.tags.join(" and "))
        .replace("{name}", &config.cucumber.name.join("|"))
        .replace(
            "{output_folder}",
            &config
                .output_folders()
                .first()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
    for kind in ReportKind::ALL {
        let placeholder = format!("{{report:{kind}}}");
        if value.contains(&placeholder) {
            let path = config
                .report_for(kind)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            value = value.replace(&placeholder, &path);
        }
    }
    value
}

fn joined_plugins(config: &FeatureFileConfig) -> String {
    config
        .cucumber
        .plugins
        .iter()
        .map(Plugin::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// One feature file configuration paired with the engine that runs it.
/// Consumed exactly once by the worker pool.
pub struct RunnableUnit {
    config: FeatureFileConfig,
    engine: Arc<dyn ScenarioEngine>,
}

impl RunnableUnit {
    pub fn new(config: FeatureFileConfig, engine: Arc<dyn ScenarioEngine>) -> Self {
        Self { config, engine }
    }

    pub fn info(&self) -> UnitInfo {
        UnitInfo {
            index: self.config.index,
            feature: self.config.feature.clone(),
        }
    }

    /// Runs the feature file and converts the engine's answer into an outcome.
    pub async fn execute(self) -> UnitOutcome {
        let unit = self.info();
        let feature = unit.feature.display().to_string();
        println!("{}", t!("run.running_feature", name = &feature, index = unit.index).blue());

        let start_time = Instant::now();
        let result = self.engine.run_scenarios(&self.config).await;
        let duration = start_time.elapsed();
        let secs = format!("{:.2}", duration.as_secs_f64());

        match result {
            Ok(report) if report.passed => {
                println!("{}", t!("run.feature_passed", name = &feature, duration = &secs).green());
                UnitOutcome::Passed {
                    unit,
                    output: report.details,
                    duration,
                }
            }
            Ok(report) => {
                println!("{}", t!("run.feature_failed", name = &feature, duration = &secs).red());
                UnitOutcome::Failed {
                    unit,
                    output: report.details,
                    reason: FailureReason::ScenarioFailed,
                    duration,
                }
            }
            Err(e) => {
                let reason = if e.downcast_ref::<EngineTimeout>().is_some() {
                    println!("{}", t!("run.feature_timeout", name = &feature).red());
                    FailureReason::Timeout
                } else {
                    println!("{}", t!("run.engine_error", name = &feature).red());
                    FailureReason::Engine
                };
                UnitOutcome::Failed {
                    unit,
                    output: format!("{e:#}"),
                    reason,
                    duration,
                }
            }
        }
    }
}
