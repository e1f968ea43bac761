//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which creates a starter
//! `Parallel.toml`, either from defaults or through an interactive wizard.
//!
//! 此模块实现了 `init` 命令，通过默认值或交互式向导创建初始的 `Parallel.toml`。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::{fs, path::Path, path::PathBuf};

use crate::infra::t;

/// Answers collected by the wizard, or the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitAnswers {
    pub features_dir: String,
    pub command: String,
    pub threads: usize,
    pub report_dir: String,
    pub language: String,
}

impl InitAnswers {
    pub fn defaults(language: &str) -> Self {
        Self {
            features_dir: "tests/features".to_string(),
            command: "cargo test --test cucumber -- --input {feature}".to_string(),
            threads: default_threads(),
            report_dir: "target/cucumber".to_string(),
            language: language.to_string(),
        }
    }
}

/// Half of the logical CPUs plus one, which leaves room for the engine's own threads.
pub fn default_threads() -> usize {
    num_cpus::get() / 2 + 1
}

/// Renders the configuration file for a set of answers.
pub fn render_config(answers: &InitAnswers) -> String {
    format!(
        r#"# Parallel Features configuration / Parallel Features 配置

# Language for console messages / 控制台消息的语言
language = "{language}"

# Files under directory sources that count as feature files / 目录来源中视为 feature 文件的掩码
feature_mask = "*.feature"

[engine]
# Launched once per feature file / 每个 feature 文件启动一次
# Placeholders / 占位符: {{feature}} {{index}} {{tags}} {{name}} {{output_folder}} {{report:json}} {{plugins}}
command = "{command}"
# timeout_secs = 600

[cucumber]
features = ["{features_dir}"]
# Every report path gets the feature index inserted: {report_dir}/<index>/report.json
# 每个报告路径都会插入 feature 索引：{report_dir}/<index>/report.json
plugins = ["json:{report_dir}/report.json", "junit:{report_dir}/report.xml"]
tags = []
strict = true

[[extended]]
# Number of feature files run at the same time / 同时运行的 feature 文件数量
threads_count = {threads}
output_folder = "{report_dir}/extended"
json_report = "{report_dir}/report.json"
"#,
        language = answers.language,
        command = answers.command.replace('\\', "\\\\").replace('"', "\\\""),
        features_dir = answers.features_dir,
        report_dir = answers.report_dir,
        threads = answers.threads,
    )
}

/// Executes the init command.
///
/// # Arguments
/// * `output` - Path for the new configuration file
/// * `force` - Whether to overwrite an existing file
/// * `non_interactive` - Skip the wizard and write the defaults
/// * `language` - Language for the generated file and messages
///
/// # Returns
/// `Ok(false)` if an existing file was left untouched because `force` was not set.
pub fn execute(output: PathBuf, force: bool, non_interactive: bool, language: &str) -> Result<bool> {
    if output.exists() && !force {
        println!("{}", t!("init.file_exists", path = output.display()).red());
        println!("{}", t!("init.use_force").yellow());
        return Ok(false);
    }

    let answers = if non_interactive {
        InitAnswers::defaults(language)
    } else {
        match run_wizard(language)? {
            Some(answers) => answers,
            None => {
                println!("{}", t!("init.cancelled").yellow());
                return Ok(true);
            }
        }
    };

    write_config(&output, &answers)?;

    println!("{}", t!("init.success", path = output.display()).green());
    println!("{}", t!("init.next_steps"));
    Ok(true)
}

fn run_wizard(language: &str) -> Result<Option<InitAnswers>> {
    let theme = ColorfulTheme::default();
    let defaults = InitAnswers::defaults(language);

    let features_dir: String = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_features").to_string())
        .default(defaults.features_dir)
        .interact_text()?;
    let command: String = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_command").to_string())
        .default(defaults.command)
        .interact_text()?;
    let threads: usize = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_threads").to_string())
        .default(defaults.threads)
        .validate_with(|n: &usize| {
            if *n >= 1 {
                Ok(())
            } else {
                Err(t!("init.threads_invalid").to_string())
            }
        })
        .interact_text()?;
    let report_dir: String = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_report_dir").to_string())
        .default(defaults.report_dir)
        .interact_text()?;

    let confirmed = Confirm::with_theme(&theme)
        .with_prompt(t!("init.prompt_confirm").to_string())
        .default(true)
        .interact()?;

    Ok(confirmed.then(|| InitAnswers {
        features_dir,
        command,
        threads,
        report_dir,
        language: language.to_string(),
    }))
}

fn write_config(output: &Path, answers: &InitAnswers) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            t!("init.create_parent_dir_failed", path = parent.display()).to_string()
        })?;
    }

    fs::write(output, render_config(answers))
        .with_context(|| t!("init.write_failed", path = output.display()).to_string())?;
    Ok(())
}
