//! # Configuration Module / 配置模块
//!
//! Defines the aggregate run configuration loaded from `Parallel.toml` and the
//! per-feature-file configuration produced by the splitter.
//!
//! 定义从 `Parallel.toml` 加载的聚合运行配置，以及由拆分器生成的
//! 每个 feature 文件的配置。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::models::WorkerIndex;

/// The kind of report a cucumber plugin produces.
/// cucumber 插件生成的报告类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Usage,
    Junit,
    Json,
    Html,
    Pretty,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::Usage,
        ReportKind::Junit,
        ReportKind::Json,
        ReportKind::Html,
        ReportKind::Pretty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Usage => "usage",
            ReportKind::Junit => "junit",
            ReportKind::Json => "json",
            ReportKind::Html => "html",
            ReportKind::Pretty => "pretty",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown report kind '{s}'"))
    }
}

/// A report written to the filesystem, optionally tagged with its kind.
/// 写入文件系统的报告，可选地带有其类型标记。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportDestination {
    /// `None` for a bare path without a kind prefix.
    pub kind: Option<ReportKind>,
    /// Filesystem path, never carrying the kind prefix.
    pub path: PathBuf,
}

impl fmt::Display for ReportDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{}:{}", kind, self.path.display()),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

/// A cucumber plugin declaration.
///
/// Accepted string forms are `"<kind>:<path>"`, a bare path, or a bare kind
/// name such as `"pretty"` which writes to the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Plugin {
    Console(ReportKind),
    Destination(ReportDestination),
}

impl Plugin {
    pub fn destination(&self) -> Option<&ReportDestination> {
        match self {
            Plugin::Console(_) => None,
            Plugin::Destination(dest) => Some(dest),
        }
    }

    pub fn kind(&self) -> Option<ReportKind> {
        match self {
            Plugin::Console(kind) => Some(*kind),
            Plugin::Destination(dest) => dest.kind,
        }
    }
}

impl FromStr for Plugin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("plugin declaration is empty".to_string());
        }
        if let Ok(kind) = s.parse::<ReportKind>() {
            return Ok(Plugin::Console(kind));
        }
        let (kind, path) = match s.split_once(':') {
            Some((prefix, rest)) => match prefix.parse::<ReportKind>() {
                Ok(kind) => (Some(kind), rest),
                Err(_) => (None, s),
            },
            None => (None, s),
        };
        Ok(Plugin::Destination(ReportDestination {
            kind,
            path: PathBuf::from(path),
        }))
    }
}

impl TryFrom<String> for Plugin {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Plugin> for String {
    fn from(plugin: Plugin) -> Self {
        plugin.to_string()
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plugin::Console(kind) => write!(f, "{kind}"),
            Plugin::Destination(dest) => write!(f, "{dest}"),
        }
    }
}

/// Options handed to the scenario engine for every feature file.
/// 为每个 feature 文件传递给场景引擎的选项。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CucumberOptions {
    /// Feature sources: directories are expanded recursively, files are taken as-is.
    /// 特性来源：目录会被递归展开，文件按原样使用。
    #[serde(default)]
    pub features: Vec<PathBuf>,
    #[serde(default)]
    pub plugins: Vec<Plugin>,
    #[serde(default)]
    pub glue: Vec<String>,
    /// Tag filters, e.g. `@smoke` or `not @wip`.
    /// 标签过滤器，例如 `@smoke` 或 `not @wip`。
    #[serde(default)]
    pub tags: Vec<String>,
    /// Scenario name filters.
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub monochrome: bool,
    #[serde(default)]
    pub dry_run: bool,
}

/// Extended reporting options. Several blocks may be declared.
/// 扩展报告选项，可以声明多个块。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtendedOptions {
    /// Requested number of concurrent feature runs. The largest value across
    /// all blocks sizes the worker pool.
    /// 请求的并发 feature 运行数。所有块中的最大值决定工作池大小。
    #[serde(default = "default_threads_count")]
    pub threads_count: usize,
    /// Directory for aggregated reports. Rewritten to `<dir>/<index>` per feature file.
    /// 汇总报告的目录。每个 feature 文件重写为 `<dir>/<index>`。
    #[serde(default)]
    pub output_folder: Option<PathBuf>,
    #[serde(default = "default_report_prefix")]
    pub report_prefix: String,
    #[serde(default)]
    pub json_report: Option<String>,
    #[serde(default)]
    pub json_usage_report: Option<String>,
    #[serde(default)]
    pub json_reports: Vec<String>,
    #[serde(default)]
    pub json_usage_reports: Vec<String>,
    #[serde(default)]
    pub overview_report: bool,
    #[serde(default)]
    pub usage_report: bool,
    #[serde(default)]
    pub detailed_report: bool,
}

impl Default for ExtendedOptions {
    fn default() -> Self {
        Self {
            threads_count: default_threads_count(),
            output_folder: None,
            report_prefix: default_report_prefix(),
            json_report: None,
            json_usage_report: None,
            json_reports: vec![],
            json_usage_reports: vec![],
            overview_report: false,
            usage_report: false,
            detailed_report: false,
        }
    }
}

/// How the external scenario engine is launched for one feature file.
/// 如何为单个 feature 文件启动外部场景引擎。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Command template, e.g. `cargo test --test cucumber -- {feature}`.
    /// 命令模板，例如 `cargo test --test cucumber -- {feature}`。
    pub command: String,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Per-invocation timeout. A unit that exceeds it fails on its own.
    /// 单次调用超时。超时的单元单独失败。
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

/// The aggregate run configuration, immutable once loaded.
/// 聚合运行配置，加载后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    #[serde(default = "default_language")]
    pub language: String,
    /// Glob applied to files discovered under directory sources.
    /// 应用于目录来源中发现的文件的 glob 掩码。
    #[serde(default = "default_feature_mask")]
    pub feature_mask: String,
    pub engine: EngineConfig,
    #[serde(default)]
    pub cucumber: CucumberOptions,
    #[serde(default)]
    pub extended: Vec<ExtendedOptions>,
}

impl RunConfig {
    /// Builds a configuration with the given feature sources and engine command
    /// and defaults everywhere else.
    pub fn new(features: Vec<PathBuf>, command: impl Into<String>) -> Self {
        Self {
            language: default_language(),
            feature_mask: default_feature_mask(),
            engine: EngineConfig {
                command: command.into(),
                env: BTreeMap::new(),
                timeout_secs: None,
                working_dir: None,
            },
            cucumber: CucumberOptions {
                features,
                ..CucumberOptions::default()
            },
            extended: vec![],
        }
    }

    /// Every thread-count hint declared by the extended option blocks.
    pub fn thread_hints(&self) -> impl Iterator<Item = usize> + '_ {
        self.extended.iter().map(|ext| ext.threads_count)
    }
}

/// A per-feature-file derivative of [`RunConfig`].
///
/// It references exactly one feature file, and every report destination and
/// output folder carries its worker index so concurrent runs never share an
/// output location.
///
/// [`RunConfig`] 的单个 feature 文件派生配置。
/// 它只引用一个 feature 文件，所有报告目标和输出目录都带有其工作索引，
/// 因此并发运行永远不会共享输出位置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureFileConfig {
    pub index: WorkerIndex,
    pub feature: PathBuf,
    pub engine: EngineConfig,
    pub cucumber: CucumberOptions,
    pub extended: Vec<ExtendedOptions>,
}

impl FeatureFileConfig {
    /// All filesystem report destinations of this clone, plugins first.
    pub fn report_paths(&self) -> Vec<PathBuf> {
        let plugin_paths = self
            .cucumber
            .plugins
            .iter()
            .filter_map(Plugin::destination)
            .map(|dest| dest.path.clone());

        let extended_paths = self.extended.iter().flat_map(|ext| {
            ext.json_report
                .iter()
                .chain(ext.json_usage_report.iter())
                .chain(ext.json_reports.iter())
                .chain(ext.json_usage_reports.iter())
                .filter_map(|value| report_file(value))
                .collect::<Vec<_>>()
        });

        plugin_paths.chain(extended_paths).collect()
    }

    /// All output folders of this clone.
    pub fn output_folders(&self) -> Vec<PathBuf> {
        self.extended
            .iter()
            .filter_map(|ext| ext.output_folder.clone())
            .collect()
    }

    /// The rewritten path of the first plugin of the given kind.
    pub fn report_for(&self, kind: ReportKind) -> Option<&Path> {
        self.cucumber
            .plugins
            .iter()
            .filter_map(Plugin::destination)
            .find(|dest| dest.kind == Some(kind))
            .map(|dest| dest.path.as_path())
    }
}

/// The filesystem path of an extended report value, without its kind prefix.
fn report_file(value: &str) -> Option<PathBuf> {
    let plugin = value.parse::<Plugin>().ok()?;
    plugin.destination().map(|dest| dest.path.clone())
}

/// Loads and parses the run configuration from a TOML file.
/// 从 TOML 文件加载并解析运行配置。
pub fn load_run_config(path: &Path) -> Result<RunConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: RunConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

fn default_language() -> String {
    "en".to_string()
}

fn default_feature_mask() -> String {
    "*.feature".to_string()
}

fn default_threads_count() -> usize {
    1
}

fn default_report_prefix() -> String {
    "cucumber-results".to_string()
}
