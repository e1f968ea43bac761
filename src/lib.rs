//! # Parallel Features Library / Parallel Features 库
//!
//! This library splits one aggregate BDD run configuration into one
//! configuration per feature file and executes those runs on a bounded
//! worker pool, keeping every run's report output in its own location.
//!
//! 此库将一个聚合的 BDD 运行配置拆分为每个 feature 文件一个配置，
//! 并在有界工作池上执行这些运行，使每次运行的报告输出互不冲突。
//!
//! ## Modules / 模块
//!
//! - `core` - Configuration model, splitting, worker pool and orchestration
//! - `infra` - Infrastructure services like file discovery and process execution
//! - `reporting` - Run summary reporting for the console and HTML
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 配置模型、拆分、工作池与编排
//! - `infra` - 基础设施服务，如文件发现和进程执行
//! - `reporting` - 控制台与 HTML 的运行摘要报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::config;
pub use crate::core::models;
pub use crate::core::orchestrator;

/// Maps a requested locale onto one of the bundled locales.
pub fn resolve_locale(requested: &str) -> &str {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&requested) {
        return requested;
    }
    requested
        .split('-')
        .next()
        .filter(|lang_code| available_locales.contains(lang_code))
        .unwrap_or("en")
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
