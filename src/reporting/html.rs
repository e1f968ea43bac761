//! # HTML Reporting Module / HTML 报告模块
//!
//! Renders a single-page HTML summary of a run: totals, one row per feature
//! file, and the collapsible engine output of failed features.
//!
//! 渲染运行的单页 HTML 摘要：统计信息、每个 feature 文件一行，
//! 以及失败 feature 的可折叠引擎输出。

use anyhow::{Context, Result};
use chrono::Local;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;

use crate::core::models::RunSummary;
use crate::infra::t;
use crate::reporting::console::get_output_for_display;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 2em; color: #222; }
.summary-container { display: flex; gap: 1.5em; margin-bottom: 1.5em; }
.summary-item { display: flex; flex-direction: column; align-items: center; }
.count { font-size: 2em; font-weight: bold; }
.passed-text { color: #2e7d32; }
.failed-text { color: #c62828; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: 0.4em 0.6em; text-align: left; }
.status-passed { color: #2e7d32; font-weight: bold; }
.status-failed { color: #c62828; font-weight: bold; }
.status-timeout { color: #ef6c00; font-weight: bold; }
pre.output-content { background: #f6f8fa; padding: 1em; overflow-x: auto; }
"#;

/// Renders the run summary as an HTML document.
///
/// 将运行摘要渲染为 HTML 文档。
pub fn render_html_report(summary: &RunSummary, locale: &str) -> Markup {
    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale).to_string()) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale).to_string()) }
                p { (t!("html_report.generated_at", locale = locale, time = &generated_at).to_string()) }
                div.summary-container {
                    div.summary-item {
                        span.count { (summary.outcomes.len()) }
                        span.label { (t!("html_report.summary.total", locale = locale).to_string()) }
                    }
                    div.summary-item {
                        span.count.passed-text { (summary.passed_count()) }
                        span.label { (t!("html_report.summary.passed", locale = locale).to_string()) }
                    }
                    div.summary-item {
                        span.count.failed-text { (summary.failed_count()) }
                        span.label { (t!("html_report.summary.failed", locale = locale).to_string()) }
                    }
                    div.summary-item {
                        span.count { (summary.capacity) }
                        span.label { (t!("html_report.summary.capacity", locale = locale).to_string()) }
                    }
                }
                table {
                    thead {
                        tr {
                            th { "#" }
                            th { (t!("html_report.table.header.feature", locale = locale).to_string()) }
                            th { (t!("html_report.table.header.status", locale = locale).to_string()) }
                            th { (t!("html_report.table.header.duration", locale = locale).to_string()) }
                        }
                    }
                    tbody {
                        @for outcome in &summary.outcomes {
                            tr {
                                td { (outcome.index().get()) }
                                td { (outcome.feature().display().to_string()) }
                                td class=(outcome.get_status_class()) { (outcome.get_status_str(locale)) }
                                td { (format!("{:.2}s", outcome.duration().as_secs_f64())) }
                            }
                            @if outcome.is_failure() {
                                tr {
                                    td colspan="4" {
                                        details {
                                            summary { (t!("html_report.toggle_output", locale = locale).to_string()) }
                                            pre.output-content { (get_output_for_display(outcome, locale)) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Writes the HTML run summary to `output_path`, creating parent directories.
///
/// 将 HTML 运行摘要写入 `output_path`，并创建父目录。
pub fn generate_html_report(summary: &RunSummary, output_path: &Path, locale: &str) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let markup = render_html_report(summary, locale);
    fs::write(output_path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))?;
    Ok(())
}
