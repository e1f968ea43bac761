//! # Console Reporting Module / 控制台报告模块
//!
//! Prints a colourful, localized summary of a run to the console.
//!
//! 在控制台打印彩色、本地化的运行摘要。

use colored::*;

use crate::core::models::{FailureReason, RunSummary, UnitOutcome};
use crate::infra::t;

/// Prints a formatted summary of all feature runs.
///
/// 在控制台打印所有 feature 运行的格式化摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Feature Summary ---
///   - Status     | #   | Feature                                   |   Duration
///   - Passed     | 0   | /suite/features/login.feature             |      1.23s
///   - Failed     | 1   | /suite/features/cart.feature              |      0.45s
/// ```
pub fn print_summary(summary: &RunSummary, locale: &str) {
    println!("\n{}", t!("summary.banner", locale = locale).bold());

    for outcome in &summary.outcomes {
        let status_str = outcome.get_status_str(locale);
        let status_colored = match outcome {
            UnitOutcome::Passed { .. } => status_str.green(),
            UnitOutcome::Failed {
                reason: FailureReason::Timeout,
                ..
            } => status_str.yellow(),
            UnitOutcome::Failed { .. } => status_str.red(),
        };

        println!(
            "  - {:<12} | {:<4} | {:<60} | {:>10}",
            status_colored,
            outcome.index(),
            outcome.feature().display(),
            format!("{:.2?}", outcome.duration())
        );
    }

    println!(
        "\n{}",
        t!(
            "summary.totals",
            locale = locale,
            total = summary.outcomes.len(),
            passed = summary.passed_count(),
            failed = summary.failed_count(),
            capacity = summary.capacity,
            peak = summary.peak_running,
            duration = format!("{:.2?}", summary.duration)
        )
        .cyan()
    );
}

/// Prints the captured engine output of each failed feature run.
///
/// 打印每个失败的 feature 运行所捕获的引擎输出。
pub fn print_failure_details(failures: &[&UnitOutcome], locale: &str) {
    if failures.is_empty() {
        return;
    }

    println!("\n{}", t!("summary.failure_banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    for (i, outcome) in failures.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            failures.len(),
            outcome.get_status_str(locale).red(),
            outcome.feature().display().to_string().cyan()
        );
        println!("\n--- {} ---\n", t!("summary.engine_log", locale = locale).yellow());
        println!("{}", get_output_for_display(outcome, locale));
        println!("\n{}", "-".repeat(80));
    }
}

/// Gets the engine output of an outcome, or a placeholder when it is empty.
///
/// 获取结果的引擎输出；如果为空则返回占位文本。
pub fn get_output_for_display(outcome: &UnitOutcome, locale: &str) -> String {
    let output = outcome.output().trim();
    if output.is_empty() {
        t!("summary.no_output", locale = locale).to_string()
    } else {
        output.to_string()
    }
}
