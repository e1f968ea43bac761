//! # Reporting Unit Tests / 报告单元测试
//!
//! Tests for the HTML run summary and the console output helpers.
//!
//! HTML 运行摘要和控制台输出辅助函数的测试。

use parallel_features::core::models::{
    FailureReason, RunSummary, UnitInfo, UnitOutcome, Verdict, WorkerIndex,
};
use parallel_features::reporting::console::get_output_for_display;
use parallel_features::reporting::html::{generate_html_report, render_html_report};
use std::path::PathBuf;
use std::time::Duration;

fn outcome(index: usize, feature: &str, failure: Option<FailureReason>, output: &str) -> UnitOutcome {
    let unit = UnitInfo {
        index: WorkerIndex(index),
        feature: PathBuf::from(feature),
    };
    match failure {
        None => UnitOutcome::Passed {
            unit,
            output: output.to_string(),
            duration: Duration::from_millis(120),
        },
        Some(reason) => UnitOutcome::Failed {
            unit,
            output: output.to_string(),
            reason,
            duration: Duration::from_millis(340),
        },
    }
}

fn sample_summary() -> RunSummary {
    let outcomes = vec![
        outcome(0, "features/login.feature", None, "ok"),
        outcome(1, "features/cart.feature", Some(FailureReason::ScenarioFailed), "<b>step failed</b>"),
        outcome(2, "features/slow.feature", Some(FailureReason::Timeout), ""),
    ];
    RunSummary {
        verdict: Verdict::from_outcomes(&outcomes),
        outcomes,
        capacity: 2,
        peak_running: 2,
        duration: Duration::from_secs(1),
    }
}

#[cfg(test)]
mod html_tests {
    use super::*;

    #[test]
    fn test_rows_and_status_classes() {
        let html = render_html_report(&sample_summary(), "en").into_string();

        assert!(html.contains("features/login.feature"));
        assert!(html.contains("features/cart.feature"));
        assert!(html.contains("class=\"status-passed\""));
        assert!(html.contains("class=\"status-failed\""));
        assert!(html.contains("class=\"status-timeout\""));
    }

    #[test]
    fn test_engine_output_is_escaped() {
        let html = render_html_report(&sample_summary(), "en").into_string();
        assert!(html.contains("&lt;b&gt;step failed&lt;/b&gt;"));
        assert!(!html.contains("<b>step failed</b>"));
    }

    #[test]
    fn test_generate_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/summary.html");
        generate_html_report(&sample_summary(), &path, "en").unwrap();
        assert!(path.is_file());
    }
}

#[cfg(test)]
mod summary_tests {
    use super::*;

    #[test]
    fn test_counts_and_verdict() {
        let summary = sample_summary();
        assert_eq!(summary.verdict, Verdict::Failed);
        assert_eq!(summary.passed_count(), 1);
        assert_eq!(summary.failed_count(), 2);
        assert_eq!(summary.failures().len(), 2);
    }

    #[test]
    fn test_empty_output_placeholder() {
        let summary = sample_summary();
        assert_eq!(get_output_for_display(&summary.outcomes[0], "en"), "ok");
        assert_eq!(
            get_output_for_display(&summary.outcomes[2], "en"),
            "(no output captured)"
        );
    }

    #[test]
    fn test_localized_status() {
        let summary = sample_summary();
        assert_eq!(summary.outcomes[2].get_status_str("en"), "Timeout");
        assert_eq!(summary.outcomes[0].get_status_str("zh-CN"), "通过");
    }

    #[test]
    fn test_verdict_of_no_outcomes_is_passed() {
        assert!(Verdict::from_outcomes(&[]).is_passed());
    }
}
