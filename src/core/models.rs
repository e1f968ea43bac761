//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures shared by the worker pool, the
//! orchestrator and the reporters: worker indices, per-unit outcomes, failure
//! reasons and the aggregate run summary.
//!
//! 此模块定义了工作池、编排器和报告器共享的数据结构：
//! 工作索引、单元结果、失败原因以及聚合运行摘要。

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::t;

/// Zero-based ordinal of a feature file in discovery order.
/// It keeps output paths disjoint and carries no scheduling affinity.
///
/// feature 文件按发现顺序的零基序号。
/// 它用于保持输出路径互不相交，与调度无关。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct WorkerIndex(pub usize);

impl WorkerIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<usize> for WorkerIndex {
    fn from(value: usize) -> Self {
        WorkerIndex(value)
    }
}

/// Enumerates the possible reasons for a unit failure.
/// 枚举单元失败的可能原因。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum FailureReason {
    /// The engine ran and reported failing scenarios.
    /// 引擎已运行并报告了失败的场景。
    ScenarioFailed,
    /// The engine exceeded its configured timeout.
    /// 引擎超出了其配置的超时时间。
    Timeout,
    /// The engine could not be invoked at all.
    /// 根本无法调用引擎。
    Engine,
    /// The unit panicked while running.
    /// 单元在运行时发生 panic。
    Panicked,
}

/// Identifies the feature file a unit ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitInfo {
    pub index: WorkerIndex,
    pub feature: PathBuf,
}

/// Represents the final result of a single feature file run.
/// 表示单个 feature 文件运行的最终结果。
#[derive(Debug, Clone, Serialize)]
pub enum UnitOutcome {
    Passed {
        unit: UnitInfo,
        output: String,
        duration: Duration,
    },
    Failed {
        unit: UnitInfo,
        output: String,
        reason: FailureReason,
        duration: Duration,
    },
}

impl UnitOutcome {
    pub fn unit(&self) -> &UnitInfo {
        match self {
            UnitOutcome::Passed { unit, .. } | UnitOutcome::Failed { unit, .. } => unit,
        }
    }

    pub fn index(&self) -> WorkerIndex {
        self.unit().index
    }

    pub fn feature(&self) -> &Path {
        &self.unit().feature
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UnitOutcome::Failed { .. })
    }

    pub fn output(&self) -> &str {
        match self {
            UnitOutcome::Passed { output, .. } | UnitOutcome::Failed { output, .. } => output,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            UnitOutcome::Passed { duration, .. } | UnitOutcome::Failed { duration, .. } => {
                *duration
            }
        }
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            UnitOutcome::Passed { .. } => None,
            UnitOutcome::Failed { reason, .. } => Some(*reason),
        }
    }

    /// Gets the status of the outcome as a localized string for display.
    /// 以本地化字符串形式获取结果状态以供显示。
    pub fn get_status_str(&self, locale: &str) -> String {
        match self {
            UnitOutcome::Passed { .. } => t!("report.status_passed", locale = locale).to_string(),
            UnitOutcome::Failed { reason, .. } => match reason {
                FailureReason::Timeout => t!("report.status_timeout", locale = locale).to_string(),
                FailureReason::Engine => t!("report.status_engine", locale = locale).to_string(),
                FailureReason::Panicked => {
                    t!("report.status_panicked", locale = locale).to_string()
                }
                FailureReason::ScenarioFailed => {
                    t!("report.status_failed", locale = locale).to_string()
                }
            },
        }
    }

    /// Gets the appropriate CSS class for the outcome.
    pub fn get_status_class(&self) -> &'static str {
        match self {
            UnitOutcome::Passed { .. } => "status-passed",
            UnitOutcome::Failed {
                reason: FailureReason::Timeout,
                ..
            } => "status-timeout",
            UnitOutcome::Failed { .. } => "status-failed",
        }
    }
}

impl fmt::Display for UnitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitOutcome::Passed { unit, duration, .. } => write!(
                f,
                "[{}] {} passed in {:.2?}",
                unit.index,
                unit.feature.display(),
                duration
            ),
            UnitOutcome::Failed {
                unit,
                reason,
                duration,
                ..
            } => write!(
                f,
                "[{}] {} failed ({:?}) in {:.2?}",
                unit.index,
                unit.feature.display(),
                reason,
                duration
            ),
        }
    }
}

/// The overall verdict of a run.
/// 一次运行的总体结论。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Passed,
    Failed,
}

impl Verdict {
    /// `Failed` if any outcome failed, `Passed` otherwise.
    pub fn from_outcomes(outcomes: &[UnitOutcome]) -> Self {
        if outcomes.iter().any(UnitOutcome::is_failure) {
            Verdict::Failed
        } else {
            Verdict::Passed
        }
    }

    pub fn is_passed(self) -> bool {
        self == Verdict::Passed
    }
}

/// Everything known about a completed run.
/// 已完成运行的全部信息。
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Outcomes ordered by worker index.
    /// 按工作索引排序的结果。
    pub outcomes: Vec<UnitOutcome>,
    pub verdict: Verdict,
    /// Number of units allowed to run concurrently.
    pub capacity: usize,
    /// Highest number of units observed running at once.
    pub peak_running: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failure()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn failures(&self) -> Vec<&UnitOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure()).collect()
    }
}
