//! # Core Module / 核心模块
//!
//! This module contains the orchestration core of Parallel Features:
//! the configuration model, output path rewriting, configuration splitting,
//! the worker pool and the orchestrator that ties them together.
//!
//! 此模块包含 Parallel Features 的编排核心：
//! 配置模型、输出路径重写、配置拆分、工作池以及将它们串联起来的编排器。

pub mod config;
pub mod error;
pub mod execution;
pub mod models;
pub mod orchestrator;
pub mod pool;
pub mod rewrite;
pub mod splitter;

// Re-exports
pub use config::{FeatureFileConfig, RunConfig};
pub use error::{PoolError, RunError, SplitError};
pub use execution::{CommandEngine, RunnableUnit, ScenarioEngine, ScenarioReport};
pub use models::{RunSummary, UnitOutcome, Verdict, WorkerIndex};
pub use orchestrator::Orchestrator;
pub use pool::WorkerPool;
pub use splitter::split;
