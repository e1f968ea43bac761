//! # Orchestrator Module / 编排模块
//!
//! Runs a whole suite: splits the aggregate configuration, wraps each clone
//! in a [`RunnableUnit`], feeds the units to a fresh [`WorkerPool`] and
//! aggregates their outcomes into a verdict.
//!
//! 运行整个测试套件：拆分聚合配置，将每个克隆包装为 [`RunnableUnit`]，
//! 提交到新的 [`WorkerPool`]，并将结果汇总为最终结论。

use std::sync::Arc;
use std::time::Instant;

use crate::core::config::RunConfig;
use crate::core::error::RunError;
use crate::core::execution::{RunnableUnit, ScenarioEngine};
use crate::core::models::{RunSummary, Verdict};
use crate::core::pool::WorkerPool;
use crate::core::splitter;

/// Drives one run at a time. Every call to [`Orchestrator::run`] owns its own
/// pool, so concurrent runs never share scheduling state.
#[derive(Clone)]
pub struct Orchestrator {
    engine: Arc<dyn ScenarioEngine>,
    jobs: Option<usize>,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn ScenarioEngine>) -> Self {
        Self { engine, jobs: None }
    }

    /// Overrides the thread count resolved from the configuration.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// The largest thread-count hint in the configuration, or the explicit
    /// override, never less than one.
    pub fn resolve_thread_count(&self, config: &RunConfig) -> usize {
        self.jobs
            .unwrap_or_else(|| config.thread_hints().max().unwrap_or(1))
            .max(1)
    }

    /// Runs every feature file of `config` and returns the aggregate summary.
    ///
    /// # Errors
    /// Configuration errors (`RunError::Split`) are raised before any unit
    /// starts. Failing scenarios are not errors; they make the verdict
    /// [`Verdict::Failed`].
    pub async fn run(&self, config: &RunConfig) -> Result<RunSummary, RunError> {
        let capacity = self.resolve_thread_count(config);
        let clones = splitter::split(config)?;
        tracing::info!(features = clones.len(), capacity, "starting run");

        let start_time = Instant::now();
        let pool = WorkerPool::new(capacity)?;
        for clone in clones {
            pool.submit(RunnableUnit::new(clone, Arc::clone(&self.engine)))
                .await?;
        }
        pool.await_idle().await;

        let peak_running = pool.stats().peak_running;
        let outcomes = pool.shutdown().await;
        let verdict = Verdict::from_outcomes(&outcomes);
        tracing::info!(?verdict, units = outcomes.len(), "run finished");

        Ok(RunSummary {
            outcomes,
            verdict,
            capacity,
            peak_running,
            duration: start_time.elapsed(),
        })
    }
}
