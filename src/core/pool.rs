//! # Worker Pool Module / 工作池模块
//!
//! A fixed-capacity executor for [`RunnableUnit`]s. Exactly `capacity` worker
//! tasks pull units from a bounded queue of the same depth, so at most
//! `capacity` units run at once and `submit` waits while the queue is full.
//!
//! 一个固定容量的 [`RunnableUnit`] 执行器。恰好 `capacity` 个工作任务从
//! 相同深度的有界队列中拉取单元，因此最多同时运行 `capacity` 个单元，
//! 队列已满时 `submit` 会等待。
//!
//! Each pool belongs to one run. A failing or panicking unit is recorded as a
//! failed outcome and never stops its siblings.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::Instant;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;

use crate::core::error::PoolError;
use crate::core::execution::RunnableUnit;
use crate::core::models::{FailureReason, UnitOutcome};

/// A point-in-time view of the pool counters.
/// 工作池计数器的时间点快照。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    pub capacity: usize,
    pub queued: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    /// Highest number of units ever running at the same time.
    pub peak_running: usize,
}

struct PoolState {
    /// Units submitted but not yet finished.
    outstanding: watch::Sender<usize>,
    queued: AtomicUsize,
    running: AtomicUsize,
    peak_running: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    outcomes: std::sync::Mutex<Vec<UnitOutcome>>,
}

impl PoolState {
    fn new() -> Self {
        let (outstanding, _) = watch::channel(0);
        Self {
            outstanding,
            queued: AtomicUsize::new(0),
            running: AtomicUsize::new(0),
            peak_running: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            outcomes: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn record(&self, outcome: UnitOutcome) {
        if outcome.is_failure() {
            self.failed.fetch_add(1, Ordering::SeqCst);
        } else {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(outcome);
        self.outstanding.send_modify(|n| *n -= 1);
    }
}

/// Bounded concurrent executor for one run.
pub struct WorkerPool {
    capacity: usize,
    sender: Option<mpsc::Sender<RunnableUnit>>,
    workers: Vec<JoinHandle<()>>,
    state: Arc<PoolState>,
}

impl WorkerPool {
    /// Creates a pool that runs at most `capacity` units concurrently.
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// `PoolError::ZeroCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }

        let (sender, receiver) = mpsc::channel(capacity);
        let receiver = Arc::new(Mutex::new(receiver));
        let state = Arc::new(PoolState::new());

        let workers = (0..capacity)
            .map(|worker| {
                tokio::spawn(worker_loop(worker, Arc::clone(&receiver), Arc::clone(&state)))
            })
            .collect();

        tracing::debug!(capacity, "worker pool started");
        Ok(Self {
            capacity,
            sender: Some(sender),
            workers,
            state,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Enqueues a unit. Waits while the queue is full. Cancelling the wait
    /// drops the unit without running it.
    ///
    /// # Errors
    /// `PoolError::Closed` if the pool no longer accepts work.
    pub async fn submit(&self, unit: RunnableUnit) -> Result<(), PoolError> {
        let sender = self.sender.as_ref().ok_or(PoolError::Closed)?;
        let index = unit.info().index;

        // Counters only move once a slot is held, so dropping this future
        // while it waits leaves the pool consistent.
        let permit = sender.reserve().await.map_err(|_| PoolError::Closed)?;
        self.state.outstanding.send_modify(|n| *n += 1);
        self.state.queued.fetch_add(1, Ordering::SeqCst);
        permit.send(unit);
        tracing::debug!(%index, "unit queued");
        Ok(())
    }

    /// Waits until every submitted unit has completed or failed.
    pub async fn await_idle(&self) {
        let mut outstanding = self.state.outstanding.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = outstanding.wait_for(|n| *n == 0).await;
    }

    pub fn stats(&self) -> PoolStats {
        let state = &self.state;
        PoolStats {
            capacity: self.capacity,
            queued: state.queued.load(Ordering::SeqCst),
            running: state.running.load(Ordering::SeqCst),
            completed: state.completed.load(Ordering::SeqCst),
            failed: state.failed.load(Ordering::SeqCst),
            peak_running: state.peak_running.load(Ordering::SeqCst),
        }
    }

    /// Stops accepting work, waits for the workers to drain the queue and
    /// returns all outcomes ordered by worker index.
    pub async fn shutdown(mut self) -> Vec<UnitOutcome> {
        self.sender.take();

        for joined in futures::future::join_all(self.workers.drain(..)).await {
            if let Err(e) = joined {
                tracing::warn!(error = %e, "worker task ended abnormally");
            }
        }

        let mut outcomes = std::mem::take(
            &mut *self
                .state
                .outcomes
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        outcomes.sort_by_key(UnitOutcome::index);
        tracing::debug!(count = outcomes.len(), "worker pool stopped");
        outcomes
    }
}

async fn worker_loop(
    worker: usize,
    queue: Arc<Mutex<mpsc::Receiver<RunnableUnit>>>,
    state: Arc<PoolState>,
) {
    loop {
        let next = queue.lock().await.recv().await;
        let Some(unit) = next else {
            break;
        };

        state.queued.fetch_sub(1, Ordering::SeqCst);
        let running = state.running.fetch_add(1, Ordering::SeqCst) + 1;
        state.peak_running.fetch_max(running, Ordering::SeqCst);

        let info = unit.info();
        tracing::debug!(worker, index = %info.index, feature = %info.feature.display(), "unit running");

        let start_time = Instant::now();
        // A separate task turns a panic inside the unit into a failed outcome.
        let outcome = match tokio::spawn(unit.execute()).await {
            Ok(outcome) => outcome,
            Err(e) => UnitOutcome::Failed {
                unit: info,
                output: e.to_string(),
                reason: FailureReason::Panicked,
                duration: start_time.elapsed(),
            },
        };

        state.running.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(
            worker,
            index = %outcome.index(),
            failed = outcome.is_failure(),
            "unit finished"
        );
        state.record(outcome);
    }
}
