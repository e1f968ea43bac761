//! # Worker Pool Unit Tests / 工作池单元测试
//!
//! Tests for the bounded worker pool: the concurrency limit, failure
//! isolation, panic containment and idle detection.
//!
//! 有界工作池的测试：并发上限、失败隔离、panic 隔离以及空闲检测。

mod common;

use common::{FakeEngine, unit};
use parallel_features::core::error::PoolError;
use parallel_features::core::models::{FailureReason, WorkerIndex};
use parallel_features::core::pool::WorkerPool;
use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
mod pool_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_never_exceeds_capacity() {
        let engine = Arc::new(FakeEngine::new().with_delay(Duration::from_millis(40)));
        let pool = WorkerPool::new(3).unwrap();

        for i in 0..10 {
            pool.submit(unit(i, &format!("f{i}.feature"), &engine))
                .await
                .unwrap();
        }
        pool.await_idle().await;

        let stats = pool.stats();
        assert_eq!(stats.completed, 10);
        assert_eq!(stats.running, 0);
        assert_eq!(stats.queued, 0);
        assert!(stats.peak_running <= 3);
        assert!(engine.peak() <= 3);
        assert!(engine.peak() >= 1);

        let outcomes = pool.shutdown().await;
        assert_eq!(outcomes.len(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_capacity_one_runs_sequentially() {
        let engine = Arc::new(FakeEngine::new().with_delay(Duration::from_millis(10)));
        let pool = WorkerPool::new(1).unwrap();
        for i in 0..4 {
            pool.submit(unit(i, &format!("f{i}.feature"), &engine))
                .await
                .unwrap();
        }
        let outcomes = pool.shutdown().await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(engine.peak(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_units_run_concurrently() {
        let engine = Arc::new(FakeEngine::new().with_delay(Duration::from_millis(200)));
        let pool = WorkerPool::new(4).unwrap();
        for i in 0..4 {
            pool.submit(unit(i, &format!("f{i}.feature"), &engine))
                .await
                .unwrap();
        }
        pool.await_idle().await;

        assert!(engine.peak() >= 2);
        assert!(pool.stats().peak_running >= 2);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_rejected() {
        assert_eq!(WorkerPool::new(0).err(), Some(PoolError::ZeroCapacity));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failure_does_not_stop_siblings() {
        let engine = Arc::new(
            FakeEngine::new()
                .failing("f1.feature")
                .erroring("f3.feature"),
        );
        let pool = WorkerPool::new(2).unwrap();
        for i in 0..5 {
            pool.submit(unit(i, &format!("f{i}.feature"), &engine))
                .await
                .unwrap();
        }
        let outcomes = pool.shutdown().await;

        assert_eq!(outcomes.len(), 5);
        assert_eq!(engine.calls().len(), 5);
        assert_eq!(outcomes[1].reason(), Some(FailureReason::ScenarioFailed));
        assert_eq!(outcomes[3].reason(), Some(FailureReason::Engine));
        for i in [0, 2, 4] {
            assert!(!outcomes[i].is_failure());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_panicking_unit_is_recorded_as_failure() {
        let engine = Arc::new(FakeEngine::new().panicking("boom.feature"));
        let pool = WorkerPool::new(1).unwrap();
        pool.submit(unit(0, "boom.feature", &engine)).await.unwrap();
        pool.submit(unit(1, "fine.feature", &engine)).await.unwrap();
        pool.await_idle().await;

        let stats = pool.stats();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.completed, 1);

        let outcomes = pool.shutdown().await;
        assert_eq!(outcomes[0].reason(), Some(FailureReason::Panicked));
        assert!(!outcomes[1].is_failure());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_outcomes_are_ordered_by_index() {
        let engine = Arc::new(FakeEngine::new().with_delay(Duration::from_millis(5)));
        let pool = WorkerPool::new(3).unwrap();
        for i in (0..6).rev() {
            pool.submit(unit(i, &format!("f{i}.feature"), &engine))
                .await
                .unwrap();
        }
        let outcomes = pool.shutdown().await;
        let indices: Vec<_> = outcomes.iter().map(|o| o.index()).collect();
        assert_eq!(indices, (0..6).map(WorkerIndex).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_await_idle_on_empty_pool_returns() {
        let pool = WorkerPool::new(2).unwrap();
        pool.await_idle().await;
        assert_eq!(pool.stats().capacity, 2);
        assert!(pool.shutdown().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_submit_waits_while_pool_is_full() {
        let engine = Arc::new(FakeEngine::new().with_delay(Duration::from_millis(500)));
        let pool = WorkerPool::new(1).unwrap();

        // One unit running, one waiting in the queue.
        pool.submit(unit(0, "f0.feature", &engine)).await.unwrap();
        pool.submit(unit(1, "f1.feature", &engine)).await.unwrap();

        let third = tokio::time::timeout(
            Duration::from_millis(150),
            pool.submit(unit(2, "f2.feature", &engine)),
        )
        .await;
        assert!(third.is_err(), "submit returned while the pool was full");

        pool.await_idle().await;
        let outcomes = pool.shutdown().await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(engine.calls().len(), 2);
    }
}
