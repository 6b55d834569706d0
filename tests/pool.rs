use inferload::executor::{Executor, RequestError, RequestResult};
use inferload::pool::{PoolError, WorkerPool};
use rand::Rng;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Sleeps a random few milliseconds and tracks how many calls overlap.
#[derive(Default)]
struct Instrumented {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Executor for Instrumented {
    async fn execute(&self, ordinal: usize) -> RequestResult {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = rand::thread_rng().gen_range(1..15);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let outcome = if ordinal % 3 == 0 {
            Err(RequestError::Http { status: 500 })
        } else {
            Ok(format!("r{ordinal}"))
        };
        RequestResult { ordinal, latency_ms: delay as f64, attempts: 1, outcome }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn runs_every_ordinal_exactly_once() {
    let exec = Arc::new(Instrumented::default());
    let results = WorkerPool::new(5).run(exec.clone(), 60, |_| {}).await.unwrap();

    assert_eq!(results.len(), 60);
    assert_eq!(exec.calls.load(Ordering::SeqCst), 60);
    let unique: HashSet<usize> = results.iter().map(|r| r.ordinal).collect();
    assert_eq!(unique.len(), 60);
    for (idx, r) in results.iter().enumerate() {
        assert_eq!(r.ordinal, idx);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn never_exceeds_concurrency_limit() {
    for limit in [1, 3, 8] {
        let exec = Arc::new(Instrumented::default());
        WorkerPool::new(limit).run(exec.clone(), 40, |_| {}).await.unwrap();

        let peak = exec.peak.load(Ordering::SeqCst);
        assert!(peak >= 1 && peak <= limit, "limit {limit}, peak {peak}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn progress_is_reported_in_submission_order() {
    let exec = Arc::new(Instrumented::default());
    let mut seen = Vec::new();
    let results = WorkerPool::new(6).run(exec, 30, |r| seen.push(r.ordinal)).await.unwrap();

    assert_eq!(seen, (0..30).collect::<Vec<_>>());
    assert_eq!(results.len(), 30);
}

#[tokio::test]
async fn failures_do_not_stop_the_run() {
    let exec = Arc::new(Instrumented::default());
    let results = WorkerPool::new(4).run(exec, 12, |_| {}).await.unwrap();

    assert_eq!(results.len(), 12);
    assert_eq!(results.iter().filter(|r| !r.success()).count(), 4);
}

#[tokio::test]
async fn more_workers_than_requests() {
    let exec = Arc::new(Instrumented::default());
    let results = WorkerPool::new(50).run(exec.clone(), 3, |_| {}).await.unwrap();

    assert_eq!(results.len(), 3);
    assert!(exec.peak.load(Ordering::SeqCst) <= 3);
}

#[tokio::test]
async fn zero_requests_yield_empty_set() {
    let exec = Arc::new(Instrumented::default());
    let mut called = false;
    let results = WorkerPool::new(4).run(exec.clone(), 0, |_| called = true).await.unwrap();

    assert!(results.is_empty());
    assert!(!called);
    assert_eq!(exec.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn zero_concurrency_still_runs_one_worker() {
    let pool = WorkerPool::new(0);
    assert_eq!(pool.concurrency(), 1);

    let exec = Arc::new(Instrumented::default());
    let results = pool.run(exec.clone(), 5, |_| {}).await.unwrap();
    assert_eq!(results.len(), 5);
    assert_eq!(exec.peak.load(Ordering::SeqCst), 1);
}

struct Panicking;

#[async_trait::async_trait]
impl Executor for Panicking {
    async fn execute(&self, ordinal: usize) -> RequestResult {
        if ordinal == 2 {
            panic!("executor bug");
        }
        RequestResult { ordinal, latency_ms: 1.0, attempts: 1, outcome: Ok(String::new()) }
    }
}

#[tokio::test]
async fn panicking_worker_is_an_error_not_a_short_set() {
    let err = WorkerPool::new(2).run(Arc::new(Panicking), 5, |_| {}).await.unwrap_err();
    assert!(matches!(err, PoolError::Worker(_)));
}

#[tokio::test]
async fn accepts_trait_objects() {
    let exec: Arc<dyn Executor> = Arc::new(Instrumented::default());
    let results = WorkerPool::new(2).run(exec, 4, |_| {}).await.unwrap();
    assert_eq!(results.len(), 4);
}
