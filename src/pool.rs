use crate::executor::{Executor, RequestResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("no result recorded for request {0}")]
    Missing(usize),
}

/// Fixed set of workers draining a queue of request ordinals.
#[derive(Clone, Copy, Debug)]
pub struct WorkerPool {
    concurrency: usize,
}

impl WorkerPool {
    /// `concurrency` is clamped to at least one worker.
    pub fn new(concurrency: usize) -> Self {
        Self { concurrency: concurrency.max(1) }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs ordinals `0..count` with at most `concurrency` in flight and
    /// returns once every one has finished. The returned vector is indexed by
    /// ordinal. `on_result` sees results in submission order, each as soon as
    /// it and every earlier ordinal have completed.
    pub async fn run<E, F>(
        &self,
        executor: Arc<E>,
        count: usize,
        mut on_result: F,
    ) -> Result<Vec<RequestResult>, PoolError>
    where
        E: Executor + ?Sized,
        F: FnMut(&RequestResult),
    {
        let next = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel::<RequestResult>();

        let workers = self.concurrency.min(count);
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let executor = executor.clone();
            let next = next.clone();
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    let ordinal = next.fetch_add(1, Ordering::Relaxed);
                    if ordinal >= count {
                        break;
                    }
                    let result = executor.execute(ordinal).await;
                    if tx.send(result).is_err() {
                        break;
                    }
                }
            }));
        }
        // Workers hold the remaining senders; the channel closes when the last one exits.
        drop(tx);

        let mut slots: Vec<Option<RequestResult>> = vec![None; count];
        let mut cursor = 0;
        while let Some(result) = rx.recv().await {
            let ordinal = result.ordinal;
            if ordinal >= count || slots[ordinal].is_some() {
                tracing::warn!(ordinal, "discarding unexpected result");
                continue;
            }
            slots[ordinal] = Some(result);
            while let Some(Some(ready)) = slots.get(cursor) {
                on_result(ready);
                cursor += 1;
            }
        }

        for handle in handles {
            handle.await?;
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(ordinal, slot)| slot.ok_or(PoolError::Missing(ordinal)))
            .collect()
    }
}
