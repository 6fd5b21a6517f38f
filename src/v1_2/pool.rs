/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::errors::ZenfolioError;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Boxed side effecting job for [`TaskPool::run`]
pub type Job = Pin<Box<dyn Future<Output = Result<(), ZenfolioError>> + Send + 'static>>;

/// Runs independent calls concurrently on the Tokio runtime.
///
/// Every unit of work is a spawned task, so units make progress on separate worker threads. A
/// pool is either unbounded (one task per unit, all running at once) or limited to a number of
/// workers. Nothing is cancelled once started.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug, Clone, Copy)]
pub struct TaskPool {
    workers: Option<usize>,
}

/// Outcome of a [`TaskPool::run`] batch
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub completed: usize,
    pub failures: Vec<ZenfolioError>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl TaskPool {
    pub fn unbounded() -> Self {
        Self { workers: None }
    }

    /// Pool running at most `workers` units at a time (at least one)
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: Some(workers.max(1)),
        }
    }

    pub fn workers(&self) -> Option<usize> {
        self.workers
    }

    /// Calls `op` once per argument and returns the results in argument order.
    ///
    /// A failing unit does not stop the others; its error (or panic, as
    /// [`ZenfolioError::TaskFailed`]) only shows up in its own slot. Use a tuple as the argument
    /// type for operations taking several parameters.
    pub async fn map<A, T, F, Fut>(
        &self,
        op: F,
        args: impl IntoIterator<Item = A>,
    ) -> Vec<Result<T, ZenfolioError>>
    where
        A: Send + 'static,
        T: Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ZenfolioError>> + Send + 'static,
    {
        let op = Arc::new(op);
        let permits = self.workers.map(|n| Arc::new(Semaphore::new(n)));

        let handles: Vec<_> = args
            .into_iter()
            .map(|arg| {
                let op = op.clone();
                let permits = permits.clone();
                tokio::spawn(async move {
                    let _permit = match permits {
                        Some(permits) => Some(
                            permits
                                .acquire_owned()
                                .await
                                .map_err(|e| ZenfolioError::TaskFailed(e.to_string()))?,
                        ),
                        None => None,
                    };
                    (*op)(arg).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(
                handle
                    .await
                    .unwrap_or_else(|err| Err(ZenfolioError::TaskFailed(err.to_string()))),
            );
        }
        results
    }

    /// Drains the jobs with a fixed set of workers and returns once every job has finished.
    ///
    /// Jobs complete in no particular order. Failures are logged and collected in the summary
    /// without stopping the remaining jobs.
    pub async fn run(&self, jobs: impl IntoIterator<Item = Job>) -> BatchSummary {
        let queue: VecDeque<Job> = jobs.into_iter().collect();
        let workers = self.workers.unwrap_or(queue.len()).min(queue.len());
        let queue = Arc::new(Mutex::new(queue));

        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let queue = queue.clone();
                tokio::spawn(async move {
                    let mut summary = BatchSummary::default();
                    loop {
                        let job = queue.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
                        let Some(job) = job else {
                            break;
                        };
                        // Own task per job so a panicking job does not take the worker down
                        let outcome = match tokio::spawn(job).await {
                            Ok(outcome) => outcome,
                            Err(err) => Err(ZenfolioError::TaskFailed(err.to_string())),
                        };
                        match outcome {
                            Ok(()) => summary.completed += 1,
                            Err(err) => {
                                log::warn!("Worker {} job failed: {}", worker, err);
                                summary.failures.push(err);
                            }
                        }
                    }
                    summary
                })
            })
            .collect();

        let mut summary = BatchSummary::default();
        for handle in handles {
            match handle.await {
                Ok(worker) => {
                    summary.completed += worker.completed;
                    summary.failures.extend(worker.failures);
                }
                Err(err) => summary.failures.push(ZenfolioError::TaskFailed(err.to_string())),
            }
        }
        summary
    }
}

/// Boxes a future into a [`Job`]
pub fn job<F>(fut: F) -> Job
where
    F: Future<Output = Result<(), ZenfolioError>> + Send + 'static,
{
    Box::pin(fut)
}
