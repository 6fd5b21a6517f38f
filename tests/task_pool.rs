/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use zenfolio::v1_2::{TaskPool, ZenfolioError, job};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn map_keeps_argument_order() {
        // Earlier arguments sleep longer so they finish last
        let results = TaskPool::unbounded()
            .map(
                |n: u64| async move {
                    tokio::time::sleep(Duration::from_millis(50 - n * 10)).await;
                    Ok::<_, ZenfolioError>(n * 2)
                },
                0..5,
            )
            .await;
        let values: Vec<u64> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(values, vec![0, 2, 4, 6, 8]);
    }

    #[tokio::test]
    async fn map_with_tuple_arguments() {
        let results = TaskPool::unbounded()
            .map(
                |(base, exp): (i64, u32)| async move { Ok::<_, ZenfolioError>(base.pow(exp)) },
                vec![(2, 3), (3, 2), (10, 0)],
            )
            .await;
        let values: Vec<i64> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(values, vec![8, 9, 1]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn map_isolates_failures() {
        let results = TaskPool::with_workers(2)
            .map(
                |n: i32| async move {
                    if n == 2 {
                        Err(ZenfolioError::InvalidParameter(format!("bad {}", n)))
                    } else {
                        Ok(n)
                    }
                },
                vec![1, 2, 3],
            )
            .await;
        assert_eq!(results.len(), 3);
        assert_eq!(*results[0].as_ref().unwrap(), 1);
        assert!(matches!(results[1], Err(ZenfolioError::InvalidParameter(_))));
        assert_eq!(*results[2].as_ref().unwrap(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn map_reports_panics() {
        let results = TaskPool::unbounded()
            .map(
                |n: i32| async move {
                    if n == 1 {
                        panic!("unit panicked");
                    }
                    Ok::<_, ZenfolioError>(n)
                },
                vec![0, 1, 2],
            )
            .await;
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ZenfolioError::TaskFailed(_))));
        assert!(results[2].is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn map_respects_worker_limit() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let (r, p) = (running.clone(), peak.clone());
        let results = TaskPool::with_workers(2)
            .map(
                move |_: usize| {
                    let (running, peak) = (r.clone(), p.clone());
                    async move {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        running.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, ZenfolioError>(())
                    }
                },
                0..8,
            )
            .await;

        assert!(results.iter().all(Result::is_ok));
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(running.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn map_with_no_arguments() {
        let results = TaskPool::with_workers(3)
            .map(|n: i32| async move { Ok::<_, ZenfolioError>(n) }, Vec::new())
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn run_waits_for_every_job() {
        let done = Arc::new(AtomicUsize::new(0));
        let jobs = (0..20).map(|n| {
            let done = done.clone();
            job(async move {
                tokio::time::sleep(Duration::from_millis(n % 5)).await;
                done.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ZenfolioError>(())
            })
        });

        let summary = TaskPool::with_workers(10).run(jobs).await;
        assert!(summary.is_success());
        assert_eq!(summary.completed, 20);
        assert_eq!(done.load(Ordering::SeqCst), 20);
    }

    async fn explode() -> Result<(), ZenfolioError> {
        panic!("job panicked")
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn run_collects_failures() {
        let jobs = vec![
            job(async { Ok::<_, ZenfolioError>(()) }),
            job(async { Err(ZenfolioError::ResponseMissing) }),
            job(explode()),
            job(async { Ok::<_, ZenfolioError>(()) }),
        ];

        let summary = TaskPool::with_workers(1).run(jobs).await;
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failures.len(), 2);
        assert!(
            summary
                .failures
                .iter()
                .any(|e| matches!(e, ZenfolioError::TaskFailed(_)))
        );
    }

    #[tokio::test]
    async fn run_without_jobs() {
        let summary = TaskPool::unbounded().run(Vec::new()).await;
        assert_eq!(summary.completed, 0);
        assert!(summary.is_success());
    }

    #[test]
    fn worker_count() {
        assert_eq!(TaskPool::with_workers(0).workers(), Some(1));
        assert_eq!(TaskPool::unbounded().workers(), None);
    }
}
