//! Bounded-concurrency windows
//!
//! Items are processed in consecutive windows of at most `width` tasks. Every
//! task of a window is spawned at once and the next window starts only after
//! all of them have finished, successfully or not.

use futures::future::join_all;
use std::future::Future;
use tokio::task::JoinError;

/// Runs `task` over `items` window by window
///
/// Results come back in input order. A task that panics yields a
/// [`JoinError`] in its slot and does not affect its siblings. A `width`
/// of zero is treated as one.
pub async fn run_windowed<T, F, Fut>(
    phase: &'static str,
    items: Vec<T>,
    width: usize,
    task: F,
) -> Vec<Result<Fut::Output, JoinError>>
where
    F: Fn(T) -> Fut,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    let width = width.max(1);
    let total = items.len();
    let windows = total.div_ceil(width);
    let mut results = Vec::with_capacity(total);

    let mut remaining = items.into_iter().peekable();
    let mut window = 0usize;
    while remaining.peek().is_some() {
        window += 1;
        let handles: Vec<_> = remaining
            .by_ref()
            .take(width)
            .map(|item| tokio::spawn(task(item)))
            .collect();

        crate::log_window_progress!(phase, window, windows, handles.len());
        results.extend(join_all(handles).await);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let results = run_windowed("test", (0..7).collect(), 3, |i: u64| async move {
            // Later items finish first inside each window
            tokio::time::sleep(Duration::from_millis(10 * (7 - i))).await;
            i * 2
        })
        .await;

        let values: Vec<u64> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(values, vec![0, 2, 4, 6, 8, 10, 12]);
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_width() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = run_windowed("test", (0..12).collect::<Vec<u32>>(), 4, |_| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;

        assert_eq!(results.len(), 12);
        assert!(peak.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_panicking_task_is_isolated() {
        let results = run_windowed("test", vec![1, 2, 3], 3, |i: i32| async move {
            if i == 2 {
                panic!("boom");
            }
            i
        })
        .await;

        assert_eq!(results.len(), 3);
        assert_eq!(*results[0].as_ref().unwrap(), 1);
        assert!(results[1].as_ref().unwrap_err().is_panic());
        assert_eq!(*results[2].as_ref().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let results = run_windowed("test", Vec::<u8>::new(), 5, |i| async move { i }).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_zero_width_runs_sequentially() {
        let results = run_windowed("test", vec![1u8, 2], 0, |i| async move { i }).await;
        assert_eq!(results.len(), 2);
    }
}
