//! Helpers for tests that drive background tasks
//!
//! Deadlines use `tokio::time`, so they advance with the mocked clock under
//! `#[tokio::test(start_paused = true)]`.

#![allow(clippy::missing_panics_doc)]

use std::future::Future;
use std::time::Duration;

/// Await `fut`, panicking if it has not finished after `limit`.
pub async fn within<F: Future>(limit: Duration, fut: F) -> F::Output {
    match tokio::time::timeout(limit, fut).await {
        Ok(output) => output,
        Err(_) => panic!("future still pending after {limit:?}"),
    }
}

/// Re-check `condition` every `interval` until it holds or `limit` passes.
///
/// Returns whether the condition was observed to hold.
pub async fn eventually<F, Fut>(limit: Duration, interval: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + limit;
    loop {
        if condition().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn within_returns_the_output() {
        let output = within(Duration::from_millis(100), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            42
        })
        .await;

        assert_eq!(output, 42);
    }

    #[tokio::test(start_paused = true)]
    #[should_panic(expected = "still pending")]
    async fn within_panics_past_the_limit() {
        within(Duration::from_millis(10), tokio::time::sleep(Duration::from_secs(1))).await;
    }

    #[tokio::test(start_paused = true)]
    async fn eventually_sees_a_flag_set_later() {
        let flag = Arc::new(AtomicBool::new(false));
        let setter = flag.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            setter.store(true, Ordering::SeqCst);
        });

        let observed = eventually(Duration::from_secs(60), Duration::from_secs(1), || {
            let flag = flag.clone();
            async move { flag.load(Ordering::SeqCst) }
        })
        .await;

        assert!(observed);
    }

    #[tokio::test(start_paused = true)]
    async fn eventually_gives_up() {
        let observed =
            eventually(Duration::from_millis(50), Duration::from_millis(10), || async { false })
                .await;

        assert!(!observed);
    }
}
