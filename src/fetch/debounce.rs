use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Outcome of a debounced submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Debounced<T> {
    /// The value survived the quiet period and should be acted upon.
    Settled(T),
    /// A newer submission arrived during the quiet period.
    Superseded,
}

/// Trailing-edge debouncer for rapid submissions of the same control.
///
/// Every submission bumps a shared generation counter and then waits out the
/// delay. Only the submission whose generation is still current afterwards
/// settles; all earlier ones report as superseded.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Submit a value and wait out the quiet period.
    pub async fn submit<T>(&self, value: T) -> Debounced<T> {
        let submitted = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) == submitted {
            Debounced::Settled(value)
        } else {
            Debounced::Superseded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn lone_submission_settles() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        assert_eq!(
            debouncer.submit("jakarta").await,
            Debounced::Settled("jakarta")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_submissions_settle_only_the_last() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let first = tokio::spawn({
            let debouncer = debouncer.clone();
            async move { debouncer.submit("j").await }
        });
        // Let the first submission register its quiet period.
        tokio::task::yield_now().await;

        let second = debouncer.submit("ja").await;
        assert_eq!(second, Debounced::Settled("ja"));
        assert_eq!(first.await.unwrap(), Debounced::Superseded);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_submissions_both_settle() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        assert_eq!(debouncer.submit(1).await, Debounced::Settled(1));
        assert_eq!(debouncer.submit(2).await, Debounced::Settled(2));
    }
}
