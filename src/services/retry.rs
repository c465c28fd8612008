use std::future::Future;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// A single try with no waiting.
    pub const ONCE: Self = Self {
        attempts: 1,
        delay: Duration::ZERO,
    };

    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

/// Polls `attempt` until it yields a value or the policy's attempts run out.
///
/// `sleep` is awaited between attempts (not after the last one), so tests can
/// pass a clock that returns immediately.
pub async fn poll_until<T, A, AFut, S, SFut>(
    policy: RetryPolicy,
    what: &str,
    mut attempt: A,
    mut sleep: S,
) -> Option<T>
where
    A: FnMut() -> AFut,
    AFut: Future<Output = Option<T>>,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let attempts = policy.attempts.max(1);

    for n in 1..=attempts {
        if let Some(value) = attempt().await {
            if attempts > 1 {
                info!("{what} available on attempt {n}/{attempts}");
            }
            return Some(value);
        }

        if n < attempts {
            info!("Attempt {n}/{attempts}: {what} not yet available. Retrying...");
            sleep(policy.delay).await;
        }
    }

    None
}
