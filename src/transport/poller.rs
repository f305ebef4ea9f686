//! Polling fallback loop
//!
//! For callers that cannot use the push channel. The loop is cooperative:
//! each invocation runs to completion before the next delay starts, so a
//! slow callback self-throttles instead of piling up ticks. Callback
//! errors are swallowed (logged at warn) so one failure never halts the
//! loop.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

/// Controller for an active polling loop
///
/// `stop()` is permanent and idempotent: once called, no further callback
/// invocation fires, including the reschedule of an invocation already in
/// flight. Dropping the handle stops the loop.
pub struct PollHandle {
    stop: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        let _ = self.stop.send(true);
        self.task.abort();
    }
}

/// Start a polling loop: invoke `callback`, await completion, wait
/// `interval` from completion, repeat.
///
/// A synchronous `stop()` right after this call prevents the first
/// invocation entirely.
pub fn poll<F, Fut>(mut callback: F, interval: Duration) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<()>> + Send,
{
    let (stop, mut stop_rx) = watch::channel(false);
    let task = tokio::spawn(async move {
        loop {
            if *stop_rx.borrow() {
                return;
            }
            if let Err(e) = callback().await {
                tracing::warn!(error = %e, "poll callback failed");
            }
            tokio::select! {
                _ = stop_rx.changed() => return,
                _ = tokio::time::sleep(interval) => {}
            }
        }
    });
    PollHandle { stop, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_synchronous_stop_prevents_first_invocation() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        let handle = poll(
            move || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            },
            Duration::from_millis(1000),
        );
        handle.stop();
        handle.stop(); // idempotent

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_continues_past_callback_errors() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        let handle = poll(
            move || {
                let c = c.clone();
                async move {
                    let n = c.fetch_add(1, Ordering::SeqCst);
                    if n % 2 == 0 {
                        Err(crate::error::Error::Unreachable("boom".to_string()))
                    } else {
                        Ok(())
                    }
                }
            },
            Duration::from_millis(100),
        );

        tokio::time::sleep(Duration::from_millis(450)).await;
        handle.stop();
        let seen = count.load(Ordering::SeqCst);
        assert!(seen >= 4, "expected >= 4 invocations, saw {}", seen);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }
}
