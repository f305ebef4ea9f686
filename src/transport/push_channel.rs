//! Push-channel client
//!
//! ## Responsibilities
//!
//! - WebSocket connection to the backend event stream
//! - Inbound frame parsing into [`PushMessage`] (parse failures are
//!   reported and dropped; they never close the channel)
//! - Bounded exponential-backoff reconnection: `min(1000 * 2^n, 30000)` ms,
//!   at most [`MAX_RECONNECT_ATTEMPTS`] reconnects, counter reset on open
//!
//! Exhaustion is terminal: the task ends after reporting
//! [`Error::ChannelExhausted`] and a terminal close. Callers that still
//! want the stream reconnect manually with a fresh [`connect`].

use crate::error::Error;
use crate::models::PushMessage;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Reconnects attempted after the initial connection, per exhaustion cycle
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
/// First backoff step in milliseconds
pub const BACKOFF_BASE_MS: u64 = 1000;
/// Backoff ceiling in milliseconds
pub const BACKOFF_CAP_MS: u64 = 30_000;

/// Delay before reconnect attempt `attempt` (0-based)
pub fn backoff_delay(attempt: u32) -> Duration {
    let factor = 1u64 << attempt.min(15);
    Duration::from_millis((BACKOFF_BASE_MS.saturating_mul(factor)).min(BACKOFF_CAP_MS))
}

/// Callbacks invoked by the channel task
///
/// All methods default to no-ops so handlers implement only what they
/// observe. `on_close(true)` marks exhaustion; no further reconnect is
/// scheduled after it.
pub trait PushHandler: Send + Sync + 'static {
    fn on_open(&self) {}
    fn on_message(&self, _msg: PushMessage) {}
    fn on_error(&self, _err: Error) {}
    fn on_close(&self, _terminal: bool) {}
}

/// Live channel handle
///
/// Dropping the handle closes the channel and cancels any pending
/// backoff timer.
pub struct PushChannel {
    shutdown: watch::Sender<bool>,
    outbound: mpsc::UnboundedSender<PushMessage>,
    task: tokio::task::JoinHandle<()>,
}

impl PushChannel {
    /// Queue a message for the backend. Messages queued while the socket
    /// is reconnecting are delivered once it reopens.
    pub fn send(&self, msg: PushMessage) {
        let _ = self.outbound.send(msg);
    }

    /// Close the channel. Idempotent; cancels a pending reconnect timer
    /// and prevents any further callback invocation.
    pub fn close(&self) {
        let _ = self.shutdown.send(true);
        self.task.abort();
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// Open a push channel and return its live handle.
pub fn connect(url: impl Into<String>, handler: Arc<dyn PushHandler>) -> PushChannel {
    let url = url.into();
    let (shutdown, shutdown_rx) = watch::channel(false);
    let (outbound, outbound_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(url, handler, shutdown_rx, outbound_rx));
    PushChannel {
        shutdown,
        outbound,
        task,
    }
}

async fn run(
    url: String,
    handler: Arc<dyn PushHandler>,
    mut shutdown: watch::Receiver<bool>,
    mut outbound: mpsc::UnboundedReceiver<PushMessage>,
) {
    let mut attempts: u32 = 0;
    loop {
        if *shutdown.borrow() {
            return;
        }

        let connected = tokio::select! {
            _ = shutdown.changed() => return,
            c = connect_async(url.as_str()) => c,
        };

        match connected {
            Ok((stream, _response)) => {
                attempts = 0;
                tracing::debug!(url = %url, "push channel open");
                handler.on_open();

                let (mut write, mut read) = stream.split();
                loop {
                    tokio::select! {
                        _ = shutdown.changed() => {
                            let _ = write.send(Message::Close(None)).await;
                            return;
                        }
                        Some(msg) = outbound.recv() => {
                            match serde_json::to_string(&msg) {
                                Ok(text) => {
                                    if write.send(Message::Text(text)).await.is_err() {
                                        break;
                                    }
                                }
                                Err(e) => handler.on_error(Error::MalformedResponse(e.to_string())),
                            }
                        }
                        frame = read.next() => match frame {
                            Some(Ok(Message::Text(text))) => {
                                match serde_json::from_str::<PushMessage>(&text) {
                                    Ok(msg) => handler.on_message(msg),
                                    // Bad frame: report and drop, channel stays up
                                    Err(e) => handler.on_error(Error::MalformedResponse(
                                        format!("push frame: {}", e),
                                    )),
                                }
                            }
                            Some(Ok(Message::Ping(payload))) => {
                                let _ = write.send(Message::Pong(payload)).await;
                            }
                            Some(Ok(Message::Close(_))) | None => break,
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                // A transport error ends the stream; the close
                                // path below drives reconnection
                                handler.on_error(Error::Unreachable(e.to_string()));
                                break;
                            }
                        }
                    }
                }
            }
            Err(e) => {
                handler.on_error(Error::Unreachable(e.to_string()));
            }
        }

        if attempts >= MAX_RECONNECT_ATTEMPTS {
            tracing::warn!(url = %url, attempts, "push channel exhausted");
            handler.on_error(Error::ChannelExhausted { attempts });
            handler.on_close(true);
            return;
        }

        handler.on_close(false);
        let delay = backoff_delay(attempts);
        attempts += 1;
        tracing::debug!(url = %url, attempt = attempts, delay_ms = delay.as_millis() as u64,
            "push channel reconnect scheduled");
        tokio::select! {
            _ = shutdown.changed() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    #[test]
    fn test_backoff_sequence() {
        let delays: Vec<u64> = (0..MAX_RECONNECT_ATTEMPTS)
            .map(|n| backoff_delay(n).as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 8000, 16000]);
    }

    #[test]
    fn test_backoff_capped() {
        assert_eq!(backoff_delay(5).as_millis(), 30_000);
        assert_eq!(backoff_delay(40).as_millis(), 30_000);
    }

    #[derive(Default)]
    struct Recording {
        opens: AtomicU32,
        closes: AtomicU32,
        errors: AtomicU32,
        exhausted: AtomicBool,
        terminal: AtomicBool,
    }

    impl PushHandler for Recording {
        fn on_open(&self) {
            self.opens.fetch_add(1, Ordering::SeqCst);
        }
        fn on_error(&self, err: Error) {
            self.errors.fetch_add(1, Ordering::SeqCst);
            if matches!(err, Error::ChannelExhausted { .. }) {
                self.exhausted.store(true, Ordering::SeqCst);
            }
        }
        fn on_close(&self, terminal: bool) {
            if terminal {
                self.terminal.store(true, Ordering::SeqCst);
            } else {
                self.closes.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_endpoint_exhausts_after_five_reconnects() {
        let handler = Arc::new(Recording::default());
        // Port 9 (discard) refuses immediately; every attempt fails
        let channel = connect("ws://127.0.0.1:9/ws/events", handler.clone());

        // Paused clock auto-advances through the 31s of backoff
        for _ in 0..200 {
            if handler.terminal.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        assert!(handler.terminal.load(Ordering::SeqCst));
        assert!(handler.exhausted.load(Ordering::SeqCst));
        // Initial attempt + 5 reconnects: 5 non-terminal closes, then terminal
        assert_eq!(handler.closes.load(Ordering::SeqCst), 5);
        assert_eq!(handler.opens.load(Ordering::SeqCst), 0);
        channel.close();
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_is_idempotent_and_stops_reconnects() {
        let handler = Arc::new(Recording::default());
        let channel = connect("ws://127.0.0.1:9/ws/events", handler.clone());
        channel.close();
        channel.close();

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!handler.exhausted.load(Ordering::SeqCst));
        assert!(handler.closes.load(Ordering::SeqCst) <= 1);
    }
}
