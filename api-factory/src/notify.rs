// api-factory/src/notify.rs
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::warn;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Published once per settled request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    /// HTTP status, or 0 when no response was received
    pub status: u16,
    /// Request URL without the basename
    pub url: String,
}

/// A handle for receiving status notifications.
pub type Subscription = broadcast::Receiver<StatusEvent>;

/// Fan-out channel of request status codes
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<StatusEvent>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl Notifier {
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> Subscription {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: StatusEvent) {
        // send() only fails with no receivers, which is fine
        let _ = self.tx.send(event);
    }

    /// Call `listener` with the URL of every request that settles with `status`
    pub fn listen<F>(&self, status: u16, mut listener: F) -> JoinHandle<()>
    where
        F: FnMut(&str) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) if event.status == status => listener(&event.url),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(status, skipped, "status listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
