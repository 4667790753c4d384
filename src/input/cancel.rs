//! Cooperative cancellation for URL fetches
//!
//! The caller holds a clone of the token. The fetcher races every attempt
//! and every backoff sleep against [`CancellationToken::cancelled`], so a
//! cancel takes effect immediately and yields no `InputSource`.

use super::types::{InputError, InputResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Shared {
    flag: AtomicBool,
    notify: Notify,
}

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.flag.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.shared.flag.store(true, Ordering::Release);
        self.shared.notify.notify_waiters();
    }

    /// Resolves once the token has fired.
    pub async fn cancelled(&self) {
        let notified = self.shared.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent cancel is not lost
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// `Err(Cancelled)` for `url` once the token has fired.
    pub(crate) fn ensure_active(&self, url: &str) -> InputResult<()> {
        if self.is_cancelled() {
            return Err(InputError::Cancelled {
                url: url.to_string(),
            });
        }
        Ok(())
    }
}
