//! Cancellation scope tied to a view's lifetime.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::errors::ClientError;

/// Owned by a view. Dropping it cancels every request still running under it.
pub struct ViewScope {
    cancelled: Arc<watch::Sender<bool>>,
}

/// Cloneable handle that can cancel a scope from outside the view.
#[derive(Clone)]
pub struct ScopeHandle {
    cancelled: Arc<watch::Sender<bool>>,
}

impl ViewScope {
    pub fn new() -> Self {
        let (cancelled, _) = watch::channel(false);
        Self {
            cancelled: Arc::new(cancelled),
        }
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Runs `request` unless the scope is cancelled first.
    pub async fn guard<T, F>(&self, request: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        if self.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let mut rx = self.cancelled.subscribe();
        tokio::select! {
            result = request => result,
            _ = rx.wait_for(|cancelled| *cancelled) => Err(ClientError::Cancelled),
        }
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancelled.send_replace(true);
    }
}

impl ScopeHandle {
    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }
}
