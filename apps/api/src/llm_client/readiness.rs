//! Readiness gate for the chat capability.
//!
//! The capability may not be available when the service starts. Whoever owns
//! it calls `signal_ready` once; uploads are refused until then. If nobody ever
//! signals, `wait_ready` never resolves and uploads stay disabled.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Clone)]
pub struct ReadinessGate {
    tx: Arc<watch::Sender<bool>>,
}

impl ReadinessGate {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Marks the capability as available. Idempotent.
    pub fn signal_ready(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the capability is ready.
    pub async fn wait_ready(&self) {
        let mut rx = self.tx.subscribe();
        let closed = rx.wait_for(|ready| *ready).await.is_err();
        if closed {
            // The sender lives as long as `self`, so this is unreachable in practice.
            std::future::pending::<()>().await;
        }
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}
