// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative cancellation for a running execution

use std::sync::Arc;
use tokio::sync::watch;

/// Requests that an execution stop after its active stage.
///
/// Clones share one flag. Cancelling never interrupts an action that is
/// already running.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let handle = CancelHandle::new();
        let other = handle.clone();
        assert!(!other.is_cancelled());

        handle.cancel();
        assert!(other.is_cancelled());
    }

    #[tokio::test]
    async fn subscribers_see_the_change() {
        let handle = CancelHandle::new();
        let mut rx = handle.subscribe();

        handle.cancel();
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }
}
