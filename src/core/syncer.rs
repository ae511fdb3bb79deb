//! Background fsync task.

use std::sync::Weak;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};

use crate::core::store::WharfStore;

/// Periodic fsync task, one per store. The shutdown channel doubles as the
/// sleep so cancellation interrupts the wait promptly.
pub(crate) struct Syncer {
    shutdown: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Syncer {
    pub(crate) fn spawn(store: Weak<WharfStore>, interval: Duration) -> Self {
        let (shutdown, signal) = bounded::<()>(1);
        let handle = thread::spawn(move || loop {
            match signal.recv_timeout(interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    let Some(store) = store.upgrade() else { break };
                    store.sync_quietly();
                }
            }
        });
        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal shutdown and wait for the task to exit.
    pub(crate) fn stop(mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Signal shutdown without waiting. Used from drop paths, where the final
    /// store reference may be held by the syncer thread itself.
    pub(crate) fn detach(self) {
        let _ = self.shutdown.send(());
    }
}
