//! Background I/O manager using threads and channels.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use tracing::error;

use crate::api::FileApi;
use crate::async_io::{execute, IoRequest, IoResponse};

/// Runs file store requests on worker threads.
///
/// Every request gets its own thread so independent calls (the members of
/// a delete batch, say) overlap. Responses are polled via `try_recv()`.
pub struct IoManager {
    api: Arc<dyn FileApi>,
    tx: Sender<IoResponse>,
    rx: Receiver<IoResponse>,
    in_flight: Arc<AtomicUsize>,
}

impl IoManager {
    #[must_use]
    pub fn new(api: Arc<dyn FileApi>) -> Self {
        let (tx, rx) = channel::<IoResponse>();
        Self {
            api,
            tx,
            rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start a request on a fresh worker thread.
    pub fn send(&self, request: IoRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);

        let spawned = thread::Builder::new()
            .name("ferret-io".to_string())
            .spawn(move || {
                execute(api.as_ref(), request, &mut |response| {
                    // Receiver only goes away on shutdown
                    let _ = tx.send(response);
                });
                in_flight.fetch_sub(1, Ordering::SeqCst);
            });

        if let Err(e) = spawned {
            error!(error = %e, "failed to spawn I/O worker");
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Try to receive a response without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<IoResponse> {
        self.rx.try_recv().ok()
    }

    /// Number of requests whose worker has not finished yet
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn api(&self) -> &dyn FileApi {
        self.api.as_ref()
    }

    /// Block until a response arrives or `timeout` elapses
    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<IoResponse> {
        self.rx.recv_timeout(timeout).ok()
    }
}
