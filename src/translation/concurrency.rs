/*!
 * Bounded admission for concurrent document processing.
 *
 * A fixed number of documents may be in flight at once; further tasks poll
 * for a free slot instead of queueing, so admission order is opportunistic
 * rather than FIFO.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::trace;

/// Interval between admission attempts when the gate is full
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Counting gate limiting how many documents are processed at once
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    active: Arc<AtomicUsize>,
    limit: usize,
}

impl ConcurrencyGate {
    /// Create a gate admitting at most `limit` holders at a time
    pub fn new(limit: usize) -> Self {
        Self {
            active: Arc::new(AtomicUsize::new(0)),
            limit: limit.max(1),
        }
    }

    /// Wait until a slot is free, then claim it.
    ///
    /// The returned guard releases the slot when dropped.
    pub async fn admit(&self) -> GateGuard {
        loop {
            let claimed = self.active.fetch_update(
                Ordering::AcqRel,
                Ordering::Acquire,
                |current| {
                    if current < self.limit {
                        Some(current + 1)
                    } else {
                        None
                    }
                },
            );

            if claimed.is_ok() {
                return GateGuard {
                    active: Arc::clone(&self.active),
                };
            }

            trace!("Concurrency gate full ({} in flight), waiting", self.limit);
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Number of currently admitted holders
    pub fn in_flight(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }
}

/// Slot held on the gate; dropping it frees the slot
#[derive(Debug)]
pub struct GateGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}
