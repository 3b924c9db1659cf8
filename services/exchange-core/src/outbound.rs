//! Outbound event queue and fan-out worker
//!
//! Write operations append events to a bounded in-memory queue while the
//! engine lock is held; an asynchronous worker drains the queue after the
//! lock is released and forwards into a broadcast channel. Observability
//! is best-effort: on overflow the oldest events are dropped and counted,
//! the ledger remains the source of truth.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, Notify};
use tracing::{debug, warn};

use crate::events::ExchangeEvent;

/// Configuration for the outbound queue.
#[derive(Debug, Clone)]
pub struct OutboxConfig {
    /// Maximum queued events before drop-oldest kicks in.
    pub capacity: usize,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// Bounded drop-oldest event queue between the engine and its listeners.
#[derive(Debug)]
pub struct EventOutbox {
    queue: Mutex<VecDeque<ExchangeEvent>>,
    capacity: usize,
    dropped: AtomicU64,
    notify: Notify,
}

impl EventOutbox {
    pub fn new(config: OutboxConfig) -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(config.capacity)),
            capacity: config.capacity,
            dropped: AtomicU64::new(0),
            notify: Notify::new(),
        }
    }

    /// Append one event, dropping the oldest entry on overflow.
    pub fn enqueue(&self, event: ExchangeEvent) {
        {
            let mut queue = self.queue.lock().expect("outbox lock poisoned");
            if queue.len() >= self.capacity {
                queue.pop_front();
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(total_dropped = total, "outbox full, dropped oldest event");
            }
            queue.push_back(event);
        }
        self.notify.notify_one();
    }

    /// Append a batch in order.
    pub fn enqueue_all(&self, events: impl IntoIterator<Item = ExchangeEvent>) {
        let mut appended = false;
        {
            let mut queue = self.queue.lock().expect("outbox lock poisoned");
            for event in events {
                if queue.len() >= self.capacity {
                    queue.pop_front();
                    let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!(total_dropped = total, "outbox full, dropped oldest event");
                }
                queue.push_back(event);
                appended = true;
            }
        }
        if appended {
            self.notify.notify_one();
        }
    }

    /// Take all queued events for delivery.
    pub fn drain(&self) -> Vec<ExchangeEvent> {
        let mut queue = self.queue.lock().expect("outbox lock poisoned");
        queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().expect("outbox lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events dropped since creation.
    pub fn dropped_total(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Wait until at least one event has been enqueued.
    pub async fn notified(&self) {
        self.notify.notified().await;
    }
}

/// Start the fan-out worker: drains the outbox whenever it is notified and
/// forwards events into `sender`. Send errors (no subscribers) are
/// ignored by design of the fire-and-forget channel.
pub fn spawn_fanout(
    outbox: Arc<EventOutbox>,
    sender: broadcast::Sender<ExchangeEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            outbox.notified().await;
            let events = outbox.drain();
            if events.is_empty() {
                continue;
            }
            debug!(count = events.len(), "fanning out events");
            for event in events {
                let _ = sender.send(event);
            }
        }
    })
}
