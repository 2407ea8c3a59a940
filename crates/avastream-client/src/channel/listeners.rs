use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::channel::ChannelEvent;

#[derive(Default)]
struct Registry {
    listeners: DashMap<u64, mpsc::UnboundedSender<ChannelEvent>>,
    seq: AtomicU64,
}

/// Fan-out of channel events to subscribed listeners.
///
/// Each listener owns an unbounded queue, so SDK callbacks never block and no
/// event is dropped while the listener is registered. Events reach every
/// listener in emit order.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Registry>,
}

/// Registration handle. Dropping it removes the listener.
pub struct ListenerHandle {
    id: u64,
    registry: Weak<Registry>,
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(reg) = self.registry.upgrade() {
            reg.listeners.remove(&self.id);
            tracing::debug!(listener = self.id, "listener removed");
        }
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> (ListenerHandle, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.inner.seq.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.insert(id, tx);

        let handle = ListenerHandle {
            id,
            registry: Arc::downgrade(&self.inner),
        };
        (handle, rx)
    }

    /// Deliver to every listener. Returns how many accepted the event.
    pub fn emit(&self, ev: ChannelEvent) -> usize {
        let mut delivered = 0;
        for entry in self.inner.listeners.iter() {
            // Err only when the receiver is gone; its handle removes the entry.
            if entry.value().send(ev.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.listeners.is_empty()
    }
}
