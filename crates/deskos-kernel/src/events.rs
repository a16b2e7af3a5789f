//! Kernel event bus.
//!
//! A broadcast channel for desktop lifecycle events. The bus is owned by
//! the [`Kernel`](crate::kernel::Kernel) and handed to components that
//! need it — there is no global bus. Emitting never blocks and tolerates
//! having no subscribers; late subscribers only see events emitted after
//! they subscribed.

use deskos_types::FileKind;
use tokio::sync::broadcast;

/// Default channel capacity. Slow subscribers past this lag start losing
/// the oldest events (broadcast semantics).
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Something happened in the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelEvent {
    /// The kernel finished booting and the filesystem is composed.
    Booted,
    /// An app manifest was registered.
    AppRegistered { id: String },
    /// An app was launched.
    AppLaunched { id: String },
    /// A home directory was seeded for the first time.
    HomeSeeded { id: String },
    /// A file was dispatched to a capability handler.
    FileOpened { kind: FileKind, name: String },
}

/// Clonable sender half of the kernel's event channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<KernelEvent>,
}

impl EventBus {
    /// Create a bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all current subscribers.
    pub fn emit(&self, event: KernelEvent) {
        // send only fails when there are no receivers; that's fine.
        let _ = self.tx.send(event);
    }

    /// Subscribe to events emitted from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<KernelEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.emit(KernelEvent::AppLaunched { id: "music".into() });

        assert_eq!(
            rx.recv().await.unwrap(),
            KernelEvent::AppLaunched { id: "music".into() }
        );
    }

    #[tokio::test]
    async fn emit_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.emit(KernelEvent::Booted);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn late_subscribers_miss_earlier_events() {
        let bus = EventBus::default();
        bus.emit(KernelEvent::Booted);

        let mut rx = bus.subscribe();
        bus.emit(KernelEvent::AppRegistered { id: "notes".into() });

        assert_eq!(
            rx.recv().await.unwrap(),
            KernelEvent::AppRegistered { id: "notes".into() }
        );
        assert!(rx.try_recv().is_err());
    }
}
