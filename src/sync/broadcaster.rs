use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};
use tablecast_schema::DatabaseUpdate;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What an observer channel carries.
pub type Push = Arc<DatabaseUpdate>;
pub type ObserverSender = mpsc::Sender<Push>;
pub type ObserverReceiver = mpsc::Receiver<Push>;

/// Opaque handle naming one registered observer channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(Uuid);

impl ObserverId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ObserverId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    /// Observers whose queue was full; they miss this update but stay registered.
    pub dropped: usize,
    /// Observers whose receiver was gone; they were removed.
    pub pruned: usize,
}

/// Registry of observer channels.
///
/// Delivery never waits: every observer has a bounded queue and an update that does not fit
/// is dropped for that observer only. Updates carry the full state, so the next one that
/// gets through heals the gap.
pub struct Broadcaster {
    observers: AHashMap<ObserverId, ObserverSender>,
    capacity: usize,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        Self {
            observers: AHashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Creates a channel sized for this broadcaster.
    pub fn channel(&self) -> (ObserverSender, ObserverReceiver) {
        mpsc::channel(self.capacity)
    }

    /// Adds `sender` to the observer set. Registering the same channel twice returns the
    /// id it already has.
    pub fn register(&mut self, sender: ObserverSender) -> ObserverId {
        if let Some((id, _)) = self
            .observers
            .iter()
            .find(|(_, existing)| existing.same_channel(&sender))
        {
            debug!(observer = %id, "Channel already registered");
            return *id;
        }
        let id = ObserverId::new();
        self.observers.insert(id, sender);
        info!(observer = %id, observers = self.observers.len(), "Observer registered");
        id
    }

    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let removed = self.observers.remove(&id).is_some();
        if removed {
            info!(observer = %id, observers = self.observers.len(), "Observer unregistered");
        }
        removed
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.observers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Sends `update` to a single observer.
    pub fn send_to(&mut self, id: ObserverId, update: Push) -> DeliveryReport {
        self.deliver(update, |candidate| candidate == id)
    }

    /// Sends `update` to every observer, the originator of the mutation included.
    pub fn broadcast_all(&mut self, update: Push) -> DeliveryReport {
        self.deliver(update, |_| true)
    }

    /// Sends `update` to every observer except `originator`, which already holds this state.
    pub fn broadcast_except(&mut self, update: Push, originator: Option<ObserverId>) -> DeliveryReport {
        self.deliver(update, |candidate| Some(candidate) != originator)
    }

    fn deliver(&mut self, update: Push, wanted: impl Fn(ObserverId) -> bool) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let mut gone = Vec::new();

        for (id, sender) in &self.observers {
            if !wanted(*id) {
                continue;
            }
            match sender.try_send(Arc::clone(&update)) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(
                        observer = %id,
                        revision = update.revision,
                        "Observer queue full; dropping update"
                    );
                    report.dropped += 1;
                }
                Err(TrySendError::Closed(_)) => gone.push(*id),
            }
        }

        for id in gone {
            self.observers.remove(&id);
            info!(observer = %id, "Observer channel closed; removed");
            report.pruned += 1;
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tablecast_schema::DatabaseSnapshot;

    fn update(revision: u64) -> Push {
        Arc::new(DatabaseUpdate {
            revision,
            cause: "Test".to_string(),
            at: Utc::now(),
            database: DatabaseSnapshot::default(),
        })
    }

    #[test]
    fn register_is_idempotent_per_channel() {
        let mut b = Broadcaster::new(4);
        let (tx, _rx) = b.channel();
        let first = b.register(tx.clone());
        let second = b.register(tx);
        assert_eq!(first, second);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn broadcast_except_skips_originator() {
        let mut b = Broadcaster::new(4);
        let (tx_a, mut rx_a) = b.channel();
        let (tx_b, mut rx_b) = b.channel();
        let a = b.register(tx_a);
        b.register(tx_b);

        let report = b.broadcast_except(update(1), Some(a));
        assert_eq!(report.delivered, 1);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().map(|u| u.revision), Ok(1));

        let report = b.broadcast_all(update(2));
        assert_eq!(report.delivered, 2);
        assert_eq!(rx_a.try_recv().map(|u| u.revision), Ok(2));
        assert_eq!(rx_b.try_recv().map(|u| u.revision), Ok(2));
    }

    #[test]
    fn full_queue_drops_and_closed_channel_prunes() {
        let mut b = Broadcaster::new(1);
        let (tx_slow, mut rx_slow) = b.channel();
        let (tx_gone, rx_gone) = b.channel();
        b.register(tx_slow);
        let gone = b.register(tx_gone);
        drop(rx_gone);

        let report = b.broadcast_all(update(1));
        assert_eq!(
            report,
            DeliveryReport {
                delivered: 1,
                dropped: 0,
                pruned: 1
            }
        );
        assert!(!b.contains(gone));

        let report = b.broadcast_all(update(2));
        assert_eq!(report.dropped, 1);
        assert_eq!(rx_slow.try_recv().map(|u| u.revision), Ok(1));
        assert!(rx_slow.try_recv().is_err());
    }

    #[test]
    fn observer_id_parses_its_display_form() {
        let id = ObserverId::new();
        assert_eq!(id.to_string().parse::<ObserverId>().ok(), Some(id));
        assert!("nope".parse::<ObserverId>().is_err());
    }
}
