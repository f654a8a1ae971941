//! Observer registry and fan-out of full-state updates.

mod broadcaster;

pub use broadcaster::{
    Broadcaster, DeliveryReport, ObserverId, ObserverReceiver, ObserverSender, Push,
};
