//! Economic event bus and best-effort notification delivery.
//!
//! Processors publish an [`EconomicEvent`] only after their transaction has
//! committed. Delivery happens on a separate task:
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`NotificationDispatcher`]: consumes the bus and hands each event to
//!   every configured [`NotificationChannel`]. Delivery failures are logged
//!   and never reach the code that published the event.
//! - [`delivery`]: concrete channels (structured log, webhook).

pub mod bus;
pub mod delivery;
pub mod dispatcher;

pub use bus::{EconomicEvent, EventBus};
pub use delivery::log::LogChannel;
pub use delivery::webhook::WebhookDelivery;
pub use delivery::{DeliveryError, NotificationChannel};
pub use dispatcher::NotificationDispatcher;
