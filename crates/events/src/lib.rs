//! VIDU studio event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StudioEvent`]: the event envelope forwarded to WebSocket clients.

pub mod bus;

pub use bus::{event_types, EventBus, StudioEvent};
