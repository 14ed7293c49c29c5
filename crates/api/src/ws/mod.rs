//! Studio event sockets: the authenticated upgrade, the per-session
//! registry, the heartbeat that hangs up ended sessions, and the relay from
//! the event bus.

mod forward;
mod handler;
mod heartbeat;
pub mod manager;

pub use forward::start_event_forwarder;
pub use handler::ws_handler;
pub use heartbeat::{heartbeat_round, start_heartbeat};
pub use manager::{SocketSession, WsManager};
