//! Handwave Server
//!
//! Serves interpreted hand gestures to WebSocket clients. Every connection
//! gets its own camera pipeline and gesture state; events are pushed as JSON
//! text messages in the order they were produced. Client messages are read
//! only to notice when the client leaves.

pub mod factory;
pub mod server;
pub mod session;

pub use factory::{FrameInput, PipelineFactory, SessionFactory};
pub use server::GestureServer;
pub use session::{pump_events, run_session, ChannelSink};
