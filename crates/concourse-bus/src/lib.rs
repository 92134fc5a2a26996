//! Synchronous string-topic publish/subscribe bus.
//!
//! The bus is the sole coupling mechanism between Concourse components:
//! no component holds a direct reference to another, everything crosses
//! this seam as plain [`serde_json::Value`] payloads. The bus is an
//! explicit instance handed to each component at construction -- there is
//! no process-global channel.
//!
//! # Delivery contract
//!
//! - Dispatch is synchronous, on the caller's thread of execution, in
//!   subscriber registration order.
//! - A failing handler is isolated: its error is logged and delivery
//!   continues to the remaining subscribers.
//! - Dispatch is re-entrant: a handler may publish, subscribe, or
//!   unsubscribe. Nested publishes run depth-first before the outer
//!   publish resumes; a topic cycle that reaches a handler already on
//!   the call stack skips that handler with a warning.
//! - There is no buffering or replay: events published with no
//!   subscribers are lost.

mod bus;
mod error;

pub use bus::{EventBus, Subscription};
pub use error::HandlerError;
