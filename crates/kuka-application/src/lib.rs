//! Application layer for Kuka.
//!
//! Coordinates the domain state with the inference API clients and the
//! favorites store, and reports failures as user-visible notices.

pub mod chat_service;
pub mod fan_out;

pub use chat_service::{ChatService, ModelEntry, RoomSummary};
pub use fan_out::DispatchOutcome;
