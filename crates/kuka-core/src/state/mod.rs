//! Client state machine.
//!
//! # Module Structure
//!
//! - `chat_state`: the `ChatState` aggregate (room store, active room,
//!   transient transcript and selection) and its room/selection transitions
//! - `dispatch`: the two halves of a fan-out round, `begin_dispatch` and
//!   `commit_replies`
//!
//! Every transition takes `&mut ChatState` and leaves it consistent when it
//! returns; rejected transitions return `KukaError::InvariantViolation` and
//! change nothing.

mod chat_state;
mod dispatch;


pub use chat_state::ChatState;
pub use dispatch::{OutboundRequest, PendingDispatch};
