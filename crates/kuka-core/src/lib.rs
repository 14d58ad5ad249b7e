//! Domain layer of the Kuka multi-model chat client.
//!
//! Holds the room store and selection state machine, the catalog and
//! favorites types, and the traits the outer layers implement.

pub mod catalog;
pub mod client;
pub mod error;
pub mod favorites;
pub mod message;
pub mod notice;
pub mod retry;
pub mod room;
pub mod selection;
pub mod state;

// Re-export common error type
pub use error::KukaError;

pub use catalog::{Catalog, Model};
pub use client::{CatalogClient, ClientError, CompletionClient};
pub use favorites::{Favorites, FavoritesRepository};
pub use message::{Message, MessageRole};
pub use notice::{Notice, NoticeVariant};
pub use retry::RetryPolicy;
pub use room::Room;
pub use selection::{SelectedModel, SelectionSet};
pub use state::{ChatState, OutboundRequest, PendingDispatch};
