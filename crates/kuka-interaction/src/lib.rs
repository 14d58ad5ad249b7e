//! HTTP implementations of the kuka client traits.

pub mod openrouter_client;

pub use openrouter_client::OpenRouterClient;
