//! Conversation state management for Forkful.
//!
//! `ConversationManager` owns the transcript and the backend session id,
//! sequences user and assistant messages, and publishes every state
//! transition through a `tokio::sync::watch` channel so the front end can
//! re-render.

pub mod manager;
pub mod state;

pub use manager::{ConversationError, ConversationManager};
pub use state::{ConversationOptions, ConversationState, FailurePolicy, InFlightPolicy};
