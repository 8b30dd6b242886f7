//! ChatBackend trait definition.
//!
//! The conversation manager talks to the recommendation service only
//! through this trait, so tests can substitute an in-memory backend and the
//! real HTTP client is injected at construction time.

use forkful_types::chat::{ChatRequest, ChatResponse};
use forkful_types::error::ApiError;

/// The chat operations the conversation manager needs from the backend.
///
/// Implementations live in forkful-infra (e.g., `RestClient`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatBackend: Send + Sync {
    /// Send one user turn and receive the assistant's reply.
    fn send_chat(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<ChatResponse, ApiError>> + Send;

    /// Ask the backend to discard a session.
    fn clear_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;
}
