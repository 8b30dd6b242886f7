//! Observable conversation state and the policies that shape it.

use forkful_types::chat::{ChatMessage, ChatResponse};
use forkful_types::error::ApiError;
use forkful_types::restaurant::Restaurant;

/// What happens to the optimistic user message when a send fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Leave the user message in the transcript.
    #[default]
    KeepMessage,
    /// Remove the user message that the failed send appended.
    RollBack,
}

/// How overlapping sends interact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InFlightPolicy {
    /// Every send runs to completion; replies are appended in arrival order,
    /// which may differ from send order.
    #[default]
    Concurrent,
    /// A new send cancels any send still in flight. The superseded request
    /// is dropped and its reply is never appended.
    LatestWins,
}

/// Behavior switches for a [`super::ConversationManager`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversationOptions {
    pub failure_policy: FailurePolicy,
    pub in_flight_policy: InFlightPolicy,
}

/// Snapshot of everything observers can see about the conversation.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    /// Transcript in display (and causal) order.
    pub messages: Vec<ChatMessage>,
    /// Session id issued by the backend, reused for every later turn.
    pub session_id: Option<String>,
    /// Most recent successful reply (suggestions, restaurants).
    pub last_response: Option<ChatResponse>,
    /// Most recent failure, cleared by the next success.
    pub last_error: Option<ApiError>,
    /// Number of sends currently awaiting the backend.
    pub(crate) pending: usize,
}

impl ConversationState {
    /// True while at least one request is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn pending_requests(&self) -> usize {
        self.pending
    }

    /// Restaurants from the most recent reply, in backend order.
    pub fn restaurants(&self) -> &[Restaurant] {
        self.last_response
            .as_ref()
            .map(|r| r.restaurants())
            .unwrap_or_default()
    }

    /// Follow-up suggestions from the most recent reply.
    pub fn suggestions(&self) -> &[String] {
        self.last_response
            .as_ref()
            .map(|r| r.suggestions())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ConversationOptions::default();
        assert_eq!(options.failure_policy, FailurePolicy::KeepMessage);
        assert_eq!(options.in_flight_policy, InFlightPolicy::Concurrent);
    }

    #[test]
    fn test_empty_state() {
        let state = ConversationState::default();
        assert!(!state.is_loading());
        assert!(state.restaurants().is_empty());
        assert!(state.suggestions().is_empty());
    }

    #[test]
    fn test_restaurants_come_from_last_response() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "message": "ok",
            "session_id": "s1",
            "restaurants": [{"id": "2", "name": "Second"}, {"id": "1", "name": "First"}],
            "suggestions": ["More?"]
        }))
        .unwrap();
        let state = ConversationState {
            last_response: Some(response),
            ..Default::default()
        };
        let names: Vec<_> = state.restaurants().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert_eq!(state.suggestions(), ["More?".to_string()]);
    }
}
