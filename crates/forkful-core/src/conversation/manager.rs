//! The conversation manager: transcript, session id, and request sequencing.
//!
//! Sends are optimistic: the user message lands in the transcript before
//! the backend is contacted. Every send carries its own cancellation token,
//! a child of the current epoch token. Clearing the conversation cancels the
//! epoch (and with it every in-flight send) and starts a new one, so a reply
//! that arrives after a clear can never resurrect the old transcript or
//! session id.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use forkful_types::chat::{ChatMessage, ChatRequest, ChatResponse};
use forkful_types::error::ApiError;
use forkful_types::location::Location;
use forkful_types::preferences::Preferences;

use crate::backend::ChatBackend;

use super::state::{ConversationOptions, ConversationState, FailurePolicy, InFlightPolicy};

/// Errors returned from [`ConversationManager::send_message`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversationError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("request was cancelled before the reply was applied")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Cancellation bookkeeping for in-flight sends.
struct SendTracking {
    /// Parent of every send started since the last clear.
    epoch: CancellationToken,
    /// Id and token of the most recently started send (for `LatestWins`).
    latest: Option<(u64, CancellationToken)>,
    next_id: u64,
}

/// Owns the transcript and backend session for one conversation.
///
/// Generic over `ChatBackend` so the HTTP client is injected rather than
/// reached through a global. All methods take `&self`; wrap the manager in
/// an `Arc` to drive overlapping sends from several tasks.
pub struct ConversationManager<B: ChatBackend> {
    backend: Arc<B>,
    options: ConversationOptions,
    state: watch::Sender<ConversationState>,
    tracking: Mutex<SendTracking>,
}

impl<B: ChatBackend + 'static> ConversationManager<B> {
    /// Create a manager with default options.
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_options(backend, ConversationOptions::default())
    }

    pub fn with_options(backend: Arc<B>, options: ConversationOptions) -> Self {
        let (state, _) = watch::channel(ConversationState::default());
        Self {
            backend,
            options,
            state,
            tracking: Mutex::new(SendTracking {
                epoch: CancellationToken::new(),
                latest: None,
                next_id: 0,
            }),
        }
    }

    pub fn options(&self) -> ConversationOptions {
        self.options
    }

    // --- Observation ---

    /// Receive a notification on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state.subscribe()
    }

    /// Clone of the current state.
    pub fn state(&self) -> ConversationState {
        self.state.borrow().clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.borrow().messages.clone()
    }

    pub fn session_id(&self) -> Option<String> {
        self.state.borrow().session_id.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn last_response(&self) -> Option<ChatResponse> {
        self.state.borrow().last_response.clone()
    }

    pub fn last_error(&self) -> Option<ApiError> {
        self.state.borrow().last_error.clone()
    }

    // --- Operations ---

    /// Send a user message and wait for the assistant's reply.
    ///
    /// The user message is appended before the first await. On success the
    /// reply is appended and its session id stored. On failure the error is
    /// recorded as `last_error` and returned; whether the user message stays
    /// depends on [`FailurePolicy`].
    pub async fn send_message(
        &self,
        text: &str,
        location: Option<Location>,
        preferences: Option<Preferences>,
    ) -> Result<ChatResponse, ConversationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyMessage);
        }

        let (send_id, token) = self.begin_send();
        let user_message = ChatMessage::user(text);
        let message_id = user_message.id;

        let mut session_id = None;
        self.state.send_modify(|state| {
            state.messages.push(user_message);
            state.pending += 1;
            session_id = state.session_id.clone();
        });

        let request = ChatRequest {
            message: text.to_string(),
            session_id,
            location,
            preferences,
        };
        debug!(
            session_id = request.session_id.as_deref().unwrap_or("-"),
            has_location = request.location.is_some(),
            "Sending chat message"
        );

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.backend.send_chat(&request) => Some(result),
        };
        self.end_send(send_id);

        let mut applied = Err(ConversationError::Cancelled);
        let failure_policy = self.options.failure_policy;
        self.state.send_modify(|state| {
            state.pending = state.pending.saturating_sub(1);

            // Checked under the state lock: a clear that already cancelled
            // this send has wiped (or is about to wipe) the transcript.
            if token.is_cancelled() {
                return;
            }
            match &outcome {
                Some(Ok(response)) => {
                    state
                        .messages
                        .push(ChatMessage::assistant(response.message.clone()));
                    state.session_id = Some(response.session_id.clone());
                    state.last_response = Some(response.clone());
                    state.last_error = None;
                    applied = Ok(response.clone());
                }
                Some(Err(err)) => {
                    if failure_policy == FailurePolicy::RollBack {
                        state.messages.retain(|m| m.id != message_id);
                    }
                    state.last_error = Some(err.clone());
                    applied = Err(ConversationError::Api(err.clone()));
                }
                None => {}
            }
        });

        match &applied {
            Ok(response) => info!(
                session_id = %response.session_id,
                restaurants = response.restaurants().len(),
                "Chat reply received"
            ),
            Err(ConversationError::Cancelled) => debug!("Chat send cancelled"),
            Err(err) => warn!(error = %err, "Chat send failed"),
        }
        applied
    }

    /// Clear the transcript and forget the session.
    ///
    /// Local state is discarded unconditionally and every in-flight send is
    /// cancelled. If a session existed, a best-effort discard request runs
    /// in the background; its failure is only logged. Returns the handle of
    /// that background task, if one was started.
    pub fn clear_messages(&self) -> Option<JoinHandle<()>> {
        {
            let mut tracking = self.tracking.lock().expect("send tracking lock poisoned");
            tracking.epoch.cancel();
            tracking.epoch = CancellationToken::new();
            tracking.latest = None;
        }

        let mut previous_session = None;
        self.state.send_modify(|state| {
            state.messages.clear();
            previous_session = state.session_id.take();
            state.last_response = None;
            state.last_error = None;
        });

        let session_id = previous_session?;
        info!(session_id = %session_id, "Conversation cleared, discarding session");

        let backend = Arc::clone(&self.backend);
        Some(tokio::spawn(async move {
            match backend.clear_session(&session_id).await {
                Ok(()) => debug!(session_id = %session_id, "Session discarded"),
                Err(e) => warn!(session_id = %session_id, error = %e, "Failed to discard session"),
            }
        }))
    }

    /// Register a new send and return its id and token.
    fn begin_send(&self) -> (u64, CancellationToken) {
        let mut tracking = self.tracking.lock().expect("send tracking lock poisoned");
        let id = tracking.next_id;
        tracking.next_id += 1;
        let token = tracking.epoch.child_token();
        if self.options.in_flight_policy == InFlightPolicy::LatestWins {
            if let Some((_, previous)) = tracking.latest.replace((id, token.clone())) {
                debug!("Cancelling superseded chat send");
                previous.cancel();
            }
        }
        (id, token)
    }

    fn end_send(&self, id: u64) {
        let mut tracking = self.tracking.lock().expect("send tracking lock poisoned");
        if matches!(&tracking.latest, Some((latest, _)) if *latest == id) {
            tracking.latest = None;
        }
    }
}
