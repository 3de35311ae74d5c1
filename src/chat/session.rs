//! Chat log and the controller that talks to the backend chat endpoints.
//!
//! The log is append-only and lives for one run of the application.  Free
//! text questions are sent with an empty context: the backend receives each
//! question on its own.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::api::{
    ApiError, ChatReply, PredictionExplanation, PredictionInput, ShelfLifeApi, StorageConditions,
};

/// Assistant text used when the backend gives nothing usable.
pub const FALLBACK_REPLY: &str = "Failed to get response";

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChatSession
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
    /// `true` while a chat request is in flight.
    pub loading: bool,
}

// ---------------------------------------------------------------------------
// ChatController
// ---------------------------------------------------------------------------

/// Owns the chat log and dispatches chat requests.
///
/// Each `submit`-style method does its synchronous part (log append, loading
/// flag) immediately and returns the future that performs the network call,
/// or `None` when nothing is sent.
#[derive(Clone)]
pub struct ChatController {
    api: Arc<dyn ShelfLifeApi>,
    session: Arc<Mutex<ChatSession>>,
}

impl ChatController {
    pub fn new(api: Arc<dyn ShelfLifeApi>) -> Self {
        Self {
            api,
            session: Arc::new(Mutex::new(ChatSession::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChatSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ChatSession {
        self.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Begin a request unless one is already running.
    fn begin(&self, user_message: Option<&str>) -> bool {
        let mut session = self.lock();
        if session.loading {
            return false;
        }
        if let Some(text) = user_message {
            session.messages.push(ChatMessage::user(text));
        }
        session.loading = true;
        true
    }

    fn finish(&self, reply: String) {
        let mut session = self.lock();
        session.messages.push(ChatMessage::assistant(reply));
        session.loading = false;
    }

    /// Send a free-text question.
    ///
    /// Blank input, or input submitted while another request is running, is
    /// ignored: no message is logged and no request is made.
    pub fn submit(&self, input: &str) -> Option<impl Future<Output = ()> + Send + 'static> {
        if input.trim().is_empty() || !self.begin(Some(input)) {
            return None;
        }

        let message = input.to_string();
        let this = self.clone();
        Some(async move {
            let reply = reply_text(this.api.chat(&message, "").await);
            this.finish(reply);
        })
    }

    /// Ask the backend to explain the prediction for `input`.
    pub fn explain_prediction(
        &self,
        input: PredictionInput,
    ) -> Option<impl Future<Output = ()> + Send + 'static> {
        if !self.begin(None) {
            return None;
        }

        let this = self.clone();
        Some(async move {
            let reply = match this.api.prediction_explanation(&input).await {
                Ok(explanation) => format_explanation(&explanation),
                Err(e) => error_text(&e),
            };
            this.finish(reply);
        })
    }

    /// Ask the backend for storage advice on the food and conditions of
    /// `input`.
    pub fn storage_advice(
        &self,
        input: PredictionInput,
    ) -> Option<impl Future<Output = ()> + Send + 'static> {
        if !self.begin(None) {
            return None;
        }

        let this = self.clone();
        Some(async move {
            let conditions = StorageConditions::from(&input);
            let reply = reply_text(
                this.api
                    .storage_advice(input.food_type, Some(&conditions))
                    .await,
            );
            this.finish(reply);
        })
    }
}

fn error_text(err: &ApiError) -> String {
    log::warn!("chat request failed: {err}");
    err.server_message().unwrap_or(FALLBACK_REPLY).to_string()
}

fn reply_text(outcome: Result<ChatReply, ApiError>) -> String {
    match outcome {
        Ok(reply) => reply
            .into_text()
            .unwrap_or_else(|| FALLBACK_REPLY.to_string()),
        Err(e) => error_text(&e),
    }
}

fn format_explanation(explanation: &PredictionExplanation) -> String {
    if explanation.explanation.is_empty() {
        return "No explanation available.".to_string();
    }
    explanation
        .explanation
        .iter()
        .map(|qa| format!("Q: {}\nA: {}", qa.question, qa.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
