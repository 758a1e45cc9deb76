use std::sync::Arc;
use tracing::{debug, error, info};

use crate::api::TaxApi;
use crate::models::ChatRequest;
use crate::request::{RequestSlot, RequestState};
use crate::session::SessionStore;
use crate::transcript::{ChatMessage, Transcript};

pub const GREETING: &str = "Hi! I'm your 2026 tax reform assistant.\n\nI can explain your tax results, deductions, reliefs, and payment steps. What would you like to know?";
pub const FALLBACK_REPLY: &str = "Sorry, I couldn’t fetch a response right now. Please try again.";
pub const LOCKED_PLACEHOLDER: &str = "Please use the tax calculator to ask tax assistance";
pub const UNLOCKED_PLACEHOLDER: &str = "Ask Tax Assistance";

pub const SUGGESTED_PROMPTS: [&str; 3] = [
    "How is the Consolidated Relief Allowance calculated?",
    "What are the 2026 tax brackets?",
    "How can I reduce my tax liability?",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The assistant answered; the reply was appended
    Replied(String),
    /// The request failed; the fallback reply was appended
    FellBack,
    /// Blank text, or a turn was already in flight
    Ignored,
    /// No session yet, a calculation has to succeed first
    Locked,
}

/// Chat with the remote assistant, gated on an active session.
pub struct ChatSession {
    api: Arc<dyn TaxApi>,
    session: Arc<SessionStore>,
    transcript: Transcript,
    request: RequestSlot,
}

impl ChatSession {
    pub fn new(api: Arc<dyn TaxApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            transcript: Transcript::with_greeting(GREETING),
            request: RequestSlot::new(),
        }
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.messages()
    }

    pub fn last_messages(&self, n: usize) -> Vec<ChatMessage> {
        self.transcript.last_messages(n)
    }

    pub fn request_state(&self) -> RequestState {
        self.request.state()
    }

    pub fn is_loading(&self) -> bool {
        self.request.is_in_flight()
    }

    /// Chat is only available once a calculation has issued a session id.
    pub fn is_unlocked(&self) -> bool {
        self.session.is_active()
    }

    /// Whether the input box and suggested prompts accept interaction right now.
    pub fn input_enabled(&self) -> bool {
        self.is_unlocked() && !self.is_loading()
    }

    pub fn placeholder(&self) -> &'static str {
        if self.is_unlocked() {
            UNLOCKED_PLACEHOLDER
        } else {
            LOCKED_PLACEHOLDER
        }
    }

    pub fn suggested_prompts(&self) -> &'static [&'static str] {
        &SUGGESTED_PROMPTS
    }

    pub async fn send_suggested(&self, index: usize) -> SendOutcome {
        match SUGGESTED_PROMPTS.get(index) {
            Some(prompt) => self.send(prompt).await,
            None => SendOutcome::Ignored,
        }
    }

    /// Send one chat turn.
    ///
    /// The user message is appended before the request goes out. Exactly one
    /// assistant message follows it: the reply, or [`FALLBACK_REPLY`] if the
    /// request fails or this future is dropped before it settles.
    pub async fn send(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }
        if !self.is_unlocked() {
            debug!("Chat is locked until a calculation succeeds");
            return SendOutcome::Locked;
        }
        let Some(claim) = self.request.try_begin() else {
            debug!("Chat turn already in flight, dropping send");
            return SendOutcome::Ignored;
        };

        self.transcript.push(ChatMessage::user(text));
        let turn = PendingTurn {
            transcript: &self.transcript,
            answered: false,
        };

        let request = ChatRequest {
            user_id: self.session.get(),
            prompt: text.to_string(),
        };
        info!(session_id = %request.user_id, "Sending chat turn");

        match self.api.chat(&request).await {
            Ok(response) => {
                turn.answer(ChatMessage::assistant(response.ai_response.clone()));
                claim.succeed();
                SendOutcome::Replied(response.ai_response)
            }
            Err(e) => {
                error!(
                    error = %e,
                    request_failure = e.is_request_failure(),
                    "Chat turn failed"
                );
                turn.answer(ChatMessage::assistant(FALLBACK_REPLY));
                claim.fail();
                SendOutcome::FellBack
            }
        }
    }
}

/// A user message still waiting for its assistant entry.
struct PendingTurn<'a> {
    transcript: &'a Transcript,
    answered: bool,
}

impl PendingTurn<'_> {
    fn answer(mut self, message: ChatMessage) {
        self.answered = true;
        self.transcript.push(message);
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if !self.answered {
            self.transcript.push(ChatMessage::assistant(FALLBACK_REPLY));
        }
    }
}
