//! In-process [`TaxApi`] double for flow tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::api::TaxApi;
use crate::error::{FlowError, Result};
use crate::models::{CalculationResponse, CalculationResult, ChatRequest, ChatResponse, TaxInputs};

/// Records every call and replays scripted replies in order. Once a script
/// runs dry the fake answers with a default success.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub calculate_calls: Mutex<Vec<TaxInputs>>,
    pub chat_calls: Mutex<Vec<ChatRequest>>,
    calculate_replies: Mutex<VecDeque<Result<CalculationResponse>>>,
    chat_replies: Mutex<VecDeque<Result<ChatResponse>>>,
    gate: Option<Arc<Notify>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every call until `gate` is notified once per call.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push_calculation(&self, reply: Result<CalculationResponse>) {
        self.calculate_replies.lock().unwrap().push_back(reply);
    }

    pub fn push_chat(&self, reply: Result<ChatResponse>) {
        self.chat_replies.lock().unwrap().push_back(reply);
    }

    pub fn calculate_count(&self) -> usize {
        self.calculate_calls.lock().unwrap().len()
    }

    pub fn chat_count(&self) -> usize {
        self.chat_calls.lock().unwrap().len()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

pub(crate) fn calculation_response(user_id: &str) -> CalculationResponse {
    CalculationResponse {
        success: true,
        message: "Tax calculated successfully".to_string(),
        user_id: user_id.to_string(),
        tax_calculation: CalculationResult {
            gross_income: 6_120_000.0,
            total_deductions: 1_224_000.0,
            taxable_income: 4_896_000.0,
            tax_owed: 734_400.0,
            effective_tax_rate: 12.0,
            after_tax_income: 5_385_600.0,
        },
    }
}

pub(crate) fn chat_reply(text: &str) -> ChatResponse {
    ChatResponse {
        ai_response: text.to_string(),
    }
}

pub(crate) fn http_error(status: u16) -> FlowError {
    FlowError::Http {
        status,
        body: "upstream failure".to_string(),
    }
}

pub(crate) fn transport_error() -> FlowError {
    FlowError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

#[async_trait]
impl TaxApi for FakeApi {
    async fn calculate(&self, inputs: &TaxInputs) -> Result<CalculationResponse> {
        self.calculate_calls.lock().unwrap().push(*inputs);
        self.wait_for_gate().await;
        self.calculate_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(calculation_response("user-default")))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.chat_calls.lock().unwrap().push(request.clone());
        self.wait_for_gate().await;
        self.chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(chat_reply("Happy to help.")))
    }
}
