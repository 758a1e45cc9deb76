use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

use crate::api::TaxApi;
use crate::config::ValidationPolicy;
use crate::error::ValidationError;
use crate::models::{CalculationResult, TaxInputs};
use crate::request::{RequestSlot, RequestState};
use crate::session::SessionStore;

pub const VALIDATION_MESSAGE: &str = "Please fill in all required fields.";
pub const CALCULATION_FAILED_MESSAGE: &str = "An error occurred while calculating taxes.";

/// What happened to one [`CalculationFlow::submit`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The service computed a result; the session id has been updated
    Calculated(CalculationResult),
    /// Rejected locally, nothing was sent
    Invalid(ValidationError),
    /// The request failed; `CalculationState::error` holds the user message
    Failed,
    /// Another calculation was still in flight, so this call was dropped
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CalculationState {
    pub request: RequestState,
    pub error: Option<String>,
}

impl CalculationState {
    pub fn is_loading(&self) -> bool {
        self.request.is_in_flight()
    }
}

/// Validates tax inputs and submits them to the calculation endpoint.
pub struct CalculationFlow {
    api: Arc<dyn TaxApi>,
    session: Arc<SessionStore>,
    policy: ValidationPolicy,
    request: RequestSlot,
    error: Mutex<Option<String>>,
}

impl CalculationFlow {
    pub fn new(api: Arc<dyn TaxApi>, session: Arc<SessionStore>, policy: ValidationPolicy) -> Self {
        Self {
            api,
            session,
            policy,
            request: RequestSlot::new(),
            error: Mutex::new(None),
        }
    }

    pub fn state(&self) -> CalculationState {
        CalculationState {
            request: self.request.state(),
            error: self.error(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.request.is_in_flight()
    }

    pub fn error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_error(&self, message: Option<&str>) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = message.map(str::to_string);
    }

    /// Submit `inputs` for calculation.
    ///
    /// Never returns an error: validation and request failures end up in
    /// [`CalculationState::error`] and the returned outcome.
    pub async fn submit(&self, inputs: TaxInputs) -> SubmitOutcome {
        if self.request.is_in_flight() {
            debug!("Calculation already in flight, dropping submit");
            return SubmitOutcome::Ignored;
        }

        if let Err(e) = self.policy.validate(&inputs) {
            info!(error = ?e, "Rejected tax inputs");
            self.request.reset();
            self.set_error(Some(VALIDATION_MESSAGE));
            return SubmitOutcome::Invalid(e);
        }

        let Some(claim) = self.request.try_begin() else {
            debug!("Calculation already in flight, dropping submit");
            return SubmitOutcome::Ignored;
        };
        self.set_error(None);

        info!("Submitting tax calculation");
        match self.api.calculate(&inputs).await {
            Ok(response) => {
                if !response.success {
                    debug!(message = %response.message, "Service reported success=false");
                }
                if let Err(e) = self.session.set(response.user_id.clone()).await {
                    warn!(error = %e, "Failed to persist session id");
                }
                info!(session_id = %response.user_id, "Tax calculation succeeded");
                claim.succeed();
                SubmitOutcome::Calculated(response.tax_calculation)
            }
            Err(e) => {
                error!(
                    error = %e,
                    request_failure = e.is_request_failure(),
                    "Tax calculation failed"
                );
                self.set_error(Some(CALCULATION_FAILED_MESSAGE));
                claim.fail();
                SubmitOutcome::Failed
            }
        }
    }
}
