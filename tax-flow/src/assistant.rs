//! `TaxAssistant` wires the client together once at startup.
//!
//! A single [`SessionStore`] is loaded from storage and shared by the
//! calculation flow (which writes it) and the chat session (which reads it
//! to gate and correlate turns). Nothing else holds the storage handle.
//!
//! ```rust,no_run
//! # async fn demo() -> tax_flow::Result<()> {
//! use tax_flow::{ClientConfig, TaxAssistant};
//!
//! let config = ClientConfig::from_env()?;
//! let assistant = TaxAssistant::connect(&config).await?;
//! println!("chat unlocked: {}", assistant.chat().is_unlocked());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use tracing::info;

use crate::{
    api::{HttpTaxApi, TaxApi},
    calculation::CalculationFlow,
    chat::ChatSession,
    config::{ClientConfig, ValidationPolicy},
    error::Result,
    session::SessionStore,
    storage::{FileKeyValueStorage, KeyValueStorage},
};

pub struct TaxAssistant {
    session: Arc<SessionStore>,
    calculation: CalculationFlow,
    chat: ChatSession,
}

impl TaxAssistant {
    /// Build the HTTP client and file-backed session storage described by `config`.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let api = Arc::new(HttpTaxApi::new(config.api_base.clone())?);
        let storage = Arc::new(FileKeyValueStorage::new(config.session_file.clone()));
        info!(
            api_base = %config.api_base,
            session_file = %config.session_file.display(),
            "Starting tax client"
        );
        Ok(Self::with_parts(api, storage, config.validation).await)
    }

    /// Assemble from any API and storage implementation.
    pub async fn with_parts(
        api: Arc<dyn TaxApi>,
        storage: Arc<dyn KeyValueStorage>,
        validation: ValidationPolicy,
    ) -> Self {
        let session = Arc::new(SessionStore::load(storage).await);
        Self {
            calculation: CalculationFlow::new(api.clone(), session.clone(), validation),
            chat: ChatSession::new(api, session.clone()),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn calculation(&self) -> &CalculationFlow {
        &self.calculation
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }
}
