pub mod api;
pub mod assistant;
pub mod calculation;
pub mod charts;
pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod request;
pub mod session;
pub mod storage;
pub mod transcript;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use api::{HttpTaxApi, TaxApi};
pub use assistant::TaxAssistant;
pub use calculation::{CalculationFlow, CalculationState, SubmitOutcome};
pub use charts::{BarSeries, ChartSeries, DonutSeries, SummaryValue, derive_charts, summary_cards};
pub use chat::{ChatSession, SendOutcome};
pub use config::{ClientConfig, ValidationPolicy};
pub use error::{FlowError, Result, ValidationError};
pub use models::{CalculationResponse, CalculationResult, ChatRequest, ChatResponse, TaxInputs};
pub use request::RequestState;
pub use session::SessionStore;
pub use storage::{FileKeyValueStorage, InMemoryKeyValueStorage, KeyValueStorage};
pub use transcript::{ChatMessage, MessageRole};
