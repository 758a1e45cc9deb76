use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{FlowError, Result};
use crate::models::{CalculationResponse, ChatRequest, ChatResponse, TaxInputs};

pub const CALCULATE_PATH: &str = "/tax/calculate";
pub const CHAT_PATH: &str = "/chat/";

/// The remote calculation and assistant services.
#[async_trait]
pub trait TaxApi: Send + Sync {
    /// `POST {api_base}/tax/calculate`
    async fn calculate(&self, inputs: &TaxInputs) -> Result<CalculationResponse>;

    /// `POST {api_base}/chat/`
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

/// [`TaxApi`] over HTTP.
///
/// The client keeps a cookie store, so credentials set by the service on one
/// call ride along on every later call.
#[derive(Debug, Clone)]
pub struct HttpTaxApi {
    client: Client,
    api_base: String,
}

impl HttpTaxApi {
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(client, api_base))
    }

    pub fn with_client(client: Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { client, api_base }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.api_base, path);
        debug!(%url, "POST");

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FlowError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| FlowError::Decode(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl TaxApi for HttpTaxApi {
    async fn calculate(&self, inputs: &TaxInputs) -> Result<CalculationResponse> {
        self.post_json(CALCULATE_PATH, inputs).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.post_json(CHAT_PATH, request).await
    }
}
