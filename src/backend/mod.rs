//! HTTP access to the workflow backend.
//!
//! Every call is a JSON `POST` against the configured base address. There is
//! no retry and no timeout: a request runs until the backend answers or the
//! connection fails.

use crate::config::BackendConfig;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

mod wire;

pub use wire::BodyFormat;
use wire::{BasicLlmReply, InitReply, StepReply};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    body_format: BodyFormat,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            body_format: config.body_format,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn body_format(&self) -> BodyFormat {
        self.body_format
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn post(&self, segments: &[&str], body: Option<&Value>) -> Result<Value, BackendError> {
        let url = self.endpoint(segments);
        debug!(%url, has_body = body.is_some(), "POST");

        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn basic_llm(&self, prompt: &str) -> Result<BasicLlmReply, BackendError> {
        let body = self.body_format.prompt_body(prompt);
        let value = self.post(&["basic-llm"], Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn init_workflow(&self, problem: &str) -> Result<InitReply, BackendError> {
        let body = self.body_format.problem_body(problem);
        let value = self.post(&["init"], Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn step_workflow(&self, workflow_id: &str) -> Result<StepReply, BackendError> {
        let body = self.body_format.step_body();
        let value = self.post(&["step", workflow_id], body.as_ref()).await?;
        Ok(serde_json::from_value(value)?)
    }
}
