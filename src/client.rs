//! HTTP client for a running tracker API, used by the `tracker` CLI.
//!
//! `ApiClient` also implements [`LabelStore`], so a label selection made on the
//! command line is pushed to the server through the same optimistic sync the
//! server uses against the database.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::database::models::IssueSummary;
use crate::labels::{Label, LabelStore, StoreError};
use crate::services::Page;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message} ({code}, HTTP {status})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Error envelope returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    code: String,
}

#[derive(Debug, Deserialize)]
struct SuccessBody<T> {
    data: T,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn labels(&self) -> Result<Vec<Label>, ClientError> {
        self.send(self.request(Method::GET, "/api/labels")).await
    }

    pub async fn issue_labels(&self, issue_id: i32) -> Result<Vec<Label>, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/issues/{}/labels", issue_id)))
            .await
    }

    pub async fn project_issues(&self, project_id: i32, page: Option<u32>) -> Result<Page<IssueSummary>, ClientError> {
        let mut request = self.request(Method::GET, &format!("/api/projects/{}/issues", project_id));
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }
        self.send(request).await
    }

    /// Raw `/health` body; a degraded server still answers, with 503
    pub async fn health(&self) -> Result<(StatusCode, Value), ClientError> {
        let response = self.request(Method::GET, "/health").send().await?;
        let status = response.status();
        let body = response.json::<Value>().await?;
        Ok((status, body))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!("API responded {} ({} bytes)", status, bytes.len());

        if !status.is_success() {
            return Err(match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(body) => ClientError::Api {
                    status: status.as_u16(),
                    code: body.code,
                    message: body.message,
                },
                Err(_) => ClientError::Api {
                    status: status.as_u16(),
                    code: "HTTP_ERROR".to_string(),
                    message: String::from_utf8_lossy(&bytes).into_owned(),
                },
            });
        }

        serde_json::from_slice::<SuccessBody<T>>(&bytes)
            .map(|body| body.data)
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn send_unit<B: Serialize>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ClientError> {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send::<Value>(request).await.map(|_| ())
    }
}

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(e) => StoreError::Unavailable(e.to_string()),
            ClientError::Api { status: 404, message, .. } => StoreError::NotFound(message),
            ClientError::Api { status: 503, message, .. } => StoreError::Unavailable(message),
            e => StoreError::Rejected(e.to_string()),
        }
    }
}

#[async_trait]
impl LabelStore for ApiClient {
    async fn add_issue_label(&self, issue_id: i32, label_id: i32) -> Result<(), StoreError> {
        self.send_unit(
            Method::POST,
            &format!("/api/issues/{}/labels", issue_id),
            Some(&json!({ "label_id": label_id })),
        )
        .await
        .map_err(StoreError::from)
    }

    async fn remove_issue_label(&self, issue_id: i32, label_id: i32) -> Result<(), StoreError> {
        self.send_unit::<Value>(
            Method::DELETE,
            &format!("/api/issues/{}/labels/{}", issue_id, label_id),
            None,
        )
        .await
        .map_err(StoreError::from)
    }
}
