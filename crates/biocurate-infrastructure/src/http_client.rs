//! HTTP implementation of [`DiscoveryApi`] against the discovery backend.

use crate::config::ApiConfig;
use async_trait::async_trait;
use biocurate_core::catalog::CatalogEntry;
use biocurate_core::error::{CurateError, Result};
use biocurate_core::parameters::QueryParameters;
use biocurate_core::session::{
    CreateSessionRequest, DiscoveryApi, PromotionRequest, PromotionResult, Session, SessionScope,
    TestRunRequest, TestRunResult,
};
use biocurate_core::settings::PromotionConfig;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_PREFIX: &str = "/data-discovery";

#[derive(Debug, Serialize, Deserialize)]
struct SelectionBody {
    source_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SelectionResponse {
    selected_sources: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ParametersBody<'a> {
    parameters: &'a QueryParameters,
}

#[derive(Debug, Serialize)]
struct TestBody<'a> {
    source_id: &'a str,
    parameters: &'a QueryParameters,
}

#[derive(Debug, Serialize)]
struct PromoteBody<'a> {
    research_space_id: &'a str,
    source_config: &'a PromotionConfig,
}

/// Discovery backend client over JSON/HTTP.
pub struct HttpDiscoveryApi {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    timeout: Duration,
}

impl HttpDiscoveryApi {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            timeout: config.timeout(),
        }
    }

    /// Uses an existing client (shared connection pool).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .timeout(self.timeout);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(transport_error)?;
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CurateError::Serialization {
                format: "json".to_string(),
                message: e.to_string(),
            })
    }
}

/// Maps a failure to reach the server to a status-less remote error.
fn transport_error(err: reqwest::Error) -> CurateError {
    tracing::warn!("[HttpDiscoveryApi] Request failed: {}", err);
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };
    CurateError::network(message)
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

fn status_error(status: StatusCode, body: &str) -> CurateError {
    let message = extract_detail(body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    tracing::warn!("[HttpDiscoveryApi] Server answered {}: {}", status, message);
    CurateError::remote(status.as_u16(), message)
}

/// Pulls the `detail` (or `message`) field out of a JSON error body.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
}

#[async_trait]
impl DiscoveryApi for HttpDiscoveryApi {
    async fn list_catalog(&self) -> Result<Vec<CatalogEntry>> {
        self.send(self.request(Method::GET, "/catalog")).await
    }

    async fn list_sessions(&self, scope: &SessionScope) -> Result<Vec<Session>> {
        let mut builder = self.request(Method::GET, "/sessions");
        if let Some(space_id) = &scope.space_id {
            builder = builder.query(&[("space_id", space_id)]);
        }
        self.send(builder).await
    }

    async fn create_session(&self, request: &CreateSessionRequest) -> Result<Session> {
        self.send(self.request(Method::POST, "/sessions").json(request))
            .await
    }

    async fn toggle_source(&self, session_id: &str, source_id: &str) -> Result<Vec<String>> {
        let path = format!("/sessions/{session_id}/sources/{source_id}/toggle");
        let response: SelectionResponse = self.send(self.request(Method::POST, &path)).await?;
        Ok(response.selected_sources)
    }

    async fn set_selection(&self, session_id: &str, source_ids: &[String]) -> Result<Vec<String>> {
        let path = format!("/sessions/{session_id}/selection");
        let body = SelectionBody {
            source_ids: source_ids.to_vec(),
        };
        let response: SelectionResponse = self
            .send(self.request(Method::PUT, &path).json(&body))
            .await?;
        Ok(response.selected_sources)
    }

    async fn update_parameters(
        &self,
        session_id: &str,
        parameters: &QueryParameters,
    ) -> Result<Session> {
        let path = format!("/sessions/{session_id}/parameters");
        self.send(
            self.request(Method::PUT, &path)
                .json(&ParametersBody { parameters }),
        )
        .await
    }

    async fn execute_test(&self, request: &TestRunRequest) -> Result<TestRunResult> {
        let path = format!("/sessions/{}/tests", request.session_id);
        let body = TestBody {
            source_id: &request.source_id,
            parameters: &request.parameters,
        };
        self.send(self.request(Method::POST, &path).json(&body))
            .await
    }

    async fn promote_to_space(&self, request: &PromotionRequest) -> Result<PromotionResult> {
        let path = format!(
            "/sessions/{}/sources/{}/promote",
            request.session_id, request.source_id
        );
        let body = PromoteBody {
            research_space_id: &request.space_id,
            source_config: &request.config,
        };
        self.send(self.request(Method::POST, &path).json(&body))
            .await
    }
}
