//! # MCP Service Client
//!
//! Thin REST client for one remote onboarding service. Every call carries its
//! own timeout so the caller decides how long a step may block: health probes,
//! tool calls and full orchestration have very different budgets.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ServiceEndpoints;
use crate::error::{ClientError, ClientResult};

pub const HEALTH_PATH: &str = "/health";
pub const TOOLS_PREFIX: &str = "/mcp/tools";

/// Raw outcome of a call that reached the service.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ServiceResponse {
    /// Only a literal 200 counts as success for these services.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> ClientResult<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Require a 200 and a JSON body.
    pub fn into_json(self) -> ClientResult<Value> {
        if !self.is_ok() {
            return Err(ClientError::api_error(self.status.as_u16(), self.body));
        }
        self.json()
    }
}

/// Client for a single named service rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct McpServiceClient {
    name: String,
    base_url: String,
    http: Client,
}

impl McpServiceClient {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder().build()?;
        Ok(Self::with_http(name, base_url, http))
    }

    /// Build on a shared `reqwest::Client` so connection pools are reused.
    pub fn with_http(name: impl Into<String>, base_url: impl Into<String>, http: Client) -> Self {
        let base_url: String = base_url.into();
        Self {
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, HEALTH_PATH)
    }

    pub fn tool_url(&self, tool: &str) -> String {
        format!("{}{}/{}", self.base_url, TOOLS_PREFIX, tool)
    }

    /// `GET /health`.
    pub async fn health(&self, timeout: Duration) -> ClientResult<ServiceResponse> {
        let url = self.health_url();
        debug!(service = %self.name, %url, "GET health");
        let response = self.http.get(&url).timeout(timeout).send().await?;
        Self::capture(response).await
    }

    /// `POST /mcp/tools/{tool}` with a JSON body.
    pub async fn post_tool<B>(
        &self,
        tool: &str,
        body: &B,
        timeout: Duration,
    ) -> ClientResult<ServiceResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = self.tool_url(tool);
        debug!(service = %self.name, %url, "POST tool");
        let response = self
            .http
            .post(&url)
            .json(body)
            .timeout(timeout)
            .send()
            .await?;
        Self::capture(response).await
    }

    /// `POST` a tool and require a 200 JSON answer.
    pub async fn call_tool<B>(&self, tool: &str, body: &B, timeout: Duration) -> ClientResult<Value>
    where
        B: Serialize + ?Sized,
    {
        self.post_tool(tool, body, timeout).await?.into_json()
    }

    async fn capture(response: reqwest::Response) -> ClientResult<ServiceResponse> {
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), body_len = body.len(), "Service responded");
        Ok(ServiceResponse { status, body })
    }
}

/// The four services of one environment, sharing a connection pool.
#[derive(Debug, Clone)]
pub struct FabricServices {
    pub employee: McpServiceClient,
    pub assets: McpServiceClient,
    pub notifications: McpServiceClient,
    pub broker: McpServiceClient,
}

impl FabricServices {
    pub fn from_endpoints(endpoints: &ServiceEndpoints) -> ClientResult<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            employee: McpServiceClient::with_http(
                "Employee Onboarding MCP",
                &endpoints.employee_url,
                http.clone(),
            ),
            assets: McpServiceClient::with_http(
                "Asset Allocation MCP",
                &endpoints.assets_url,
                http.clone(),
            ),
            notifications: McpServiceClient::with_http(
                "Notification MCP",
                &endpoints.notifications_url,
                http.clone(),
            ),
            broker: McpServiceClient::with_http("Agent Broker", &endpoints.broker_url, http),
        })
    }

    /// Services in health-check order: the three MCP servers, then the broker.
    pub fn all(&self) -> [&McpServiceClient; 4] {
        [&self.employee, &self.assets, &self.notifications, &self.broker]
    }
}
