//! Shared helpers for onboarding-client integration tests.
//!
//! Each remote service gets its own `wiremock` server so a test can break one
//! service without touching the others.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use onboarding_client::config::{ClientConfig, ServiceEndpoints};

/// The literal request from the end-to-end scenario.
pub const SARAH_REQUEST: &str = "Onboard Sarah Johnson, Senior Software Engineer, Engineering, \
     sarah.johnson@techcorp.com, starts 2024-03-01, needs a MacBook Pro and monitor";

/// One mock server per remote service.
pub struct FabricMocks {
    pub broker: MockServer,
    pub employee: MockServer,
    pub assets: MockServer,
    pub notifications: MockServer,
}

impl FabricMocks {
    pub async fn start() -> Self {
        Self {
            broker: MockServer::start().await,
            employee: MockServer::start().await,
            assets: MockServer::start().await,
            notifications: MockServer::start().await,
        }
    }

    pub fn endpoints(&self) -> ServiceEndpoints {
        ServiceEndpoints {
            broker_url: self.broker.uri(),
            employee_url: self.employee.uri(),
            assets_url: self.assets.uri(),
            notifications_url: self.notifications.uri(),
        }
    }

    /// Default timings with the mock endpoints.
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.profile = "test".to_string();
        config.services = self.endpoints();
        config
    }

    /// Every service answers `/health` with 200.
    pub async fn mount_all_healthy(&self) {
        for server in [&self.employee, &self.assets, &self.notifications] {
            mount_health(server, 200, json!({"status": "UP"})).await;
        }
        mount_health(
            &self.broker,
            200,
            json!({"status": "UP", "orchestrationEnabled": true}),
        )
        .await;
    }

    /// Every tool endpoint answers 200.
    pub async fn mount_all_tools_ok(&self) {
        mount_tool(&self.employee, "create-employee", 200, json!({"success": true})).await;
        mount_tool(&self.assets, "allocate-assets", 200, json!({"success": true})).await;
        mount_tool(
            &self.notifications,
            "test-email-config",
            200,
            json!({"success": true}),
        )
        .await;
    }
}

pub async fn mount_health(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_tool(server: &MockServer, tool: &str, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/mcp/tools/{tool}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Structured record the model is expected to produce for [`SARAH_REQUEST`].
pub fn sarah_record() -> Value {
    json!({
        "firstName": "Sarah",
        "lastName": "Johnson",
        "email": "sarah.johnson@techcorp.com",
        "department": "Engineering",
        "position": "Senior Software Engineer",
        "startDate": "2024-03-01",
        "assets": [
            {"category": "laptop", "specifications": "MacBook Pro"},
            {"category": "monitor"}
        ]
    })
}

/// OpenAI-style completion body whose answer is `content`.
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "llama3-8b-8192",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

/// The Sarah record wrapped in a json code fence, as models like to do.
pub fn fenced_sarah_answer() -> String {
    format!(
        "```json\n{}\n```",
        serde_json::to_string_pretty(&sarah_record()).unwrap()
    )
}
