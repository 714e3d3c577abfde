//! Adzuna API version

use super::to_output;
use crate::api::AdzunaClient;
use crate::tools::{Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

const NAME: &str = "get_api_version";

pub struct ApiVersionTool {
    client: Arc<AdzunaClient>,
}

impl ApiVersionTool {
    pub fn new(client: Arc<AdzunaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ApiVersionTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: NAME.to_string(),
            description: "Get the current Adzuna API version information.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, _parameters: &Value) -> Result<Value, ToolError> {
        to_output(NAME, self.client.get_api_version().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientSettings;
    use crate::testing::MockHttpTransport;

    #[tokio::test]
    async fn test_version_passes_through() {
        let transport = Arc::new(MockHttpTransport::with_json(
            200,
            json!({"api_version": 1, "software_version": "2.9.1"}),
        ));
        let client = AdzunaClient::with_transport(ClientSettings::default(), None, transport);

        let output = ApiVersionTool::new(Arc::new(client))
            .execute(&json!({}))
            .await
            .unwrap();

        assert_eq!(output, json!({"api_version": 1, "software_version": "2.9.1"}));
    }
}
