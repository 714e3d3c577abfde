//! Category tags for the search filter

use super::{country_property, object_schema, parse_args, to_output};
use crate::api::AdzunaClient;
use crate::tools::{Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const NAME: &str = "get_categories";

const DESCRIPTION: &str = "Get valid job category tags for a specific country. \
Use this BEFORE search_jobs to get valid 'category' values. Category tags are \
COUNTRY-SPECIFIC: use the same country code here as in search_jobs. \
Each entry has a tag to pass as the category filter (e.g., \"it-jobs\") and a \
human-readable label (e.g., \"IT Jobs\").";

#[derive(Debug, Deserialize)]
struct CategoriesArgs {
    country: String,
}

pub struct CategoriesTool {
    client: Arc<AdzunaClient>,
}

impl CategoriesTool {
    pub fn new(client: Arc<AdzunaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CategoriesTool {
    fn describe(&self) -> ToolDescription {
        let mut properties = serde_json::Map::new();
        properties.insert(
            "country".to_string(),
            country_property("Category tags differ per market."),
        );

        ToolDescription {
            name: NAME.to_string(),
            description: DESCRIPTION.to_string(),
            parameters: object_schema(properties),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let args: CategoriesArgs = parse_args(NAME, parameters)?;
        to_output(NAME, self.client.get_categories(&args.country).await)
    }
}
