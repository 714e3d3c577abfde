//! Paginated job search

use super::{country_property, object_schema, parse_args, to_output, CountryArgs};
use crate::api::query::SearchFilter;
use crate::api::AdzunaClient;
use crate::tools::{Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

const NAME: &str = "search_jobs";

const DESCRIPTION: &str = "Search for jobs on Adzuna across 12 supported countries. \
IMPORTANT: All salary figures are ANNUAL amounts in LOCAL CURRENCY. \
Call get_categories(country) first to get valid category tags. \
Returns the total match count and one page of listings with title, company, location, \
a truncated description, the apply URL, posting date and salary range. \
salary_is_predicted is true when Adzuna estimated the salary rather than the employer listing it.";

pub struct SearchJobsTool {
    client: Arc<AdzunaClient>,
}

impl SearchJobsTool {
    pub fn new(client: Arc<AdzunaClient>) -> Self {
        Self { client }
    }

    fn schema() -> Value {
        let mut properties = serde_json::Map::new();
        properties.insert(
            "country".to_string(),
            country_property("Determines job market AND currency."),
        );
        properties.insert(
            "keywords".to_string(),
            json!({
                "type": "string",
                "description": "Space-separated search terms matched against job title and description. \
Terms are OR'd together, case insensitive, no boolean operators. \
Examples: \"python developer\", \"machine learning engineer\""
            }),
        );
        properties.insert(
            "location".to_string(),
            json!({
                "type": "string",
                "description": "City, region or postal code prefix, fuzzy matched (e.g., \"London\", \"SW1\", \"New York\"). \
Leave empty for a country-wide search. For remote jobs, include \"remote\" in keywords."
            }),
        );
        properties.insert(
            "page".to_string(),
            json!({
                "type": "integer",
                "minimum": 1,
                "default": 1,
                "description": "Page number, starting at 1."
            }),
        );
        properties.insert(
            "results_per_page".to_string(),
            json!({
                "type": "integer",
                "minimum": 0,
                "default": 10,
                "description": "Results per page (default 10, max 50; larger values are capped)."
            }),
        );
        properties.insert(
            "salary_min".to_string(),
            json!({
                "type": "integer",
                "minimum": 0,
                "description": "Minimum ANNUAL salary in LOCAL CURRENCY (e.g., 50000 not 50). Jobs without listed salaries are excluded."
            }),
        );
        properties.insert(
            "salary_max".to_string(),
            json!({
                "type": "integer",
                "minimum": 0,
                "description": "Maximum ANNUAL salary in LOCAL CURRENCY."
            }),
        );
        for (flag, text) in [
            ("full_time", "Only full-time jobs."),
            ("part_time", "Only part-time jobs."),
            ("contract", "Only contract or freelance jobs."),
            ("permanent", "Only permanent positions."),
        ] {
            properties.insert(
                flag.to_string(),
                json!({"type": "boolean", "description": text}),
            );
        }
        properties.insert(
            "category".to_string(),
            json!({
                "type": "string",
                "description": "Category tag from get_categories (e.g., \"it-jobs\", \"engineering-jobs\")."
            }),
        );
        properties.insert(
            "sort_by".to_string(),
            json!({
                "type": "string",
                "enum": ["date", "salary", "relevance"],
                "description": "\"date\" (newest first), \"salary\" (highest first) or \"relevance\" (default)."
            }),
        );
        properties.insert(
            "max_days_old".to_string(),
            json!({
                "type": "integer",
                "minimum": 0,
                "description": "Maximum age of listings in days (e.g., 7 for last week)."
            }),
        );
        object_schema(properties)
    }
}

#[async_trait]
impl Tool for SearchJobsTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: NAME.to_string(),
            description: DESCRIPTION.to_string(),
            parameters: Self::schema(),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let args: CountryArgs<SearchFilter> = parse_args(NAME, parameters)?;
        to_output(NAME, self.client.search_jobs(&args.country, &args.filter).await)
    }
}
