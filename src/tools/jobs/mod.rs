//! Adzuna job market tools
//!
//! One tool per adapter operation. Each tool owns a shared [`AdzunaClient`],
//! turns its validated arguments into a typed filter, and serializes the
//! shaped result back to JSON.

pub mod categories;
pub mod market;
pub mod search;
pub mod version;

pub use categories::CategoriesTool;
pub use market::{GeodataTool, SalaryHistogramTool, SalaryHistoryTool, TopCompaniesTool};
pub use search::SearchJobsTool;
pub use version::ApiVersionTool;

use crate::country::Country;
use crate::error::AdzunaResult;
use crate::tools::ToolError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Arguments shared by every market-scoped tool: a country plus its filter
#[derive(Debug, Deserialize)]
pub(crate) struct CountryArgs<F> {
    pub country: String,
    #[serde(flatten)]
    pub filter: F,
}

/// Deserialize schema-validated arguments into their typed form
pub(crate) fn parse_args<T: DeserializeOwned>(
    tool: &str,
    parameters: &Value,
) -> Result<T, ToolError> {
    serde_json::from_value(parameters.clone())
        .map_err(|e| ToolError::ValidationError(format!("Invalid arguments for {tool}: {e}")))
}

/// Convert an adapter result into tool output
pub(crate) fn to_output<T: Serialize>(
    tool: &'static str,
    result: AdzunaResult<T>,
) -> Result<Value, ToolError> {
    let shaped = result.map_err(|source| ToolError::Api { tool, source })?;
    serde_json::to_value(shaped)
        .map_err(|e| ToolError::ExecutionError(format!("{tool}: failed to serialize result: {e}")))
}

/// Schema fragment for the `country` argument
pub(crate) fn country_property(purpose: &str) -> Value {
    json!({
        "type": "string",
        "description": format!(
            "ISO 3166-1 alpha-2 country code. {purpose} Supported: {}",
            Country::supported_codes()
        )
    })
}

/// Schema fragments for the keyword, location and category filters
pub(crate) fn market_properties(location_hint: &str) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "keywords".to_string(),
        json!({
            "type": "string",
            "description": "Search terms to filter jobs (e.g., \"software engineer\", \"data scientist\")."
        }),
    );
    properties.insert(
        "location".to_string(),
        json!({
            "type": "string",
            "description": location_hint
        }),
    );
    properties.insert(
        "category".to_string(),
        json!({
            "type": "string",
            "description": "Category tag from get_categories (e.g., \"it-jobs\")."
        }),
    );
    properties
}

/// Closed object schema requiring `country`
pub(crate) fn object_schema(properties: Map<String, Value>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": ["country"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::{HistoryFilter, MarketFilter};
    use crate::error::AdzunaError;

    #[test]
    fn test_parse_flattened_market_args() {
        let args: CountryArgs<MarketFilter> = parse_args(
            "get_geodata",
            &json!({"country": "gb", "keywords": "nurse", "category": "healthcare-nursing-jobs"}),
        )
        .unwrap();
        assert_eq!(args.country, "gb");
        assert_eq!(args.filter.keywords.as_deref(), Some("nurse"));
        assert!(args.filter.location.is_none());
    }

    #[test]
    fn test_parse_nested_history_args() {
        let args: CountryArgs<HistoryFilter> = parse_args(
            "get_salary_history",
            &json!({"country": "de", "location": "Berlin", "months": 6}),
        )
        .unwrap();
        assert_eq!(args.filter.market.location.as_deref(), Some("Berlin"));
        assert_eq!(args.filter.months, Some(6));
    }

    #[test]
    fn test_parse_args_rejects_wrong_shape() {
        let err = parse_args::<CountryArgs<MarketFilter>>("get_geodata", &json!({"keywords": "x"}))
            .unwrap_err();
        assert!(matches!(err, ToolError::ValidationError(_)));
        assert!(err.to_string().contains("get_geodata"));
    }

    #[test]
    fn test_to_output_wraps_adapter_errors() {
        let err = to_output::<Value>(
            "get_top_companies",
            Err(AdzunaError::malformed("expected value")),
        )
        .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("get_top_companies failed (upstream error)"));
    }

    #[test]
    fn test_country_property_lists_codes() {
        let property = country_property("Determines currency.");
        let description = property["description"].as_str().unwrap();
        assert!(description.contains("Determines currency."));
        assert!(description.contains("gb, us, de"));
    }
}
