//! Aggregate labour market data: salary distribution, top employers,
//! regional breakdown and salary trend.
//!
//! All four tools take the same keyword, location and category narrowing.
//! Salary figures are annual amounts in the country's currency.

use super::{
    country_property, market_properties, object_schema, parse_args, to_output, CountryArgs,
};
use crate::api::query::{HistoryFilter, MarketFilter};
use crate::api::AdzunaClient;
use crate::tools::{Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

const HISTOGRAM: &str = "get_salary_histogram";
const TOP_COMPANIES: &str = "get_top_companies";
const GEODATA: &str = "get_geodata";
const HISTORY: &str = "get_salary_history";

fn market_schema(country_purpose: &str, location_hint: &str) -> Value {
    let mut properties = market_properties(location_hint);
    properties.insert("country".to_string(), country_property(country_purpose));
    object_schema(properties)
}

/// Salary distribution for matching jobs
pub struct SalaryHistogramTool {
    client: Arc<AdzunaClient>,
}

impl SalaryHistogramTool {
    pub fn new(client: Arc<AdzunaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SalaryHistogramTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: HISTOGRAM.to_string(),
            description: "Get the salary distribution for jobs matching the search criteria. \
Useful for typical salary questions, negotiation research and market positioning. \
Only jobs WITH listed salaries are counted. Keys are the lower bound of each \
ANNUAL salary bucket in LOCAL CURRENCY, values are job counts."
                .to_string(),
            parameters: market_schema(
                "Determines currency.",
                "Location filter (e.g., \"London\", \"New York\").",
            ),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let args: CountryArgs<MarketFilter> = parse_args(HISTOGRAM, parameters)?;
        to_output(
            HISTOGRAM,
            self.client
                .get_salary_histogram(&args.country, &args.filter)
                .await,
        )
    }
}

/// Employers ranked by open positions
pub struct TopCompaniesTool {
    client: Arc<AdzunaClient>,
}

impl TopCompaniesTool {
    pub fn new(client: Arc<AdzunaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for TopCompaniesTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: TOP_COMPANIES.to_string(),
            description: "Get the top employers currently hiring, ranked by number of open positions. \
Shows hiring VOLUME, not company quality. Each entry has the company name, its \
open position count and, when known, the average ANNUAL salary in LOCAL CURRENCY."
                .to_string(),
            parameters: market_schema(
                "Selects the job market.",
                "Location filter (e.g., \"London\" for London-based employers).",
            ),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let args: CountryArgs<MarketFilter> = parse_args(TOP_COMPANIES, parameters)?;
        to_output(
            TOP_COMPANIES,
            self.client
                .get_top_companies(&args.country, &args.filter)
                .await,
        )
    }
}

/// Job counts and salaries per region
pub struct GeodataTool {
    client: Arc<AdzunaClient>,
}

impl GeodataTool {
    pub fn new(client: Arc<AdzunaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GeodataTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: GEODATA.to_string(),
            description: "Get job counts and average salaries broken down by geographic region. \
Useful for finding the highest paying areas, where the opportunities are, and \
relocation decisions. Regions come ordered by job count; average_salary is \
ANNUAL in LOCAL CURRENCY."
                .to_string(),
            parameters: market_schema(
                "Selects the job market.",
                "Focus on a region for a sub-area breakdown. Empty gives the national \
breakdown; \"London\" breaks down areas within London.",
            ),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let args: CountryArgs<MarketFilter> = parse_args(GEODATA, parameters)?;
        to_output(
            GEODATA,
            self.client.get_geodata(&args.country, &args.filter).await,
        )
    }
}

/// Average salary per month
pub struct SalaryHistoryTool {
    client: Arc<AdzunaClient>,
}

impl SalaryHistoryTool {
    pub fn new(client: Arc<AdzunaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SalaryHistoryTool {
    fn describe(&self) -> ToolDescription {
        let mut properties = market_properties("Location filter (e.g., \"London\").");
        properties.insert(
            "country".to_string(),
            country_property("Determines currency."),
        );
        properties.insert(
            "months".to_string(),
            json!({
                "type": "integer",
                "minimum": 0,
                "default": 12,
                "description": "Months of history (default 12, max 24; larger values are capped). \
6 for a recent trend, 12 for year-over-year, 24 for a longer view."
            }),
        );

        ToolDescription {
            name: HISTORY.to_string(),
            description: "Get the historical salary trend for matching jobs. \
Returns the average ANNUAL salary in LOCAL CURRENCY keyed by month (YYYY-MM). \
Compare first and last months for the overall change."
                .to_string(),
            parameters: object_schema(properties),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let args: CountryArgs<HistoryFilter> = parse_args(HISTORY, parameters)?;
        to_output(
            HISTORY,
            self.client
                .get_salary_history(&args.country, &args.filter)
                .await,
        )
    }
}
