//! Upstream endpoints and query construction
//!
//! Pure functions turning search filters into Adzuna endpoint paths and query
//! parameters. Nothing here touches the network.

use crate::api::http::QueryParams;
use crate::country::Country;
use crate::error::{AdzunaError, AdzunaResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_RESULTS_PER_PAGE: u32 = 10;
pub const MAX_RESULTS_PER_PAGE: u32 = 50;
pub const DEFAULT_HISTORY_MONTHS: u32 = 12;
pub const MAX_HISTORY_MONTHS: u32 = 24;

/// Fixed set of Adzuna endpoints this server calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search { country: Country, page: u32 },
    Categories(Country),
    Histogram(Country),
    TopCompanies(Country),
    Geodata(Country),
    History(Country),
    Version,
}

impl Endpoint {
    /// Path relative to the API root
    pub fn path(&self) -> String {
        match self {
            Endpoint::Search { country, page } => format!("jobs/{country}/search/{page}"),
            Endpoint::Categories(country) => format!("jobs/{country}/categories"),
            Endpoint::Histogram(country) => format!("jobs/{country}/histogram"),
            Endpoint::TopCompanies(country) => format!("jobs/{country}/top_companies"),
            Endpoint::Geodata(country) => format!("jobs/{country}/geodata"),
            Endpoint::History(country) => format!("jobs/{country}/history"),
            Endpoint::Version => "version".to_string(),
        }
    }

    /// Whether Adzuna requires app credentials for this endpoint
    pub fn requires_credentials(&self) -> bool {
        !matches!(self, Endpoint::Version)
    }
}

/// Result ordering accepted by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Date,
    Salary,
    Relevance,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Date => "date",
            SortBy::Salary => "salary",
            SortBy::Relevance => "relevance",
        }
    }
}

/// Optional narrowing for a paginated job search.
///
/// No cross-field checks are made: a `salary_min` above `salary_max` is sent
/// as given and Adzuna decides what it means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub keywords: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "whole_number")]
    pub results_per_page: Option<u32>,
    #[serde(default, deserialize_with = "whole_number")]
    pub salary_min: Option<u64>,
    #[serde(default, deserialize_with = "whole_number")]
    pub salary_max: Option<u64>,
    pub full_time: Option<bool>,
    pub part_time: Option<bool>,
    pub contract: Option<bool>,
    pub permanent: Option<bool>,
    pub category: Option<String>,
    pub sort_by: Option<SortBy>,
    #[serde(default, deserialize_with = "whole_number")]
    pub max_days_old: Option<u32>,
}

impl SearchFilter {
    /// Effective page number; pages start at 1
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    /// Reject values Adzuna could only answer with an error.
    ///
    /// Page sizes are clamped rather than rejected, see `results_per_page`.
    pub fn validate(&self) -> AdzunaResult<()> {
        if self.page == Some(0) {
            return Err(AdzunaError::invalid_parameter(
                "page",
                "pages are numbered from 1",
            ));
        }
        Ok(())
    }

    /// Effective page size, clamped to what Adzuna accepts
    pub fn results_per_page(&self) -> u32 {
        self.results_per_page
            .unwrap_or(DEFAULT_RESULTS_PER_PAGE)
            .clamp(1, MAX_RESULTS_PER_PAGE)
    }

    /// Build the query string for the search endpoint (pure function)
    pub fn to_query(&self) -> QueryParams {
        let mut params = vec![(
            "results_per_page".to_string(),
            self.results_per_page().to_string(),
        )];

        push_text(&mut params, "what", self.keywords.as_deref());
        push_text(&mut params, "where", self.location.as_deref());
        push_positive(&mut params, "salary_min", self.salary_min);
        push_positive(&mut params, "salary_max", self.salary_max);
        push_flag(&mut params, "full_time", self.full_time);
        push_flag(&mut params, "part_time", self.part_time);
        push_flag(&mut params, "contract", self.contract);
        push_flag(&mut params, "permanent", self.permanent);
        push_text(&mut params, "category", self.category.as_deref());
        if let Some(sort_by) = self.sort_by {
            params.push(("sort_by".to_string(), sort_by.as_str().to_string()));
        }
        push_positive(&mut params, "max_days_old", self.max_days_old.map(u64::from));

        params
    }
}

/// Keyword, location and category narrowing shared by the market data endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketFilter {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
}

impl MarketFilter {
    /// Build the query string for aggregate endpoints (pure function)
    pub fn to_query(&self) -> QueryParams {
        let mut params = Vec::new();
        push_text(&mut params, "what", self.keywords.as_deref());
        push_text(&mut params, "where", self.location.as_deref());
        push_text(&mut params, "category", self.category.as_deref());
        params
    }
}

/// Market filter plus the length of the salary time series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryFilter {
    #[serde(flatten)]
    pub market: MarketFilter,
    #[serde(default, deserialize_with = "whole_number")]
    pub months: Option<u32>,
}

impl HistoryFilter {
    /// Effective number of months, clamped to the range Adzuna serves
    pub fn months(&self) -> u32 {
        self.months
            .unwrap_or(DEFAULT_HISTORY_MONTHS)
            .clamp(1, MAX_HISTORY_MONTHS)
    }

    pub fn to_query(&self) -> QueryParams {
        let mut params = self.market.to_query();
        params.push(("months".to_string(), self.months().to_string()));
        params
    }
}

/// Accept integral JSON numbers in either form, so `10.0` reads as `10`
fn whole_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let whole = number
        .as_u64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u64::MAX as f64)
                .map(|v| v as u64)
        })
        .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {number}")))?;

    T::try_from(whole)
        .map(Some)
        .map_err(|_| D::Error::custom(format!("{whole} is out of range")))
}

/// Add a text parameter unless it is absent or blank
fn push_text(params: &mut QueryParams, name: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        params.push((name.to_string(), value.to_string()));
    }
}

/// Add a numeric parameter unless it is absent or zero
fn push_positive(params: &mut QueryParams, name: &str, value: Option<u64>) {
    if let Some(value) = value.filter(|v| *v > 0) {
        params.push((name.to_string(), value.to_string()));
    }
}

/// Adzuna job-type flags are sent as "1" and only when set
fn push_flag(params: &mut QueryParams, name: &str, value: Option<bool>) {
    if value == Some(true) {
        params.push((name.to_string(), "1".to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a QueryParams, name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(
            Endpoint::Search {
                country: Country::Us,
                page: 5
            }
            .path(),
            "jobs/us/search/5"
        );
        assert_eq!(Endpoint::Categories(Country::De).path(), "jobs/de/categories");
        assert_eq!(Endpoint::Histogram(Country::Fr).path(), "jobs/fr/histogram");
        assert_eq!(
            Endpoint::TopCompanies(Country::Gb).path(),
            "jobs/gb/top_companies"
        );
        assert_eq!(Endpoint::Geodata(Country::Au).path(), "jobs/au/geodata");
        assert_eq!(Endpoint::History(Country::Za).path(), "jobs/za/history");
        assert_eq!(Endpoint::Version.path(), "version");
    }

    #[test]
    fn test_only_version_skips_credentials() {
        assert!(!Endpoint::Version.requires_credentials());
        assert!(Endpoint::Categories(Country::Gb).requires_credentials());
    }

    #[test]
    fn test_default_search_query() {
        let filter = SearchFilter::default();
        assert_eq!(filter.page(), 1);
        assert_eq!(
            filter.to_query(),
            vec![("results_per_page".to_string(), "10".to_string())]
        );
    }

    #[test]
    fn test_results_per_page_is_clamped() {
        let filter = SearchFilter {
            results_per_page: Some(200),
            ..Default::default()
        };
        assert_eq!(filter.results_per_page(), 50);
        assert_eq!(param(&filter.to_query(), "results_per_page"), Some("50"));

        let filter = SearchFilter {
            results_per_page: Some(0),
            ..Default::default()
        };
        assert_eq!(filter.results_per_page(), 1);

        let filter = SearchFilter {
            results_per_page: Some(50),
            ..Default::default()
        };
        assert_eq!(filter.results_per_page(), 50);
    }

    #[test]
    fn test_page_zero_is_rejected() {
        let filter = SearchFilter {
            page: Some(0),
            ..Default::default()
        };
        let err = filter.validate().unwrap_err();
        assert!(matches!(err, AdzunaError::InvalidParameter { ref name, .. } if name == "page"));
        assert!(SearchFilter::default().validate().is_ok());
    }

    #[test]
    fn test_full_search_query() {
        let filter = SearchFilter {
            keywords: Some("python developer".to_string()),
            location: Some("London".to_string()),
            page: Some(2),
            results_per_page: Some(20),
            salary_min: Some(50000),
            salary_max: Some(90000),
            full_time: Some(true),
            part_time: Some(false),
            contract: None,
            permanent: Some(true),
            category: Some("it-jobs".to_string()),
            sort_by: Some(SortBy::Salary),
            max_days_old: Some(7),
        };

        let params = filter.to_query();
        assert_eq!(param(&params, "what"), Some("python developer"));
        assert_eq!(param(&params, "where"), Some("London"));
        assert_eq!(param(&params, "results_per_page"), Some("20"));
        assert_eq!(param(&params, "salary_min"), Some("50000"));
        assert_eq!(param(&params, "salary_max"), Some("90000"));
        assert_eq!(param(&params, "full_time"), Some("1"));
        assert_eq!(param(&params, "part_time"), None);
        assert_eq!(param(&params, "contract"), None);
        assert_eq!(param(&params, "permanent"), Some("1"));
        assert_eq!(param(&params, "category"), Some("it-jobs"));
        assert_eq!(param(&params, "sort_by"), Some("salary"));
        assert_eq!(param(&params, "max_days_old"), Some("7"));
        // page travels in the path, not the query
        assert_eq!(param(&params, "page"), None);
    }

    #[test]
    fn test_salary_bounds_are_not_cross_validated() {
        let filter = SearchFilter {
            salary_min: Some(100000),
            salary_max: Some(20000),
            ..Default::default()
        };
        let params = filter.to_query();
        assert_eq!(param(&params, "salary_min"), Some("100000"));
        assert_eq!(param(&params, "salary_max"), Some("20000"));
    }

    #[test]
    fn test_blank_and_zero_values_are_omitted() {
        let filter = SearchFilter {
            keywords: Some("   ".to_string()),
            location: Some(String::new()),
            salary_min: Some(0),
            max_days_old: Some(0),
            ..Default::default()
        };
        assert_eq!(filter.to_query().len(), 1);
    }

    #[test]
    fn test_text_values_are_trimmed() {
        let filter = MarketFilter {
            keywords: Some("  data scientist ".to_string()),
            location: None,
            category: Some("it-jobs".to_string()),
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("what".to_string(), "data scientist".to_string()),
                ("category".to_string(), "it-jobs".to_string()),
            ]
        );
    }

    #[test]
    fn test_history_months_default_and_cap() {
        let filter = HistoryFilter::default();
        assert_eq!(filter.months(), 12);
        assert_eq!(param(&filter.to_query(), "months"), Some("12"));

        let filter = HistoryFilter {
            months: Some(60),
            ..Default::default()
        };
        assert_eq!(filter.months(), 24);

        let filter = HistoryFilter {
            months: Some(0),
            ..Default::default()
        };
        assert_eq!(filter.months(), 1);
    }

    #[test]
    fn test_filters_deserialize_from_tool_arguments() {
        let filter: SearchFilter = serde_json::from_value(serde_json::json!({
            "keywords": "rust",
            "sort_by": "date",
            "full_time": true
        }))
        .unwrap();
        assert_eq!(filter.keywords.as_deref(), Some("rust"));
        assert_eq!(filter.sort_by, Some(SortBy::Date));
        assert_eq!(filter.full_time, Some(true));

        let history: HistoryFilter = serde_json::from_value(serde_json::json!({
            "keywords": "nurse",
            "months": 6
        }))
        .unwrap();
        assert_eq!(history.market.keywords.as_deref(), Some("nurse"));
        assert_eq!(history.months, Some(6));
    }

    #[test]
    fn test_integral_floats_are_accepted() {
        let filter: SearchFilter = serde_json::from_value(serde_json::json!({
            "page": 2.0,
            "results_per_page": 10.0,
            "salary_min": 45000.0,
            "max_days_old": 7
        }))
        .unwrap();
        assert_eq!(filter.page, Some(2));
        assert_eq!(filter.results_per_page, Some(10));
        assert_eq!(filter.salary_min, Some(45000));
        assert_eq!(filter.max_days_old, Some(7));
        assert_eq!(filter.salary_max, None);

        let history: HistoryFilter =
            serde_json::from_value(serde_json::json!({"months": 6.0, "keywords": "nurse"}))
                .unwrap();
        assert_eq!(history.months, Some(6));
        assert_eq!(history.market.keywords.as_deref(), Some("nurse"));
    }

    #[test]
    fn test_fractional_and_out_of_range_numbers_are_rejected() {
        let result = serde_json::from_value::<SearchFilter>(serde_json::json!({"page": 2.5}));
        assert!(result.is_err());

        let result =
            serde_json::from_value::<SearchFilter>(serde_json::json!({"page": 5_000_000_000u64}));
        assert!(result.is_err());

        let result = serde_json::from_value::<SearchFilter>(serde_json::json!({"page": null}));
        assert_eq!(result.unwrap().page, None);
    }
}
