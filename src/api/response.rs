//! Upstream payloads and the shaped results returned to tool callers
//!
//! Adzuna responses are parsed into the `*Payload` types, which tolerate missing
//! optional fields but reject bodies of the wrong shape. The `shape_*`
//! functions then select and rename the fields an assistant needs.

use crate::country::{Country, CountryContext};
use crate::error::{AdzunaError, AdzunaResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Upstream payloads
// ---------------------------------------------------------------------------

/// Adzuna sends `null` for values it has no data for; treat it like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayName {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationPayload {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub area: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPayload {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobPayload {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub company: Option<DisplayName>,
    #[serde(default)]
    pub location: Option<LocationPayload>,
    #[serde(default)]
    pub category: Option<CategoryPayload>,
    #[serde(default)]
    pub salary_min: Option<Number>,
    #[serde(default)]
    pub salary_max: Option<Number>,
    #[serde(default)]
    pub salary_is_predicted: Option<Value>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub contract_time: Option<String>,
    #[serde(default)]
    pub latitude: Option<Number>,
    #[serde(default)]
    pub longitude: Option<Number>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(default)]
    pub mean: Option<Number>,
    pub results: Vec<JobPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesPayload {
    pub results: Vec<CategoryPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistogramPayload {
    pub histogram: HashMap<String, u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyPayload {
    #[serde(default)]
    pub canonical_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(default)]
    pub average_salary: Option<Number>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopCompaniesPayload {
    pub leaderboard: Vec<CompanyPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: LocationPayload,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(default)]
    pub average_salary: Option<Number>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeodataPayload {
    pub locations: Vec<RegionPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthPoint {
    pub month: String,
    pub salary: Number,
}

/// Adzuna documents the history as a month map; older responses used a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MonthSeries {
    Map(BTreeMap<String, Number>),
    List(Vec<MonthPoint>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPayload {
    pub month: MonthSeries,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionPayload {
    pub api_version: Value,
    #[serde(default)]
    pub software_version: Option<Value>,
}

/// Parse an upstream body into its expected payload type
pub fn parse_payload<T: serde::de::DeserializeOwned>(body: &str) -> AdzunaResult<T> {
    serde_json::from_str(body).map_err(|e| AdzunaError::malformed(e.to_string()))
}

// ---------------------------------------------------------------------------
// Shaped results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub area: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<Number>,
    /// True when Adzuna estimated the salary rather than the employer listing it
    pub salary_is_predicted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSearchResults {
    pub country: CountryContext,
    /// Total matching jobs across all pages
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_salary: Option<Number>,
    pub page: u32,
    pub results_per_page: u32,
    pub results: Vec<JobSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub tag: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryList {
    pub country: CountryContext,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryHistogram {
    pub country: CountryContext,
    /// Job counts keyed by the lower bound of each annual salary bucket
    pub histogram: BTreeMap<u64, u64>,
    pub total_jobs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRanking {
    pub name: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_salary: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCompanies {
    pub country: CountryContext,
    pub companies: Vec<CompanyRanking>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub area: Vec<String>,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_salary: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geodata {
    pub country: CountryContext,
    pub regions: Vec<RegionSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryHistory {
    pub country: CountryContext,
    pub months: u32,
    /// Average advertised salary keyed by `YYYY-MM`
    pub history: BTreeMap<String, Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiVersion {
    pub api_version: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software_version: Option<Value>,
}

const UNKNOWN: &str = "Unknown";

fn id_to_string(id: Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Adzuna reports predictions as "1"/"0", occasionally as numbers or booleans
fn predicted_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => s == "1" || s.eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

fn shape_job(job: JobPayload) -> JobSummary {
    let location = job.location.unwrap_or_default();
    let category = job.category.unwrap_or_default();

    JobSummary {
        id: job.id.and_then(id_to_string),
        title: job.title.unwrap_or_else(|| UNKNOWN.to_string()),
        company: job
            .company
            .and_then(|c| c.display_name)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        location: location
            .display_name
            .unwrap_or_else(|| UNKNOWN.to_string()),
        area: location.area,
        description: job.description,
        url: job.redirect_url,
        created: job.created,
        salary_min: job.salary_min,
        salary_max: job.salary_max,
        salary_is_predicted: predicted_flag(job.salary_is_predicted.as_ref()),
        contract_type: job.contract_type,
        contract_time: job.contract_time,
        category: category.tag,
        category_label: category.label,
        latitude: job.latitude,
        longitude: job.longitude,
    }
}

pub fn shape_search(
    country: Country,
    page: u32,
    results_per_page: u32,
    payload: SearchPayload,
) -> JobSearchResults {
    JobSearchResults {
        country: country.context(),
        count: payload.count,
        mean_salary: payload.mean,
        page,
        results_per_page,
        results: payload.results.into_iter().map(shape_job).collect(),
    }
}

/// Entries without a tag are useless as a search filter and are skipped
pub fn shape_categories(country: Country, payload: CategoriesPayload) -> CategoryList {
    let categories = payload
        .results
        .into_iter()
        .filter_map(|c| {
            let tag = c.tag?;
            let label = c.label.unwrap_or_else(|| tag.clone());
            Some(Category { tag, label })
        })
        .collect();

    CategoryList {
        country: country.context(),
        categories,
    }
}

pub fn shape_histogram(
    country: Country,
    payload: HistogramPayload,
) -> AdzunaResult<SalaryHistogram> {
    let mut histogram = BTreeMap::new();
    for (bucket, count) in payload.histogram {
        let salary = parse_bucket(&bucket).ok_or_else(|| {
            AdzunaError::malformed(format!("histogram bucket '{bucket}' is not a salary"))
        })?;
        *histogram.entry(salary).or_insert(0) += count;
    }

    let total_jobs = histogram.values().sum();
    Ok(SalaryHistogram {
        country: country.context(),
        histogram,
        total_jobs,
    })
}

fn parse_bucket(bucket: &str) -> Option<u64> {
    let bucket = bucket.trim();
    bucket.parse::<u64>().ok().or_else(|| {
        bucket
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
    })
}

pub fn shape_top_companies(country: Country, payload: TopCompaniesPayload) -> TopCompanies {
    let companies = payload
        .leaderboard
        .into_iter()
        .map(|c| CompanyRanking {
            name: c
                .canonical_name
                .or(c.display_name)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            count: c.count,
            average_salary: c.average_salary,
        })
        .collect();

    TopCompanies {
        country: country.context(),
        companies,
    }
}

pub fn shape_geodata(country: Country, payload: GeodataPayload) -> Geodata {
    let regions = payload
        .locations
        .into_iter()
        .map(|r| {
            let name = r
                .location
                .display_name
                .or_else(|| r.location.area.last().cloned())
                .unwrap_or_else(|| UNKNOWN.to_string());
            RegionSummary {
                name,
                area: r.location.area,
                count: r.count,
                average_salary: r.average_salary,
            }
        })
        .collect();

    Geodata {
        country: country.context(),
        regions,
    }
}

pub fn shape_history(country: Country, months: u32, payload: HistoryPayload) -> SalaryHistory {
    let history = match payload.month {
        MonthSeries::Map(map) => map,
        MonthSeries::List(points) => points.into_iter().map(|p| (p.month, p.salary)).collect(),
    };

    SalaryHistory {
        country: country.context(),
        months,
        history,
    }
}

pub fn shape_version(payload: VersionPayload) -> ApiVersion {
    ApiVersion {
        api_version: payload.api_version,
        software_version: payload.software_version,
    }
}
