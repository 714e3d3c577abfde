//! Adzuna API adapter
//!
//! [`AdzunaClient`] is the one component that talks to Adzuna. Each operation
//! follows the same path: check credentials, validate the country, build the
//! endpoint and query, issue a GET, then parse and reshape the body.
//!
//! The client holds only immutable state, so a single instance can serve any
//! number of concurrent calls.

pub mod http;
pub mod query;
pub mod response;

use crate::config::{ClientSettings, Credentials};
use crate::country::Country;
use crate::error::{AdzunaError, AdzunaResult};
use http::{HttpTransport, QueryParams, ReqwestTransport};
use query::{Endpoint, HistoryFilter, MarketFilter, SearchFilter};
use response::{
    parse_payload, ApiVersion, CategoriesPayload, CategoryList, GeodataPayload, Geodata,
    HistogramPayload, HistoryPayload, JobSearchResults, SalaryHistogram, SalaryHistory,
    SearchPayload, TopCompanies, TopCompaniesPayload, VersionPayload,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub use http::UpstreamResponse;
pub use query::SortBy;

/// Stateless adapter over the Adzuna REST API
pub struct AdzunaClient {
    settings: ClientSettings,
    credentials: Option<Credentials>,
    transport: Arc<dyn HttpTransport>,
}

impl AdzunaClient {
    /// Create a client with the production reqwest transport
    pub fn new(settings: ClientSettings, credentials: Option<Credentials>) -> AdzunaResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(settings.timeout)?);
        Ok(Self::with_transport(settings, credentials, transport))
    }

    /// Create a client over an injected transport
    pub fn with_transport(
        settings: ClientSettings,
        credentials: Option<Credentials>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            settings,
            credentials,
            transport,
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Paginated job search
    pub async fn search_jobs(
        &self,
        country: &str,
        filter: &SearchFilter,
    ) -> AdzunaResult<JobSearchResults> {
        let country = self.prepare(country)?;
        filter.validate()?;
        let page = filter.page();
        let endpoint = Endpoint::Search { country, page };

        let payload: SearchPayload = self.fetch(&endpoint, filter.to_query()).await?;
        Ok(response::shape_search(
            country,
            page,
            filter.results_per_page(),
            payload,
        ))
    }

    /// Category tags valid for the `category` filter in this market
    pub async fn get_categories(&self, country: &str) -> AdzunaResult<CategoryList> {
        let country = self.prepare(country)?;
        let payload: CategoriesPayload = self
            .fetch(&Endpoint::Categories(country), Vec::new())
            .await?;
        Ok(response::shape_categories(country, payload))
    }

    /// Distribution of advertised salaries
    pub async fn get_salary_histogram(
        &self,
        country: &str,
        filter: &MarketFilter,
    ) -> AdzunaResult<SalaryHistogram> {
        let country = self.prepare(country)?;
        let payload: HistogramPayload = self
            .fetch(&Endpoint::Histogram(country), filter.to_query())
            .await?;
        response::shape_histogram(country, payload)
    }

    /// Employers ranked by open positions
    pub async fn get_top_companies(
        &self,
        country: &str,
        filter: &MarketFilter,
    ) -> AdzunaResult<TopCompanies> {
        let country = self.prepare(country)?;
        let payload: TopCompaniesPayload = self
            .fetch(&Endpoint::TopCompanies(country), filter.to_query())
            .await?;
        Ok(response::shape_top_companies(country, payload))
    }

    /// Job counts and average salaries per region
    pub async fn get_geodata(&self, country: &str, filter: &MarketFilter) -> AdzunaResult<Geodata> {
        let country = self.prepare(country)?;
        let payload: GeodataPayload = self
            .fetch(&Endpoint::Geodata(country), filter.to_query())
            .await?;
        Ok(response::shape_geodata(country, payload))
    }

    /// Average advertised salary per month
    pub async fn get_salary_history(
        &self,
        country: &str,
        filter: &HistoryFilter,
    ) -> AdzunaResult<SalaryHistory> {
        let country = self.prepare(country)?;
        let payload: HistoryPayload = self
            .fetch(&Endpoint::History(country), filter.to_query())
            .await?;
        Ok(response::shape_history(country, filter.months(), payload))
    }

    /// API version metadata; the only call that works without credentials
    pub async fn get_api_version(&self) -> AdzunaResult<ApiVersion> {
        let payload: VersionPayload = self.fetch(&Endpoint::Version, Vec::new()).await?;
        Ok(response::shape_version(payload))
    }

    /// Credential check first, then country lookup, both before any I/O
    fn prepare(&self, country: &str) -> AdzunaResult<Country> {
        self.require_credentials()?;
        Country::parse(country)
    }

    fn require_credentials(&self) -> AdzunaResult<&Credentials> {
        self.credentials
            .as_ref()
            .ok_or_else(|| AdzunaError::MissingCredentials {
                app_id_env: self.settings.app_id_env.clone(),
                app_key_env: self.settings.app_key_env.clone(),
            })
    }

    /// Full URL for an endpoint (pure function)
    pub fn endpoint_url(&self, endpoint: &Endpoint) -> String {
        format!("{}/{}", self.settings.base_url, endpoint.path())
    }

    /// Prepend credentials to the query string.
    ///
    /// The version endpoint goes without them when none are configured.
    fn authenticated_query(
        &self,
        endpoint: &Endpoint,
        params: QueryParams,
    ) -> AdzunaResult<QueryParams> {
        let credentials = if endpoint.requires_credentials() {
            Some(self.require_credentials()?)
        } else {
            self.credentials.as_ref()
        };

        let mut query: QueryParams = credentials
            .map(|c| {
                c.query_params()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        query.extend(params);
        Ok(query)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: QueryParams,
    ) -> AdzunaResult<T> {
        let query = self.authenticated_query(endpoint, params)?;
        let url = self.endpoint_url(endpoint);
        let path = endpoint.path();

        debug!(endpoint = %path, params = query.len(), "Requesting Adzuna API");
        let started = Instant::now();

        let response = self.transport.get(&url, &query).await.map_err(|e| {
            warn!(endpoint = %path, error = %e, "Adzuna request failed");
            e
        })?;

        debug!(
            endpoint = %path,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Adzuna API responded"
        );

        if !response.is_success() {
            let error = AdzunaError::from_status(response.status, &response.body);
            warn!(endpoint = %path, status = response.status, error = %error, "Adzuna API returned an error");
            return Err(error);
        }

        parse_payload(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHttpTransport;
    use serde_json::json;

    fn client_with(transport: Arc<MockHttpTransport>, credentials: Option<Credentials>) -> AdzunaClient {
        AdzunaClient::with_transport(ClientSettings::default(), credentials, transport)
    }

    fn credentials() -> Option<Credentials> {
        Some(Credentials::new("test_app_id", "test_app_key"))
    }

    #[tokio::test]
    async fn test_credentials_are_prepended_to_query() {
        let transport = Arc::new(MockHttpTransport::with_json(200, json!({"results": []})));
        let client = client_with(transport.clone(), credentials());

        client.get_categories("gb").await.unwrap();

        let request = transport.last_request().await.unwrap();
        assert_eq!(
            request.url,
            "https://api.adzuna.com/v1/api/jobs/gb/categories"
        );
        assert_eq!(request.param("app_id"), Some("test_app_id"));
        assert_eq!(request.param("app_key"), Some("test_app_key"));
    }

    #[tokio::test]
    async fn test_custom_params_merge_with_auth() {
        let transport = Arc::new(MockHttpTransport::with_json(200, json!({"histogram": {}})));
        let client = client_with(transport.clone(), credentials());

        let filter = MarketFilter {
            keywords: Some("python".to_string()),
            location: Some("London".to_string()),
            category: None,
        };
        client.get_salary_histogram("fr", &filter).await.unwrap();

        let request = transport.last_request().await.unwrap();
        assert!(request.url.ends_with("jobs/fr/histogram"));
        assert_eq!(request.param("what"), Some("python"));
        assert_eq!(request.param("where"), Some("London"));
        assert_eq!(request.param("app_id"), Some("test_app_id"));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_request() {
        let transport = Arc::new(MockHttpTransport::with_json(200, json!({"results": []})));
        let client = client_with(transport.clone(), None);

        let err = client.get_categories("gb").await.unwrap_err();
        assert!(matches!(err, AdzunaError::MissingCredentials { .. }));
        assert!(err.to_string().contains("ADZUNA_APP_ID"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_win_over_bad_country() {
        let transport = Arc::new(MockHttpTransport::with_json(200, json!({})));
        let client = client_with(transport.clone(), None);

        let err = client.get_categories("zz").await.unwrap_err();
        assert!(matches!(err, AdzunaError::MissingCredentials { .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_version_works_without_credentials() {
        let transport = Arc::new(MockHttpTransport::with_json(
            200,
            json!({"api_version": 1, "software_version": "1.2.3"}),
        ));
        let client = client_with(transport.clone(), None);

        let version = client.get_api_version().await.unwrap();
        assert_eq!(version.api_version, json!(1));

        let request = transport.last_request().await.unwrap();
        assert!(request.url.ends_with("/version"));
        assert!(request.param("app_id").is_none());
    }

    #[tokio::test]
    async fn test_version_sends_credentials_when_configured() {
        let transport = Arc::new(MockHttpTransport::with_json(200, json!({"api_version": 1})));
        let client = client_with(transport.clone(), credentials());

        client.get_api_version().await.unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.param("app_id"), Some("test_app_id"));
    }

    #[tokio::test]
    async fn test_upstream_error_carries_status() {
        let transport = Arc::new(MockHttpTransport::with_json(
            429,
            json!({"display": "Too many requests"}),
        ));
        let client = client_with(transport, credentials());

        let err = client
            .search_jobs("gb", &SearchFilter::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.to_string(), "API Error 429: Too many requests");
    }

    #[tokio::test]
    async fn test_malformed_body_is_upstream_error() {
        let transport = Arc::new(MockHttpTransport::new(UpstreamResponse::new(
            200,
            "not json",
        )));
        let client = client_with(transport, credentials());

        let err = client.get_top_companies("us", &MarketFilter::default()).await.unwrap_err();
        assert!(matches!(err, AdzunaError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = Arc::new(MockHttpTransport::failing(|| AdzunaError::Connection {
            message: "connection refused".to_string(),
        }));
        let client = client_with(transport.clone(), credentials());

        let err = client.get_geodata("gb", &MarketFilter::default()).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Transport);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_search_page_goes_in_path() {
        let transport = Arc::new(MockHttpTransport::with_json(200, json!({"count": 0, "results": []})));
        let client = client_with(transport.clone(), credentials());

        let filter = SearchFilter {
            page: Some(5),
            results_per_page: Some(75),
            ..Default::default()
        };
        let results = client.search_jobs("US", &filter).await.unwrap();

        assert_eq!(results.page, 5);
        assert_eq!(results.results_per_page, 50);
        let request = transport.last_request().await.unwrap();
        assert!(request.url.ends_with("jobs/us/search/5"));
        assert_eq!(request.param("results_per_page"), Some("50"));
    }

    #[tokio::test]
    async fn test_page_zero_rejected_before_request() {
        let transport = Arc::new(MockHttpTransport::with_json(200, json!({"results": []})));
        let client = client_with(transport.clone(), credentials());

        let filter = SearchFilter {
            page: Some(0),
            ..Default::default()
        };
        let err = client.search_jobs("gb", &filter).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_history_sends_effective_months() {
        let transport = Arc::new(MockHttpTransport::with_json(200, json!({"month": {}})));
        let client = client_with(transport.clone(), credentials());

        let filter = HistoryFilter {
            months: Some(36),
            ..Default::default()
        };
        let history = client.get_salary_history("gb", &filter).await.unwrap();

        assert_eq!(history.months, 24);
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.param("months"), Some("24"));
    }

    #[test]
    fn test_endpoint_url_joins_base() {
        let settings = ClientSettings {
            base_url: "http://localhost:9999/api".to_string(),
            ..Default::default()
        };
        let client = AdzunaClient::with_transport(
            settings,
            None,
            Arc::new(MockHttpTransport::with_json(200, json!({}))),
        );
        assert_eq!(
            client.endpoint_url(&Endpoint::Version),
            "http://localhost:9999/api/version"
        );
    }
}
