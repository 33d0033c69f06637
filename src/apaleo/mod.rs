use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::apaleo::model::{RevenuesReport, TokenResponse};
use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::model::{AccessToken, Credentials};

pub mod model;

const TOKEN_PATH: &str = "connect/token";
const PROPERTY_PERFORMANCE_PATH: &str = "reports/v1/reports/property-performance";
const REVENUES_PATH: &str = "reports/v1/reports/revenues";

/// The three apaleo calls a report needs. Implemented by `ApaleoClient` for
/// real traffic and by recording fakes in tests.
#[async_trait]
pub trait ApaleoService: Send + Sync {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<AccessToken>;

    /// Raw property-performance body; `report::business_days` extracts the days.
    async fn fetch_property_performance(
        &self,
        token: &AccessToken,
        property_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Value>;

    /// Revenues for the 24h window starting at `day`.
    async fn fetch_revenues(
        &self,
        token: &AccessToken,
        property_id: &str,
        day: NaiveDate,
    ) -> Result<RevenuesReport>;
}

#[derive(Clone)]
pub struct ApaleoClient {
    http: Client,
    identity_url: Url,
    api_url: Url,
}

impl fmt::Debug for ApaleoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApaleoClient")
            .field("identity_url", &self.identity_url)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl ApaleoClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let identity_url = base_url(&cfg.apaleo.identity_url, "identity")?;
        let api_url = base_url(&cfg.apaleo.api_url, "API")?;
        let http = Client::builder()
            .user_agent(concat!("property-report/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.app.timeout())
            .no_proxy()
            .build()
            .map_err(|e| ReportError::Fetch(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            identity_url,
            api_url,
        })
    }

    fn endpoint(base: &Url, path: &str) -> Result<Url> {
        base.join(path)
            .map_err(|e| ReportError::Fetch(format!("invalid endpoint {path}: {e}")))
    }

    pub fn build_token_request(&self, credentials: &Credentials) -> Result<reqwest::Request> {
        let endpoint = Self::endpoint(&self.identity_url, TOKEN_PATH)?;
        self.http
            .post(endpoint)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .build()
            .map_err(|e| ReportError::Auth(format!("failed to build token request: {e}")))
    }

    pub fn build_performance_request(
        &self,
        token: &AccessToken,
        property_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<reqwest::Request> {
        let endpoint = Self::endpoint(&self.api_url, PROPERTY_PERFORMANCE_PATH)?;
        self.http
            .get(endpoint)
            .bearer_auth(token.as_str())
            .query(&[
                ("propertyId", property_id.to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
                ("expand", "businessDays".to_string()),
                ("timeSliceDefinitionIds", format!("{property_id}-NIGHT")),
            ])
            .build()
            .map_err(|e| ReportError::Fetch(format!("failed to build report request: {e}")))
    }

    pub fn build_revenues_request(
        &self,
        token: &AccessToken,
        property_id: &str,
        day: NaiveDate,
    ) -> Result<reqwest::Request> {
        let endpoint = Self::endpoint(&self.api_url, REVENUES_PATH)?;
        let next = day
            .checked_add_days(Days::new(1))
            .ok_or_else(|| ReportError::Fetch(format!("no day after {day}")))?;
        self.http
            .get(endpoint)
            .header(ACCEPT, "application/json")
            .bearer_auth(token.as_str())
            .query(&[
                ("from", day.to_string()),
                ("to", next.to_string()),
                ("propertyId", property_id.to_string()),
            ])
            .build()
            .map_err(|e| ReportError::Fetch(format!("failed to build revenues request: {e}")))
    }

    /// Send a request and return its body. Non-success statuses become
    /// `Fetch` errors carrying the response text.
    async fn execute(&self, request: reqwest::Request, what: &str) -> Result<String> {
        debug!(url = %request.url(), method = %request.method(), "sending apaleo request");
        let res = self
            .http
            .execute(request)
            .await
            .map_err(|e| ReportError::from_transport(what, e))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, what, "apaleo returned an error status");
            return Err(ReportError::Fetch(format!("{what}: status {status}: {body}")));
        }
        res.text()
            .await
            .map_err(|e| ReportError::from_transport(what, e))
    }
}

#[async_trait]
impl ApaleoService for ApaleoClient {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<AccessToken> {
        if credentials.client_id.trim().is_empty() || credentials.client_secret.is_empty() {
            return Err(ReportError::Auth("client id and secret must be non-empty".into()));
        }
        let request = self.build_token_request(credentials)?;
        let body = self
            .execute(request, "token exchange")
            .await
            .map_err(|e| ReportError::Auth(e.to_string()))?;
        parse_token(&body)
    }

    async fn fetch_property_performance(
        &self,
        token: &AccessToken,
        property_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Value> {
        let request = self.build_performance_request(token, property_id, from, to)?;
        let body = self.execute(request, "property-performance report").await?;
        serde_json::from_str(&body)
            .map_err(|e| ReportError::Fetch(format!("property-performance report is not JSON: {e}")))
    }

    async fn fetch_revenues(
        &self,
        token: &AccessToken,
        property_id: &str,
        day: NaiveDate,
    ) -> Result<RevenuesReport> {
        let request = self.build_revenues_request(token, property_id, day)?;
        let body = self.execute(request, "revenues report").await?;
        serde_json::from_str(&body)
            .map_err(|e| ReportError::Fetch(format!("revenues report for {day} is malformed: {e}")))
    }
}

/// Parse a configured base URL so that relative endpoint paths extend it.
/// `Url::join` replaces the last path segment unless the path ends in `/`,
/// so `http://proxy/apaleo` is treated as `http://proxy/apaleo/`.
fn base_url(raw: &str, which: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| ReportError::Fetch(format!("invalid {which} URL: {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Extract `access_token` from an identity response. A missing or empty
/// token is an authentication failure, not an empty string.
pub fn parse_token(body: &str) -> Result<AccessToken> {
    let payload: TokenResponse = serde_json::from_str(body)
        .map_err(|e| ReportError::Auth(format!("token response is not JSON: {e}")))?;
    match payload.access_token {
        Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
        _ => Err(ReportError::Auth("token response has no access_token".into())),
    }
}
