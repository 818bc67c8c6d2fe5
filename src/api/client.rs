use reqwest::{Client, Request, Url};
use thiserror::Error;

use super::query::Query;

const USER_AGENT: &str = concat!("vex/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API endpoint '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP request: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client session for the competition-data API.
///
/// Requests are prepared against the base URL but never sent; fetching and
/// parsing responses live outside this crate.
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: &str) -> Result<(), ApiError> {
        self.base_url = parse_base_url(base_url)?;
        tracing::debug!(base_url = %self.base_url, "API endpoint changed");
        Ok(())
    }

    /// Builds the `GET` request for `query` without sending it.
    pub fn prepare(&self, query: &Query) -> Result<Request, ApiError> {
        let url = self.endpoint_url(query)?;
        let request = self.client.get(url).query(query.params()).build()?;
        tracing::debug!(method = %request.method(), url = %request.url(), "prepared request");
        Ok(request)
    }

    fn endpoint_url(&self, query: &Query) -> Result<Url, ApiError> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            query.endpoint().path()
        );
        parse_base_url(&raw)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::Endpoint;

    fn client() -> ApiClient {
        ApiClient::new("https://api.vexdb.io/v1").unwrap()
    }

    #[test]
    fn test_prepare_builds_get_request() {
        let request = client().prepare(&Query::event("RE-VRC-17-3805")).unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://api.vexdb.io/v1/get_events?sku=RE-VRC-17-3805"
        );
    }

    #[test]
    fn test_prepare_keeps_base_path() {
        let client = ApiClient::new("http://localhost:8080/api/v1/").unwrap();
        let request = client.prepare(&Query::new(Endpoint::Teams)).unwrap();

        assert_eq!(request.url().path(), "/api/v1/get_teams");
        assert!(request.url().query().is_none_or(str::is_empty));
    }

    #[test]
    fn test_prepare_encodes_params() {
        let query = Query::matches()
            .param("sku", "RE VRC")
            .param("team", "750B");
        let request = client().prepare(&query).unwrap();

        assert_eq!(request.url().query(), Some("sku=RE+VRC&team=750B"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
        assert!(ApiClient::new("ftp://example.com").is_err());
    }

    #[test]
    fn test_set_base_url() {
        let mut client = client();
        client.set_base_url("http://localhost:9000").unwrap();

        let request = client.prepare(&Query::rankings()).unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:9000/get_rankings");

        assert!(client.set_base_url("bogus").is_err());
        assert_eq!(client.base_url().as_str(), "http://localhost:9000/");
    }
}
