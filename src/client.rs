use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

use crate::error::KiraError;
use crate::sparql::SelectQuery;
use crate::table::Table;

pub trait SparqlClient {
    fn select(&self, endpoint: &str, query: &SelectQuery) -> Result<Table, KiraError>;
}

#[derive(Clone)]
pub struct SparqlHttpClient {
    client: Client,
}

impl SparqlHttpClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self, KiraError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("kira-kb/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| KiraError::SparqlHttp(err.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("text/csv"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| KiraError::SparqlHttp(err.to_string()))?;
        Ok(Self { client })
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, KiraError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "SPARQL request failed".to_string());
        Err(KiraError::SparqlStatus { status, message })
    }
}

impl SparqlClient for SparqlHttpClient {
    fn select(&self, endpoint: &str, query: &SelectQuery) -> Result<Table, KiraError> {
        let text = query.to_text();
        tracing::debug!(endpoint, "sending SPARQL query");
        let response = self
            .client
            .get(endpoint)
            .query(&[("query", text.as_str()), ("format", "csv")])
            .send()
            .map_err(|err| KiraError::SparqlHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        let body = response
            .text()
            .map_err(|err| KiraError::SparqlHttp(err.to_string()))?;
        let table = Table::from_sparql_csv(body.as_bytes())?;
        tracing::debug!(endpoint, rows = table.len(), "SPARQL response parsed");
        Ok(table)
    }
}
