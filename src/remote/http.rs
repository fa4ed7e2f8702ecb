//! HTTP collaborators: candidate query service and item registry clients.
//!
//! Both speak JSON with camelCase field names and decimal values encoded as
//! strings. Transport and API errors map into [`RetoureError::Remote`]; an
//! item code the registry does not know is `Ok(None)`, never an error.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{InvoiceCandidate, RetoureError};
use crate::document::{CandidateQuery, CandidateSource, ItemRegistry};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn build_client(timeout: Duration) -> Result<reqwest::Client, RetoureError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RetoureError::Remote(e.to_string()))
}

/// Candidate query request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CandidateRequest<'a> {
    customer: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    invoice: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_code: Option<&'a str>,
    fetch_all: bool,
}

/// One candidate row as the query service returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateRow {
    invoice: String,
    source_line_id: String,
    item_code: Option<String>,
    item_id: Option<String>,
    item_name: Option<String>,
    description: Option<String>,
    uom: Option<String>,
    qty: Decimal,
    rate: Decimal,
    amount: Decimal,
    max_returnable_qty: Option<Decimal>,
    vat_ratio: Decimal,
    vat_amount: Decimal,
    posting_date: Option<NaiveDate>,
}

impl From<CandidateRow> for InvoiceCandidate {
    fn from(row: CandidateRow) -> Self {
        Self {
            invoice: row.invoice,
            source_line_id: row.source_line_id,
            item_code: row.item_code,
            item_id: row.item_id,
            item_name: row.item_name,
            description: row.description,
            uom: row.uom,
            qty: row.qty,
            rate: row.rate,
            amount: row.amount,
            max_returnable_qty: row.max_returnable_qty,
            vat_ratio: row.vat_ratio,
            vat_amount: row.vat_amount,
            posting_date: row.posting_date,
        }
    }
}

/// Client for the invoice-item candidate endpoint
/// (`POST {base}/invoice-items`).
pub struct HttpCandidateSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCandidateSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RetoureError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RetoureError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CandidateSource for HttpCandidateSource {
    async fn fetch(&self, query: &CandidateQuery) -> Result<Vec<InvoiceCandidate>, RetoureError> {
        let request = CandidateRequest {
            customer: &query.customer,
            invoice: query.invoice.as_deref(),
            item_code: query.item_code.as_deref(),
            fetch_all: query.fetch_all,
        };

        let resp = self
            .client
            .post(format!("{}/invoice-items", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| RetoureError::Remote(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RetoureError::Remote(e.to_string()))?;

        if !status.is_success() {
            return Err(RetoureError::Remote(format!("HTTP {status}: {body}")));
        }

        let rows: Vec<CandidateRow> =
            serde_json::from_str(&body).map_err(|e| RetoureError::Remote(e.to_string()))?;
        debug!(customer = %query.customer, count = rows.len(), "fetched invoice candidates");
        Ok(rows.into_iter().map(InvoiceCandidate::from).collect())
    }
}

/// Item registry response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemNameResponse {
    item_name: Option<String>,
}

/// Client for the item registry endpoint (`GET {base}/items/{code}`).
pub struct HttpItemRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl HttpItemRegistry {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RetoureError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RetoureError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ItemRegistry for HttpItemRegistry {
    async fn display_name(&self, item_code: &str) -> Result<Option<String>, RetoureError> {
        let resp = self
            .client
            .get(format!("{}/items/{item_code}", self.base_url))
            .send()
            .await
            .map_err(|e| RetoureError::Remote(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RetoureError::Remote(e.to_string()))?;

        if !status.is_success() {
            return Err(RetoureError::Remote(format!("HTTP {status}: {body}")));
        }

        let parsed: ItemNameResponse =
            serde_json::from_str(&body).map_err(|e| RetoureError::Remote(e.to_string()))?;
        Ok(parsed.item_name.filter(|n| !n.is_empty()))
    }
}
