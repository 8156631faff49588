//! Banking gateway client.
//!
//! The backend supplies customer identity, account and credit data, currency
//! rates, bank news and branch addresses. All lookups are plain GET requests
//! answered with JSON or preformatted text; failures are surfaced as
//! [`GatewayError`] and never retried here.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::localization::LocaleTag;

/// Errors reported by banking backend lookups
#[derive(Debug, Clone)]
pub enum GatewayError {
    /// Transport-level failure reaching the backend
    Http(String),
    /// Backend answered with a non-success status code
    Status(u16),
    /// Response body could not be decoded
    Decode(String),
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::Http(msg) => write!(f, "HTTP error: {msg}"),
            GatewayError::Status(code) => write!(f, "Unexpected status code: {code}"),
            GatewayError::Decode(msg) => write!(f, "Decode error: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Http(err.to_string())
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Customer name and surname resolved from a verified phone number
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerIdentity {
    pub name: String,
    pub surname: String,
}

/// One account with its current balance
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountBalance {
    pub iban: String,
    pub balance: f64,
}

/// Customer accounts grouped by currency
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccountsByCurrency {
    #[serde(default)]
    pub azn: Vec<AccountBalance>,
    #[serde(default)]
    pub usd: Vec<AccountBalance>,
    #[serde(default)]
    pub eur: Vec<AccountBalance>,
}

/// Outstanding credit totals per currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct CreditsSummary {
    #[serde(default)]
    pub azn_total: f64,
    #[serde(default)]
    pub usd_total: f64,
}

/// Synchronous lookups against the banking backend.
///
/// `get_customer_identity` returns `None` when the backend knows nothing
/// about the phone number; that is a regular answer, not an error.
#[async_trait]
pub trait BankingGateway: Send + Sync {
    async fn get_customer_identity(&self, phone: &str) -> GatewayResult<Option<CustomerIdentity>>;
    async fn get_accounts(&self, phone: &str) -> GatewayResult<AccountsByCurrency>;
    async fn get_credits_summary(&self, phone: &str) -> GatewayResult<CreditsSummary>;
    async fn get_currency_rates(&self, locale: LocaleTag) -> GatewayResult<String>;
    async fn get_bank_news(&self, locale: LocaleTag) -> GatewayResult<String>;
    async fn get_branch_address(&self, branch_id: &str) -> GatewayResult<String>;
}

/// HTTP implementation of [`BankingGateway`]
pub struct HttpBankingGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBankingGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_text(&self, path: &str) -> GatewayResult<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Requesting banking backend");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let body = self.get_text(path).await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BankingGateway for HttpBankingGateway {
    async fn get_customer_identity(&self, phone: &str) -> GatewayResult<Option<CustomerIdentity>> {
        let body = self.get_text(&format!("/customers/{phone}/identity")).await?;
        // An empty body means the phone number is not registered.
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn get_accounts(&self, phone: &str) -> GatewayResult<AccountsByCurrency> {
        self.get_json(&format!("/customers/{phone}/accounts")).await
    }

    async fn get_credits_summary(&self, phone: &str) -> GatewayResult<CreditsSummary> {
        self.get_json(&format!("/customers/{phone}/credits")).await
    }

    async fn get_currency_rates(&self, locale: LocaleTag) -> GatewayResult<String> {
        self.get_text(&format!("/rates?locale={}", locale.as_str())).await
    }

    async fn get_bank_news(&self, locale: LocaleTag) -> GatewayResult<String> {
        self.get_text(&format!("/news?locale={}", locale.as_str())).await
    }

    async fn get_branch_address(&self, branch_id: &str) -> GatewayResult<String> {
        self.get_text(&format!("/branches/{branch_id}/address")).await
    }
}
