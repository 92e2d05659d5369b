//! HTTP client for the sfinapp REST service
//!
//! Implements the service contracts of `sfinweb-core` on top of reqwest.
//! Endpoints live under `{base_url}/api/`.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sfinweb_config::Config;
use sfinweb_core::{
    suggest_descriptions, Account, AccountService, CoreError, CoreResult, Tag, TagService,
    Transaction, TransactionService,
};
use sfinweb_core::services::DEFAULT_SUGGEST_LIMIT;
use std::time::Duration;

/// sfinapp API client
#[derive(Debug, Clone)]
pub struct SfinappClient {
    http_client: HttpClient,
    base_url: String,
    suggest_limit: usize,
}

impl SfinappClient {
    /// Create a client with default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            suggest_limit: DEFAULT_SUGGEST_LIMIT,
        }
    }

    /// Create a client from the `api` and `suggest` sections of the config
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .map_err(|e| CoreError::Internal {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            suggest_limit: config.suggest.limit,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> CoreResult<reqwest::Response> {
        let url = self.endpoint(path);
        log::debug!("{} {}", method, url);

        let mut request = self.http_client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            log::error!("{} {} failed: {}", method, url, e);
            CoreError::Request {
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            log::warn!("{} {} answered {}: {}", method, url, status, body_text);
            return Err(status_error(status, &body_text));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> CoreResult<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        decode(response).await
    }
}

/// Map a non-success answer, preferring the service's own message
fn status_error(status: StatusCode, body_text: &str) -> CoreError {
    let message = serde_json::from_str::<serde_json::Value>(body_text)
        .ok()
        .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            if body_text.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body_text.to_string()
            }
        });

    CoreError::Status {
        status: status.as_u16(),
        message,
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> CoreResult<T> {
    response.json::<T>().await.map_err(|e| CoreError::Decode {
        message: e.to_string(),
    })
}

/// The service answers an unknown id with an empty body
fn parse_transaction(id: i64, body_text: &str) -> CoreResult<Transaction> {
    let trimmed = body_text.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(CoreError::TransactionNotFound { id: id.to_string() });
    }
    serde_json::from_str(trimmed).map_err(|e| CoreError::Decode {
        message: e.to_string(),
    })
}

#[async_trait]
impl TagService for SfinappClient {
    async fn get_all(&self) -> CoreResult<Vec<Tag>> {
        self.get_json("tag").await
    }
}

#[async_trait]
impl AccountService for SfinappClient {
    async fn get_all(&self) -> CoreResult<Vec<Account>> {
        self.get_json("account").await
    }
}

#[async_trait]
impl TransactionService for SfinappClient {
    async fn list(&self) -> CoreResult<Vec<Transaction>> {
        self.get_json("transaction").await
    }

    async fn get_all_descriptions(&self) -> CoreResult<Vec<String>> {
        self.get_json("transaction/descriptions").await
    }

    async fn skeleton(&self) -> CoreResult<Transaction> {
        self.get_json("transaction/skeleton").await
    }

    async fn get(&self, id: i64) -> CoreResult<Transaction> {
        let response = self
            .send::<()>(Method::GET, &format!("transaction/{}", id), None)
            .await
            .map_err(|e| match e {
                CoreError::Status { status: 404, .. } => {
                    CoreError::TransactionNotFound { id: id.to_string() }
                }
                other => other,
            })?;
        let body_text = response.text().await.map_err(|e| CoreError::Decode {
            message: e.to_string(),
        })?;
        parse_transaction(id, &body_text)
    }

    async fn create(&self, transaction: &Transaction) -> CoreResult<Transaction> {
        let response = self
            .send(Method::POST, "transaction", Some(transaction))
            .await?;
        let id: i64 = decode(response).await?;

        let mut created = transaction.clone();
        created.id = Some(id);
        Ok(created)
    }

    async fn update(&self, transaction: &Transaction) -> CoreResult<Transaction> {
        let id = transaction.require_id()?;
        self.send(Method::PUT, &format!("transaction/{}", id), Some(transaction))
            .await?;
        Ok(transaction.clone())
    }

    async fn delete(&self, transaction: &Transaction) -> CoreResult<()> {
        let id = transaction.require_id()?;
        self.send::<()>(Method::DELETE, &format!("transaction/{}", id), None)
            .await?;
        Ok(())
    }

    async fn create_batch(&self, transactions: &[Transaction]) -> CoreResult<()> {
        let response = self
            .send(Method::POST, "transaction/batch", Some(transactions))
            .await?;
        let ids: Vec<i64> = decode(response).await?;
        log::info!("Batch created {} transactions", ids.len());
        Ok(())
    }

    fn suggest_description(&self, descriptions: &[String], term: &str) -> Vec<String> {
        suggest_descriptions(descriptions, term, self.suggest_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let client = SfinappClient::new("http://localhost:8080/");
        assert_eq!(client.endpoint("transaction"), "http://localhost:8080/api/transaction");
        assert_eq!(
            client.endpoint("/transaction/batch"),
            "http://localhost:8080/api/transaction/batch"
        );
    }

    #[test]
    fn test_from_config_uses_suggest_limit() {
        let mut config = Config::default();
        config.suggest.limit = 1;
        config.api.base_url = "https://finance.example/".to_string();
        let client = SfinappClient::from_config(&config).unwrap();

        assert_eq!(client.endpoint("tag"), "https://finance.example/api/tag");
        let descriptions = vec!["Rent".to_string(), "Rent deposit".to_string()];
        assert_eq!(client.suggest_description(&descriptions, "rent"), vec!["Rent".to_string()]);
    }

    #[test]
    fn test_status_error_prefers_service_message() {
        let error = status_error(StatusCode::BAD_REQUEST, r#"{"message": "amount: must not be null"}"#);
        assert_eq!(
            error,
            CoreError::Status { status: 400, message: "amount: must not be null".to_string() }
        );

        let error = status_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(
            error,
            CoreError::Status { status: 500, message: "Internal Server Error".to_string() }
        );

        let error = status_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(error.to_string().contains("upstream down"));
    }

    #[test]
    fn test_parse_transaction_empty_body_is_not_found() {
        assert!(matches!(
            parse_transaction(4, ""),
            Err(CoreError::TransactionNotFound { ref id }) if id == "4"
        ));
        assert!(matches!(parse_transaction(4, "null"), Err(CoreError::TransactionNotFound { .. })));
        assert!(matches!(parse_transaction(4, "{oops"), Err(CoreError::Decode { .. })));

        let tx = parse_transaction(4, r#"{"id": 4, "description": "Rent", "tagIds": []}"#).unwrap();
        assert_eq!(tx.id, Some(4));
    }

    #[tokio::test]
    async fn test_update_without_id_fails_before_request() {
        let client = SfinappClient::new("http://localhost:1");
        let result = client.update(&Transaction::default()).await;
        assert!(matches!(result, Err(CoreError::Validation { .. })));

        let result = client.delete(&Transaction::default()).await;
        assert!(matches!(result, Err(CoreError::Validation { .. })));
    }
}
