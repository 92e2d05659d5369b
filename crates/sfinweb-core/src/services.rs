//! Contracts of the backend services the views call
//!
//! Implementations live outside this crate: `sfinweb-client` talks to the
//! sfinapp REST service, [`crate::memory::InMemoryBackend`] keeps everything
//! in process.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::models::{Account, Tag, Transaction};

/// Suggestion cap used when a service does not configure its own
pub const DEFAULT_SUGGEST_LIMIT: usize = 10;

#[async_trait]
pub trait TagService: Send + Sync {
    async fn get_all(&self) -> CoreResult<Vec<Tag>>;
}

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn get_all(&self) -> CoreResult<Vec<Account>>;
}

/// Transaction operations of the backend
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// All transactions known to the service
    async fn list(&self) -> CoreResult<Vec<Transaction>>;

    /// Descriptions used so far, for autocomplete
    async fn get_all_descriptions(&self) -> CoreResult<Vec<String>>;

    /// Default instance used to seed new-entry forms
    async fn skeleton(&self) -> CoreResult<Transaction>;

    async fn get(&self, id: i64) -> CoreResult<Transaction>;

    async fn create(&self, transaction: &Transaction) -> CoreResult<Transaction>;

    async fn update(&self, transaction: &Transaction) -> CoreResult<Transaction>;

    async fn delete(&self, transaction: &Transaction) -> CoreResult<()>;

    /// Create all transactions in one request
    async fn create_batch(&self, transactions: &[Transaction]) -> CoreResult<()>;

    /// Filter known descriptions by a search term
    fn suggest_description(&self, descriptions: &[String], term: &str) -> Vec<String> {
        suggest_descriptions(descriptions, term, DEFAULT_SUGGEST_LIMIT)
    }
}

/// Case-insensitive substring match, original order kept, at most `limit` hits
pub fn suggest_descriptions(descriptions: &[String], term: &str, limit: usize) -> Vec<String> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    descriptions
        .iter()
        .filter(|d| d.to_lowercase().contains(&term))
        .take(limit)
        .cloned()
        .collect()
}

/// The injected services, shared by every view
#[derive(Clone)]
pub struct Services {
    pub accounts: Arc<dyn AccountService>,
    pub tags: Arc<dyn TagService>,
    pub transactions: Arc<dyn TransactionService>,
}

impl Services {
    pub fn new(
        accounts: Arc<dyn AccountService>,
        tags: Arc<dyn TagService>,
        transactions: Arc<dyn TransactionService>,
    ) -> Self {
        Self {
            accounts,
            tags,
            transactions,
        }
    }

    /// Use one backend object for all three services
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: AccountService + TagService + TransactionService + 'static,
    {
        Self {
            accounts: backend.clone(),
            tags: backend.clone(),
            transactions: backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptions() -> Vec<String> {
        vec![
            "Groceries".to_string(),
            "Rent".to_string(),
            "grocery delivery".to_string(),
            "Salary".to_string(),
        ]
    }

    #[test]
    fn test_suggest_is_case_insensitive_and_ordered() {
        let hits = suggest_descriptions(&descriptions(), "GROC", 10);
        assert_eq!(hits, vec!["Groceries".to_string(), "grocery delivery".to_string()]);
    }

    #[test]
    fn test_suggest_respects_limit() {
        let hits = suggest_descriptions(&descriptions(), "r", 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], "Groceries");
    }

    #[test]
    fn test_suggest_blank_term() {
        assert!(suggest_descriptions(&descriptions(), "  ", 10).is_empty());
    }
}
