//! Route resolution
//!
//! Each view declares the data it needs before its controller is built.
//! Independent fetches of a route run concurrently; the first failure
//! aborts the whole resolution and no controller is constructed.

use crate::error::CoreResult;
use crate::models::{Account, Tag, Transaction, TransactionId};
use crate::services::Services;

/// Path of the transaction list, the landing view after save and delete
pub const TRANSACTION_LIST_URL: &str = "/transactions";

/// Views reachable in the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    TagList,
    TransactionList,
    TransactionBatch,
    TransactionDetail(TransactionId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::TagList => "/tags".to_string(),
            Route::TransactionList => TRANSACTION_LIST_URL.to_string(),
            Route::TransactionBatch => "/transactions/batch".to_string(),
            Route::TransactionDetail(id) => format!("/transactions/{}", id),
        }
    }
}

/// Data of the tag list view
#[derive(Debug, Clone)]
pub struct TagListData {
    pub tags: Vec<Tag>,
}

pub async fn resolve_tag_list(services: &Services) -> CoreResult<TagListData> {
    let tags = services.tags.get_all().await?;
    log::debug!("Resolved tag list: {} tags", tags.len());
    Ok(TagListData { tags })
}

/// Data of the transaction list view
#[derive(Debug, Clone)]
pub struct TransactionListData {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

pub async fn resolve_transaction_list(services: &Services) -> CoreResult<TransactionListData> {
    let (accounts, transactions) = tokio::try_join!(
        services.accounts.get_all(),
        services.transactions.list(),
    )?;
    Ok(TransactionListData { accounts, transactions })
}

/// Data of the batch entry view
#[derive(Debug, Clone)]
pub struct TransactionBatchData {
    pub accounts: Vec<Account>,
    pub descriptions: Vec<String>,
    pub tags: Vec<Tag>,
    pub skeleton: Transaction,
}

pub async fn resolve_transaction_batch(services: &Services) -> CoreResult<TransactionBatchData> {
    let (accounts, descriptions, tags, skeleton) = tokio::try_join!(
        services.accounts.get_all(),
        services.transactions.get_all_descriptions(),
        services.tags.get_all(),
        services.transactions.skeleton(),
    )?;
    log::debug!(
        "Resolved batch view: {} accounts, {} tags, {} descriptions",
        accounts.len(),
        tags.len(),
        descriptions.len()
    );
    Ok(TransactionBatchData {
        accounts,
        descriptions,
        tags,
        skeleton,
    })
}

/// Data of the transaction detail view
#[derive(Debug, Clone)]
pub struct TransactionDetailData {
    pub accounts: Vec<Account>,
    pub descriptions: Vec<String>,
    pub tags: Vec<Tag>,
    pub transaction_id: TransactionId,
    pub is_new: bool,
    pub transaction: Transaction,
}

pub async fn resolve_transaction_detail(
    services: &Services,
    transaction_id: TransactionId,
) -> CoreResult<TransactionDetailData> {
    let is_new = transaction_id.is_new();
    let transaction = async {
        match transaction_id {
            TransactionId::New => services.transactions.skeleton().await,
            TransactionId::Existing(id) => services.transactions.get(id).await,
        }
    };

    let (accounts, descriptions, tags, transaction) = tokio::try_join!(
        services.accounts.get_all(),
        services.transactions.get_all_descriptions(),
        services.tags.get_all(),
        transaction,
    )?;
    log::debug!("Resolved transaction detail {} (new: {})", transaction_id, is_new);

    Ok(TransactionDetailData {
        accounts,
        descriptions,
        tags,
        transaction_id,
        is_new,
        transaction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::memory::InMemoryBackend;
    use std::sync::Arc;

    fn services() -> (Arc<InMemoryBackend>, Services) {
        let backend = Arc::new(InMemoryBackend::seeded());
        let services = Services::from_backend(backend.clone());
        (backend, services)
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::TagList.path(), "/tags");
        assert_eq!(Route::TransactionBatch.path(), "/transactions/batch");
        assert_eq!(Route::TransactionDetail(TransactionId::New).path(), "/transactions/new");
        assert_eq!(Route::TransactionDetail(TransactionId::Existing(9)).path(), "/transactions/9");
    }

    #[tokio::test]
    async fn test_resolve_new_transaction_is_skeleton() {
        let (backend, services) = services();
        let data = resolve_transaction_detail(&services, TransactionId::New).await.unwrap();

        assert!(data.is_new);
        assert_eq!(data.transaction, backend.skeleton_now());
        assert!(!data.accounts.is_empty());
        assert!(!data.tags.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_existing_transaction_by_id() {
        let (backend, services) = services();
        let existing = backend.transactions()[0].clone();
        let id = existing.id.unwrap();

        let data = resolve_transaction_detail(&services, TransactionId::Existing(id)).await.unwrap();

        assert!(!data.is_new);
        assert_eq!(data.transaction, existing);
        assert_eq!(data.transaction_id, TransactionId::Existing(id));
    }

    #[tokio::test]
    async fn test_resolve_unknown_transaction_fails() {
        let (_backend, services) = services();
        let result = resolve_transaction_detail(&services, TransactionId::Existing(9999)).await;
        assert!(matches!(result, Err(CoreError::TransactionNotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_batch_fails_as_a_whole() {
        let (backend, services) = services();
        backend.fail_requests(true);

        let result = resolve_transaction_batch(&services).await;
        assert!(matches!(result, Err(CoreError::Request { .. })));
    }

    #[tokio::test]
    async fn test_resolve_tag_list() {
        let (backend, services) = services();
        let data = resolve_tag_list(&services).await.unwrap();
        assert_eq!(data.tags, backend.tags());
    }
}
