//! In-process backend
//!
//! Implements every service contract over plain vectors. Used by the
//! `--demo` mode of the binary and by tests, which inspect the recorded
//! [`BackendCall`]s.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::{CoreError, CoreResult};
use crate::models::{Account, Tag, Transaction, TransactionType};
use crate::services::{
    suggest_descriptions, AccountService, TagService, TransactionService, DEFAULT_SUGGEST_LIMIT,
};

/// Mutating call received by the backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Create(Transaction),
    Update(Transaction),
    Delete(i64),
    CreateBatch(Vec<Transaction>),
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: Vec<Account>,
    tags: Vec<Tag>,
    transactions: Vec<Transaction>,
    next_id: i64,
    calls: Vec<BackendCall>,
}

impl MemoryState {
    fn insert(&mut self, transaction: &Transaction) -> Transaction {
        self.next_id += 1;
        let mut created = transaction.clone();
        created.id = Some(self.next_id);
        self.transactions.push(created.clone());
        created
    }

    fn position(&self, id: i64) -> CoreResult<usize> {
        self.transactions
            .iter()
            .position(|t| t.id == Some(id))
            .ok_or(CoreError::TransactionNotFound { id: id.to_string() })
    }
}

/// Backend keeping accounts, tags and transactions in memory
#[derive(Debug)]
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
    failing: AtomicBool,
    today: NaiveDate,
    suggest_limit: usize,
}

impl InMemoryBackend {
    pub fn new(accounts: Vec<Account>, tags: Vec<Tag>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                accounts,
                tags,
                ..Default::default()
            }),
            failing: AtomicBool::new(false),
            today: Local::now().date_naive(),
            suggest_limit: DEFAULT_SUGGEST_LIMIT,
        }
    }

    /// Cap description suggestions at `limit`
    pub fn with_suggest_limit(mut self, limit: usize) -> Self {
        self.suggest_limit = limit;
        self
    }

    /// Backend with a few accounts, tags and transactions
    pub fn seeded() -> Self {
        let accounts = vec![
            Account { id: 1, name: "Cash".to_string(), description: Some("Wallet".to_string()) },
            Account { id: 2, name: "Bank".to_string(), description: Some("Checking account".to_string()) },
            Account { id: 3, name: "Savings".to_string(), description: None },
        ];
        let tags = vec![
            Tag { id: 1, name: "food".to_string() },
            Tag { id: 2, name: "travel".to_string() },
            Tag { id: 3, name: "bills".to_string() },
        ];
        let backend = Self::new(accounts, tags);

        let seed = [
            (1, TransactionType::Expense, Decimal::new(-1250, 2), "Groceries", 1, None, vec![1]),
            (2, TransactionType::Income, Decimal::new(250000, 2), "Salary", 2, None, vec![]),
            (3, TransactionType::Expense, Decimal::new(-80000, 2), "Rent", 2, None, vec![3]),
            (5, TransactionType::Transfer, Decimal::new(20000, 2), "Monthly savings", 2, Some(3), vec![]),
        ];
        {
            let mut state = backend.lock();
            for (day, transaction_type, amount, description, account, to_account, tags) in seed {
                let transaction = Transaction {
                    id: None,
                    date: NaiveDate::from_ymd_opt(2024, 6, day),
                    transaction_type: Some(transaction_type),
                    amount: Some(amount),
                    description: Some(description.to_string()),
                    account_id: Some(account),
                    to_account_id: to_account,
                    tag_ids: tags,
                };
                state.insert(&transaction);
            }
        }
        backend
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every following request fail (or succeed again)
    pub fn fail_requests(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> CoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::Request {
                message: "backend unavailable".to_string(),
            });
        }
        Ok(())
    }

    /// Mutating calls received so far, including failed ones
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.lock().tags.clone()
    }

    /// The skeleton: today, an expense on the first account, no tags
    pub fn skeleton_now(&self) -> Transaction {
        let state = self.lock();
        Transaction {
            date: Some(self.today),
            transaction_type: Some(TransactionType::Expense),
            account_id: state.accounts.first().map(|a| a.id),
            tag_ids: Vec::new(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl AccountService for InMemoryBackend {
    async fn get_all(&self) -> CoreResult<Vec<Account>> {
        self.check_available()?;
        Ok(self.lock().accounts.clone())
    }
}

#[async_trait]
impl TagService for InMemoryBackend {
    async fn get_all(&self) -> CoreResult<Vec<Tag>> {
        self.check_available()?;
        Ok(self.lock().tags.clone())
    }
}

#[async_trait]
impl TransactionService for InMemoryBackend {
    async fn list(&self) -> CoreResult<Vec<Transaction>> {
        self.check_available()?;
        Ok(self.transactions())
    }

    async fn get_all_descriptions(&self) -> CoreResult<Vec<String>> {
        self.check_available()?;
        let descriptions: BTreeSet<String> = self
            .lock()
            .transactions
            .iter()
            .filter_map(|t| t.description.clone())
            .collect();
        Ok(descriptions.into_iter().collect())
    }

    async fn skeleton(&self) -> CoreResult<Transaction> {
        self.check_available()?;
        Ok(self.skeleton_now())
    }

    async fn get(&self, id: i64) -> CoreResult<Transaction> {
        self.check_available()?;
        let state = self.lock();
        let index = state.position(id)?;
        Ok(state.transactions[index].clone())
    }

    async fn create(&self, transaction: &Transaction) -> CoreResult<Transaction> {
        self.lock().calls.push(BackendCall::Create(transaction.clone()));
        self.check_available()?;
        Ok(self.lock().insert(transaction))
    }

    async fn update(&self, transaction: &Transaction) -> CoreResult<Transaction> {
        self.lock().calls.push(BackendCall::Update(transaction.clone()));
        self.check_available()?;
        let id = transaction.require_id()?;

        let mut state = self.lock();
        let index = state.position(id)?;
        state.transactions[index] = transaction.clone();
        Ok(transaction.clone())
    }

    async fn delete(&self, transaction: &Transaction) -> CoreResult<()> {
        let id = transaction.require_id()?;
        self.lock().calls.push(BackendCall::Delete(id));
        self.check_available()?;

        let mut state = self.lock();
        let index = state.position(id)?;
        state.transactions.remove(index);
        Ok(())
    }

    async fn create_batch(&self, transactions: &[Transaction]) -> CoreResult<()> {
        self.lock().calls.push(BackendCall::CreateBatch(transactions.to_vec()));
        self.check_available()?;

        let mut state = self.lock();
        for transaction in transactions {
            state.insert(transaction);
        }
        Ok(())
    }

    fn suggest_description(&self, descriptions: &[String], term: &str) -> Vec<String> {
        suggest_descriptions(descriptions, term, self.suggest_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_backend() {
        let backend = InMemoryBackend::seeded();
        assert_eq!(TransactionService::list(&backend).await.unwrap().len(), 4);

        let descriptions = backend.get_all_descriptions().await.unwrap();
        assert_eq!(descriptions[0], "Groceries");
        assert!(descriptions.contains(&"Salary".to_string()));
    }

    #[tokio::test]
    async fn test_skeleton_uses_first_account() {
        let backend = InMemoryBackend::seeded();
        let skeleton = backend.skeleton().await.unwrap();

        assert_eq!(skeleton.id, None);
        assert_eq!(skeleton.account_id, Some(1));
        assert_eq!(skeleton.transaction_type, Some(TransactionType::Expense));
        assert!(skeleton.tag_ids.is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let backend = InMemoryBackend::seeded();
        let created = backend
            .create(&Transaction { description: Some("Coffee".to_string()), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(created.id, Some(5));
        assert_eq!(backend.get(5).await.unwrap().description.as_deref(), Some("Coffee"));
    }

    #[tokio::test]
    async fn test_suggest_limit() {
        let backend = InMemoryBackend::seeded();
        let descriptions = backend.get_all_descriptions().await.unwrap();
        assert_eq!(backend.suggest_description(&descriptions, "a").len(), 2);

        let backend = InMemoryBackend::seeded().with_suggest_limit(1);
        assert_eq!(backend.suggest_description(&descriptions, "a"), vec!["Monthly savings".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_unknown_fails() {
        let backend = InMemoryBackend::seeded();
        let missing = Transaction { id: Some(77), ..Default::default() };
        assert!(matches!(
            backend.delete(&missing).await,
            Err(CoreError::TransactionNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_failing_backend_records_attempt() {
        let backend = InMemoryBackend::seeded();
        backend.fail_requests(true);

        let result = backend.create_batch(&[Transaction::default()]).await;
        assert!(result.is_err());
        assert_eq!(backend.calls().len(), 1);
        assert_eq!(backend.transactions().len(), 4);
    }
}
