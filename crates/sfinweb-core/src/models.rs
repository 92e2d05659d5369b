//! Core data models exchanged with the sfinapp service

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Tag attached to transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Account a transaction is booked on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Transaction type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money leaving an account
    Expense,
    /// Money arriving on an account
    Income,
    /// Money moved between two accounts
    Transfer,
}

impl TransactionType {
    /// All types in the order forms offer them
    pub const ALL: [TransactionType; 3] = [
        TransactionType::Expense,
        TransactionType::Income,
        TransactionType::Transfer,
    ];
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            "transfer" => Ok(TransactionType::Transfer),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Expense => write!(f, "Expense"),
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Transfer => write!(f, "Transfer"),
        }
    }
}

/// Transaction record
///
/// Every field is optional so that the skeleton handed out by the service
/// (and untouched form rows derived from it) compare equal field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Service-assigned identifier, absent until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Booking date
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub account_id: Option<i64>,
    /// Target account of a transfer
    #[serde(default)]
    pub to_account_id: Option<i64>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

impl Transaction {
    /// Type as stored, or derived from the transfer target and amount sign
    pub fn effective_type(&self) -> TransactionType {
        if let Some(transaction_type) = self.transaction_type {
            return transaction_type;
        }
        if self.to_account_id.is_some() {
            return TransactionType::Transfer;
        }
        match self.amount {
            Some(amount) if amount > Decimal::ZERO => TransactionType::Income,
            _ => TransactionType::Expense,
        }
    }

    /// Identifier required by update and delete
    pub fn require_id(&self) -> Result<i64, CoreError> {
        self.id.ok_or_else(|| CoreError::Validation {
            message: "Transaction has no id; it must be created first".to_string(),
        })
    }

    /// Check if the transaction carries a given tag
    pub fn has_tag(&self, tag_id: i64) -> bool {
        self.tag_ids.contains(&tag_id)
    }
}

/// Route parameter of the transaction detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionId {
    /// `new`: the create path, seeded from the skeleton
    New,
    /// An existing transaction loaded by id
    Existing(i64),
}

impl TransactionId {
    pub fn is_new(&self) -> bool {
        matches!(self, TransactionId::New)
    }
}

impl std::str::FromStr for TransactionId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "new" {
            return Ok(TransactionId::New);
        }
        s.parse::<i64>()
            .map(TransactionId::Existing)
            .map_err(|_| CoreError::InvalidRoute { value: s.to_string() })
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionId::New => write!(f, "new"),
            TransactionId::Existing(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transaction_json_shape() {
        let json = r#"{
            "id": 7,
            "date": "2024-06-15",
            "type": "Expense",
            "amount": -12.5,
            "description": "Groceries",
            "accountId": 1,
            "toAccountId": null,
            "tagIds": [2, 3]
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(tx.id, Some(7));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 6, 15));
        assert_eq!(tx.transaction_type, Some(TransactionType::Expense));
        assert_eq!(tx.amount, Some(Decimal::from_str("-12.5").unwrap()));
        assert_eq!(tx.account_id, Some(1));
        assert!(tx.has_tag(3));

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["accountId"], 1);
        assert_eq!(value["type"], "Expense");
    }

    #[test]
    fn test_skeleton_json_tolerates_missing_fields() {
        let tx: Transaction = serde_json::from_str(r#"{"type": "Expense", "tagIds": []}"#).unwrap();
        assert_eq!(tx.id, None);
        assert_eq!(tx.amount, None);

        let value = serde_json::to_value(&tx).unwrap();
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_effective_type() {
        let mut tx = Transaction::default();
        assert_eq!(tx.effective_type(), TransactionType::Expense);

        tx.amount = Some(Decimal::new(1000, 2));
        assert_eq!(tx.effective_type(), TransactionType::Income);

        tx.to_account_id = Some(2);
        assert_eq!(tx.effective_type(), TransactionType::Transfer);

        tx.transaction_type = Some(TransactionType::Expense);
        assert_eq!(tx.effective_type(), TransactionType::Expense);
    }

    #[test]
    fn test_require_id() {
        let tx = Transaction::default();
        assert!(matches!(tx.require_id(), Err(CoreError::Validation { .. })));

        let tx = Transaction { id: Some(3), ..Default::default() };
        assert_eq!(tx.require_id().unwrap(), 3);
    }

    #[test]
    fn test_transaction_id_from_str() {
        assert_eq!("new".parse::<TransactionId>().unwrap(), TransactionId::New);
        assert_eq!("42".parse::<TransactionId>().unwrap(), TransactionId::Existing(42));
        assert!(matches!(
            "abc".parse::<TransactionId>(),
            Err(CoreError::InvalidRoute { .. })
        ));
        assert_eq!(TransactionId::Existing(42).to_string(), "42");
    }

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!("expense".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert_eq!("Income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert!("refund".parse::<TransactionType>().is_err());
    }
}
