//! Form binding
//!
//! Transaction fields are posted as `date`, `type`, `amount`, `description`,
//! `account`, `to_account` and `tags` (repeated). Batch rows carry a `.{row}`
//! suffix, e.g. `amount.3`. Empty values bind to `None`, so an untouched row
//! binds back to the transaction it was rendered from. The batch form also
//! carries the skeleton its rows were copied from as `skeleton.{field}`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sfinweb_core::{Transaction, TransactionBatchController, TransactionType};
use std::str::FromStr;

use crate::error::{ApiError, ApiResult};

pub const FIELD_DATE: &str = "date";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_ACCOUNT: &str = "account";
pub const FIELD_TO_ACCOUNT: &str = "to_account";
pub const FIELD_TAGS: &str = "tags";

/// Prefix of the hidden fields holding the batch skeleton
pub const SKELETON_PREFIX: &str = "skeleton.";

/// Upper bound on batch rows a single form may carry
pub const MAX_BATCH_ROWS: usize = 500;

/// Submitted form fields in posting order
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// First value of a field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Checkbox-like flag: `true`, `on` or `1`
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some("true" | "on" | "1"))
    }

    /// Value of the first field whose name starts with `prefix`
    pub fn get_prefixed(&self, prefix: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.starts_with(prefix))
            .map(|(_, value)| value.as_str())
    }

    /// Check if any field of a batch row was posted
    pub fn has_row(&self, row: usize) -> bool {
        let suffix = format!(".{}", row);
        self.fields.iter().any(|(key, _)| key.ends_with(&suffix))
    }

    /// Highest row suffix present, if any
    fn max_row(&self) -> Option<usize> {
        self.fields
            .iter()
            .filter_map(|(key, _)| key.rsplit_once('.'))
            .filter_map(|(_, row)| row.parse::<usize>().ok())
            .max()
    }
}

/// Name of a transaction field, with the row suffix for batch rows
pub fn field_name(field: &str, row: Option<usize>) -> String {
    match row {
        Some(row) => format!("{}.{}", field, row),
        None => field.to_string(),
    }
}

/// Name of a hidden field carrying the batch skeleton
pub fn skeleton_field_name(field: &str) -> String {
    format!("{}{}", SKELETON_PREFIX, field)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a field; a rejected value is recorded and leaves `target` alone
fn bind_field<T: FromStr>(form: &FormData, name: &str, target: &mut Option<T>, errors: &mut Vec<String>) {
    match non_empty(form.get(name)) {
        None => *target = None,
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => *target = Some(parsed),
            Err(_) => errors.push(format!("Invalid {}: {}", name, value)),
        },
    }
}

fn bind(form: &FormData, name: impl Fn(&str) -> String, transaction: &mut Transaction, errors: &mut Vec<String>) {
    let date_name = name(FIELD_DATE);
    match non_empty(form.get(&date_name)) {
        None => transaction.date = None,
        Some(value) => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => transaction.date = Some(date),
            Err(_) => errors.push(format!("Invalid {}: {}", date_name, value)),
        },
    }
    bind_field(form, &name(FIELD_TYPE), &mut transaction.transaction_type, errors);
    bind_field(form, &name(FIELD_AMOUNT), &mut transaction.amount, errors);
    transaction.description = non_empty(form.get(&name(FIELD_DESCRIPTION))).map(str::to_string);
    bind_field(form, &name(FIELD_ACCOUNT), &mut transaction.account_id, errors);
    bind_field(form, &name(FIELD_TO_ACCOUNT), &mut transaction.to_account_id, errors);

    let tags_name = name(FIELD_TAGS);
    transaction.tag_ids.clear();
    for value in form.get_all(&tags_name) {
        match value.trim().parse::<i64>() {
            Ok(tag_id) if !transaction.tag_ids.contains(&tag_id) => transaction.tag_ids.push(tag_id),
            Ok(_) => {}
            Err(_) => errors.push(format!("Invalid {}: {}", tags_name, value)),
        }
    }
}

/// Bind the posted fields of one transaction onto `transaction`
///
/// Returns one message per rejected value; those fields keep their previous
/// value. The id is never taken from the form.
pub fn apply_transaction(form: &FormData, row: Option<usize>, transaction: &mut Transaction) -> Vec<String> {
    let mut errors = Vec::new();
    bind(form, |field| field_name(field, row), transaction, &mut errors);
    errors
}

/// Replace `skeleton` with the one the batch form was rendered from
///
/// Forms without `skeleton.*` fields leave it untouched.
pub fn apply_skeleton(form: &FormData, skeleton: &mut Transaction) -> ApiResult<()> {
    if form.get_prefixed(SKELETON_PREFIX).is_none() {
        return Ok(());
    }

    let mut errors = Vec::new();
    bind(form, skeleton_field_name, skeleton, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::bad_request(errors.join("; ")))
    }
}

/// Number of rows a batch form carries
///
/// Taken from the `rows` field; falls back to the highest row suffix.
pub fn batch_row_count(form: &FormData) -> ApiResult<usize> {
    let rows = match non_empty(form.get("rows")) {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| ApiError::bad_request(format!("Invalid rows: {}", value)))?,
        None => form.max_row().map_or(0, |row| row + 1),
    };

    if rows > MAX_BATCH_ROWS {
        return Err(ApiError::bad_request(format!(
            "Too many rows: {} (at most {})",
            rows, MAX_BATCH_ROWS
        )));
    }
    if let Some(row) = form.max_row() {
        if row >= rows {
            return Err(ApiError::bad_request(format!("Row {} out of range", row)));
        }
    }
    Ok(rows)
}

/// Grow the controller to the posted row count and bind every posted row
///
/// Rows without any posted field keep their skeleton values. A malformed row
/// count fails; rejected field values are returned.
pub fn apply_batch(form: &FormData, controller: &mut TransactionBatchController) -> ApiResult<Vec<String>> {
    let rows = batch_row_count(form)?;
    if rows > controller.row_count() {
        controller.extend_transaction_list(rows - controller.row_count());
    }

    let mut errors = Vec::new();
    for (row, transaction) in controller.transactions_mut().iter_mut().enumerate().take(rows) {
        if form.has_row(row) {
            errors.extend(apply_transaction(form, Some(row), transaction));
        }
    }
    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> FormData {
        FormData::new(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn skeleton() -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 6, 15),
            transaction_type: Some(TransactionType::Expense),
            account_id: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_untouched_row_binds_to_skeleton() {
        let posted = form(&[
            ("date.0", "2024-06-15"),
            ("type.0", "Expense"),
            ("amount.0", ""),
            ("description.0", ""),
            ("account.0", "1"),
            ("to_account.0", ""),
        ]);
        let mut tx = skeleton();
        assert!(apply_transaction(&posted, Some(0), &mut tx).is_empty());
        assert_eq!(tx, skeleton());
    }

    #[test]
    fn test_binds_every_field() {
        let posted = form(&[
            ("date", "2024-07-01"),
            ("type", "transfer"),
            ("amount", "-12.50"),
            ("description", " Savings "),
            ("account", "1"),
            ("to_account", "3"),
            ("tags", "2"),
            ("tags", "3"),
            ("tags", "2"),
        ]);
        let mut tx = Transaction { id: Some(9), tag_ids: vec![1], ..Default::default() };
        assert!(apply_transaction(&posted, None, &mut tx).is_empty());

        assert_eq!(tx.id, Some(9));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(tx.transaction_type, Some(TransactionType::Transfer));
        assert_eq!(tx.amount, Some(Decimal::new(-1250, 2)));
        assert_eq!(tx.description.as_deref(), Some("Savings"));
        assert_eq!(tx.to_account_id, Some(3));
        assert_eq!(tx.tag_ids, vec![2, 3]);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let posted = form(&[
            ("date", "15.06.2024"),
            ("amount", "12,5"),
            ("description", "Lunch"),
            ("tags", "food"),
            ("tags", "1"),
        ]);
        let mut tx = skeleton();
        let errors = apply_transaction(&posted, None, &mut tx);

        assert_eq!(
            errors,
            vec![
                "Invalid date: 15.06.2024".to_string(),
                "Invalid amount: 12,5".to_string(),
                "Invalid tags: food".to_string(),
            ]
        );
        // Valid fields still bind, rejected ones keep their value
        assert_eq!(tx.description.as_deref(), Some("Lunch"));
        assert_eq!(tx.tag_ids, vec![1]);
        assert_eq!(tx.date, skeleton().date);
    }

    #[test]
    fn test_skeleton_fields() {
        let posted = form(&[
            ("skeleton.date", "2024-06-14"),
            ("skeleton.type", "Expense"),
            ("skeleton.amount", ""),
            ("skeleton.description", ""),
            ("skeleton.account", "2"),
            ("skeleton.to_account", ""),
            ("rows", "1"),
        ]);
        let mut tx = skeleton();
        apply_skeleton(&posted, &mut tx).unwrap();
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 6, 14));
        assert_eq!(tx.account_id, Some(2));

        // Skeleton fields are not batch rows
        assert_eq!(batch_row_count(&posted).unwrap(), 1);
        assert!(!posted.has_row(0));

        let mut untouched = skeleton();
        apply_skeleton(&form(&[("rows", "1")]), &mut untouched).unwrap();
        assert_eq!(untouched, skeleton());

        let tampered = form(&[("skeleton.account", "one")]);
        assert!(matches!(
            apply_skeleton(&tampered, &mut skeleton()),
            Err(ApiError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_batch_row_count() {
        assert_eq!(batch_row_count(&form(&[("rows", "12")])).unwrap(), 12);
        assert_eq!(batch_row_count(&form(&[("amount.4", "1")])).unwrap(), 5);
        assert_eq!(batch_row_count(&form(&[])).unwrap(), 0);

        assert!(batch_row_count(&form(&[("rows", "2"), ("amount.5", "1")])).is_err());
        assert!(batch_row_count(&form(&[("rows", "100000")])).is_err());
    }

    #[test]
    fn test_has_row() {
        let posted = form(&[("rows", "12"), ("amount.1", ""), ("tags.11", "2")]);
        assert!(posted.has_row(1));
        assert!(posted.has_row(11));
        assert!(!posted.has_row(0));
        assert!(!posted.has_row(2));
    }

    #[test]
    fn test_flag() {
        assert!(form(&[("confirmed", "true")]).flag("confirmed"));
        assert!(!form(&[("confirmed", "false")]).flag("confirmed"));
        assert!(!form(&[]).flag("confirmed"));
    }
}
