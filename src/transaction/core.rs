//! Defines the core data models and database queries for transactions.

use std::{fmt, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    #[default]
    Expense,
}

impl TransactionKind {
    /// The lowercase name used in the database, JSON and query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// The capitalised name shown to users.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is neither "income" nor "expense".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction kind \"{0}\"")]
pub struct ParseKindError(String);

impl FromStr for TransactionKind {
    type Err = ParseKindError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(ParseKindError(other.to_owned())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The amount of money, always non-negative.
    pub amount: f64,
    /// The expense category, e.g. "Food". May be empty.
    pub category: String,
    /// Where income came from, e.g. "Salary". May be empty.
    pub source: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(
        kind: TransactionKind,
        amount: f64,
        date: Date,
        description: &str,
    ) -> NewTransaction {
        NewTransaction {
            kind,
            amount,
            date,
            description: description.to_owned(),
            category: String::new(),
            source: String::new(),
        }
    }
}

/// A transaction that has not been stored yet.
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::{Transaction, TransactionKind};
///
/// let groceries = Transaction::build(
///         TransactionKind::Expense,
///         45.99,
///         date!(2025 - 01 - 15),
///         "Weekly shop",
///     )
///     .category("Food");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTransaction {
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The amount of money.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    #[serde(default)]
    pub description: String,
    /// The expense category.
    #[serde(default)]
    pub category: String,
    /// Where income came from.
    #[serde(default)]
    pub source: String,
}

impl NewTransaction {
    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.category);
        self
    }

    /// Set the source for the transaction.
    pub fn source(mut self, source: &str) -> Self {
        source.clone_into(&mut self.source);
        self
    }
}

/// A partial update to a stored transaction. Fields left as `None` are kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionPatch {
    /// The new kind.
    pub kind: Option<TransactionKind>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new category.
    pub category: Option<String>,
    /// The new source.
    pub source: Option<String>,
    /// The new description.
    pub description: Option<String>,
    /// The new date.
    pub date: Option<Date>,
}

/// Check that `amount` is a positive, finite number.
///
/// # Errors
/// Returns [Error::InvalidAmount] otherwise.
pub fn check_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

/// Equality filters for [list_transactions]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransactionFilter {
    /// Only include transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Only include transactions with exactly this category.
    pub category: Option<String>,
    /// Only include transactions with exactly this source.
    pub source: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str =
    "id, kind, amount, category, source, description, date, created_at, updated_at";

/// Create a new transaction in the database.
///
/// The creation and update timestamps are both set to the current time.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (kind, amount, category, source, description, date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                transaction.kind,
                transaction.amount,
                transaction.category,
                transaction.source,
                transaction.description,
                transaction.date,
                now,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the transactions matching `filter`, most recent date first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE (?1 IS NULL OR kind = ?1)
               AND (?2 IS NULL OR category = ?2)
               AND (?3 IS NULL OR source = ?3)
             ORDER BY date DESC, id DESC"
        ))?
        .query_map(
            (filter.kind, &filter.category, &filter.source),
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Apply `patch` to the transaction with `id` and refresh its update timestamp.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    patch: &TransactionPatch,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\" SET
            kind = COALESCE(?1, kind),
            amount = COALESCE(?2, amount),
            category = COALESCE(?3, category),
            source = COALESCE(?4, source),
            description = COALESCE(?5, description),
            date = COALESCE(?6, date),
            updated_at = ?7
         WHERE id = ?8",
        (
            patch.kind,
            patch.amount,
            &patch.category,
            &patch.source,
            &patch.description,
            patch.date,
            OffsetDateTime::now_utc(),
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete the transaction with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                amount REAL NOT NULL,
                category TEXT NOT NULL DEFAULT '',
                source TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        kind: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        source: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod kind_tests {
    use super::TransactionKind;

    #[test]
    fn parses_lowercase_names_only() {
        assert_eq!("income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!("expense".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("Income".parse::<TransactionKind>().is_err());
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn serializes_as_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Income).unwrap(),
            "\"income\""
        );
        assert_eq!(
            serde_json::from_str::<TransactionKind>("\"expense\"").unwrap(),
            TransactionKind::Expense
        );
    }
}
