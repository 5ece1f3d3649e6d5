//! Defines the debtor model and its database queries.

use std::{fmt, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, database_id::DebtorId};

/// Where a debt is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtorStatus {
    /// Not paid yet and not past its due date.
    #[default]
    Pending,
    /// Settled.
    Paid,
    /// Not paid by its due date.
    Overdue,
}

impl DebtorStatus {
    /// The lowercase name used in the database and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            DebtorStatus::Pending => "pending",
            DebtorStatus::Paid => "paid",
            DebtorStatus::Overdue => "overdue",
        }
    }

    /// The name shown on the debtors page.
    pub fn label(self) -> &'static str {
        match self {
            DebtorStatus::Pending => "Pending",
            DebtorStatus::Paid => "Paid",
            DebtorStatus::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for DebtorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The text did not name a [DebtorStatus].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown debtor status \"{0}\"")]
pub struct ParseStatusError(String);

impl FromStr for DebtorStatus {
    type Err = ParseStatusError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "pending" => Ok(DebtorStatus::Pending),
            "paid" => Ok(DebtorStatus::Paid),
            "overdue" => Ok(DebtorStatus::Overdue),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

impl ToSql for DebtorStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for DebtorStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse::<DebtorStatus>()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Someone who owes money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debtor {
    /// The ID of the debtor.
    pub id: DebtorId,
    /// Who owes the money.
    pub name: String,
    /// An optional email address to reach them.
    pub email: Option<String>,
    /// An optional phone number to reach them.
    pub phone: Option<String>,
    /// How much is owed.
    pub amount: f64,
    /// Whether the debt has been paid.
    pub status: DebtorStatus,
    /// When the debt should be paid by.
    pub due_date: Option<Date>,
    /// When the debtor was stored.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the debtor was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A debtor that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDebtor {
    /// Who owes the money.
    pub name: String,
    /// An optional email address.
    #[serde(default)]
    pub email: Option<String>,
    /// An optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// How much is owed.
    pub amount: f64,
    /// Defaults to pending.
    #[serde(default)]
    pub status: DebtorStatus,
    /// When the debt should be paid by.
    #[serde(default)]
    pub due_date: Option<Date>,
}

impl NewDebtor {
    /// A pending debt with no contact details or due date.
    pub fn new(name: &str, amount: f64) -> Self {
        Self {
            name: name.to_owned(),
            email: None,
            phone: None,
            amount,
            status: DebtorStatus::Pending,
            due_date: None,
        }
    }

    /// Set the status of the debt.
    pub fn status(mut self, status: DebtorStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the due date.
    pub fn due_date(mut self, due_date: Date) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the contact email.
    pub fn email(mut self, email: &str) -> Self {
        self.email = Some(email.to_owned());
        self
    }
}

/// A partial update to a stored debtor. Fields left as `None` are kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DebtorPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub amount: Option<f64>,
    pub status: Option<DebtorStatus>,
    pub due_date: Option<Date>,
}

/// Filters for [list_debtors]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DebtorFilter {
    pub status: Option<DebtorStatus>,
}

const DEBTOR_COLUMNS: &str =
    "id, name, email, phone, amount, status, due_date, created_at, updated_at";

/// Store a new debtor.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_debtor(debtor: NewDebtor, connection: &Connection) -> Result<Debtor, Error> {
    let now = OffsetDateTime::now_utc();

    let debtor = connection
        .prepare(&format!(
            "INSERT INTO debtor (name, email, phone, amount, status, due_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING {DEBTOR_COLUMNS}"
        ))?
        .query_row(
            (
                debtor.name,
                debtor.email,
                debtor.phone,
                debtor.amount,
                debtor.status,
                debtor.due_date,
                now,
            ),
            map_debtor_row,
        )?;

    Ok(debtor)
}

/// Retrieve a debtor by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid debtor,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_debtor(id: DebtorId, connection: &Connection) -> Result<Debtor, Error> {
    let debtor = connection
        .prepare(&format!("SELECT {DEBTOR_COLUMNS} FROM debtor WHERE id = :id"))?
        .query_one(&[(":id", &id)], map_debtor_row)?;

    Ok(debtor)
}

/// Get the debtors matching `filter`, ordered by name.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_debtors(filter: &DebtorFilter, connection: &Connection) -> Result<Vec<Debtor>, Error> {
    connection
        .prepare(&format!(
            "SELECT {DEBTOR_COLUMNS} FROM debtor
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY name ASC, id ASC"
        ))?
        .query_map((filter.status,), map_debtor_row)?
        .map(|maybe_debtor| maybe_debtor.map_err(Error::from))
        .collect()
}

/// Apply `patch` to the debtor with `id` and refresh its update timestamp.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingDebtor] if `id` does not refer to a valid debtor,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_debtor(
    id: DebtorId,
    patch: &DebtorPatch,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE debtor SET
            name = COALESCE(?1, name),
            email = COALESCE(?2, email),
            phone = COALESCE(?3, phone),
            amount = COALESCE(?4, amount),
            status = COALESCE(?5, status),
            due_date = COALESCE(?6, due_date),
            updated_at = ?7
         WHERE id = ?8",
        (
            &patch.name,
            &patch.email,
            &patch.phone,
            patch.amount,
            patch.status,
            patch.due_date,
            OffsetDateTime::now_utc(),
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingDebtor);
    }

    Ok(())
}

/// Delete the debtor with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingDebtor] if `id` does not refer to a valid debtor,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_debtor(id: DebtorId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM debtor WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingDebtor);
    }

    Ok(())
}

/// Create the debtor table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_debtor_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS debtor (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT,
                phone TEXT,
                amount REAL NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('pending', 'paid', 'overdue')),
                due_date TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn map_debtor_row(row: &Row) -> Result<Debtor, rusqlite::Error> {
    Ok(Debtor {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        amount: row.get(4)?,
        status: row.get(5)?,
        due_date: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
