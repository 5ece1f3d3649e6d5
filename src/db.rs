//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{debtor::create_debtor_table, transaction::create_transaction_table};

/// Create the tables for all domain models if they do not exist yet.
///
/// The tables are created in a single exclusive transaction, so a failure
/// leaves the database untouched.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;
    create_debtor_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
