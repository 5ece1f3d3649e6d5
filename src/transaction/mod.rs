//! Transaction management for the cash-flow dashboard.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `NewTransaction` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - View handlers for the transaction pages and the JSON API

mod api;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod form;
mod transactions_page;

pub use api::{
    create_transaction_api_endpoint, delete_transaction_api_endpoint, get_transaction_endpoint,
    list_transactions_endpoint, update_transaction_endpoint,
};
pub use core::{
    NewTransaction, Transaction, TransactionFilter, TransactionKind, TransactionPatch,
    check_amount, create_transaction, create_transaction_table, delete_transaction, get_transaction,
    list_transactions, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use transactions_page::get_transactions_page;

#[cfg(test)]
pub use core::count_transactions;
