//! People who owe money, stored alongside transactions but not aggregated.

mod api;
mod core;
mod debtors_page;

pub use api::{
    create_debtor_endpoint, delete_debtor_endpoint, get_debtor_endpoint, list_debtors_endpoint,
    update_debtor_endpoint,
};
pub use core::{
    Debtor, DebtorFilter, DebtorPatch, DebtorStatus, NewDebtor, create_debtor,
    create_debtor_table, delete_debtor, get_debtor, list_debtors, update_debtor,
};
pub use debtors_page::get_debtors_page;
