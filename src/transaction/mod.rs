//! Transaction management for the finance tracker.
//!
//! This module contains:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing and managing a user's transactions
//! - JSON route handlers for the transaction endpoints

mod core;
mod endpoints;
mod kind;

pub use core::{
    Transaction, TransactionBuilder, create_transaction, create_transaction_table,
    delete_transaction, get_transaction, map_transaction_row, update_transaction,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
    update_transaction_endpoint,
};
pub use kind::TransactionKind;
