//! User-defined categories for grouping transactions, e.g. "Groceries" or "Salary".

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_category, create_category_table, delete_category, get_categories, get_category,
    rename_category,
};
pub use domain::{Category, CategoryForm, CategoryName};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
    rename_category_endpoint,
};
