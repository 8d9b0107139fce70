//! Account module

mod api;
mod models;

pub use models::Account;
