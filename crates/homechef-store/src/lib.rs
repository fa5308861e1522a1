//! # homechef-store
//!
//! SQLite persistence for the HomeChef marketplace.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection`, runs schema migrations on open, and provides typed
//! query helpers for every table. Order creation is the only multi-statement
//! write and runs inside a single transaction.

pub mod chefs;
pub mod customers;
pub mod database;
pub mod dishes;
pub mod feedback;
pub mod migrations;
pub mod models;
pub mod orders;
pub mod reports;
pub mod saved_recipes;

mod error;
#[cfg(test)]
mod testing;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
