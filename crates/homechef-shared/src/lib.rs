//! # homechef-shared
//!
//! Vocabulary shared by the store and the HTTP server: order lifecycle
//! states, identity roles, dish category tags, password hashing and the
//! signed login token.

pub mod constants;
pub mod error;
pub mod password;
pub mod token;
pub mod types;

pub use types::{CategoryTags, OrderStatus, Role};
