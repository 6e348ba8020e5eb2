//! `heladeria-core` — shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no storage).

pub mod category;
pub mod error;
pub mod id;

pub use category::Category;
pub use error::{DomainError, DomainResult};
pub use id::OrderId;
