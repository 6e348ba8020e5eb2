//! Inventory ledger.
//!
//! Owns the categorized stock (flavors, containers, toppings), persists it to
//! a CSV store with save-through on every mutation, keeps the in-memory order
//! history, and merge-imports external CSV sources.

pub mod config;
pub mod error;
pub mod item;
pub mod ledger;
mod store;

pub use config::{LedgerConfig, RestockPolicy};
pub use error::{LedgerError, LedgerResult};
pub use item::{Container, Flavor, Inventory, StockItem, Stocked, Topping};
pub use ledger::InventoryLedger;
pub use store::STORE_HEADER;
