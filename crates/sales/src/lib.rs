//! Sales module: order records, order drafts, and order-history export.
//!
//! Orders are plain values; stock bookkeeping for placed orders lives in the
//! inventory ledger, which owns the history.

pub mod export;
pub mod order;

pub use export::{ExportError, write_history_csv, write_history_json};
pub use order::{OrderDraft, OrderRecord, PriceLookup};
