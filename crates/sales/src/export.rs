//! Order-history export (CSV and JSON).
//!
//! Reads a borrowed view of the history; never touches the ledger itself.

use std::io::Write;

use thiserror::Error;

use crate::order::OrderRecord;

const CSV_HEADER: [&str; 7] = ["ID", "Fecha", "Sabor", "Envase", "Toppings", "Cantidad", "Total"];
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no orders to export")]
    Empty,
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn ensure_not_empty(orders: &[OrderRecord]) -> Result<(), ExportError> {
    if orders.is_empty() {
        return Err(ExportError::Empty);
    }
    Ok(())
}

/// Write the history as CSV, one line per order. Toppings are joined with ", ".
pub fn write_history_csv<W: Write>(writer: W, orders: &[OrderRecord]) -> Result<(), ExportError> {
    ensure_not_empty(orders)?;

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for order in orders {
        wtr.write_record([
            order.id.to_string(),
            order.date.format(DATE_FORMAT).to_string(),
            order.flavor.clone(),
            order.container.clone(),
            order.toppings.join(", "),
            order.quantity.to_string(),
            order.total.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the history as a pretty-printed JSON array of records.
pub fn write_history_json<W: Write>(writer: W, orders: &[OrderRecord]) -> Result<(), ExportError> {
    ensure_not_empty(orders)?;
    serde_json::to_writer_pretty(writer, orders)?;
    Ok(())
}
