//! CSV codec for the inventory store and for import sources.
//!
//! Both share the `categoria,nombre,precio,stock` row shape. File handles are
//! opened and released inside each call.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Writer};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use heladeria_core::Category;

use crate::error::{LedgerError, LedgerResult};
use crate::item::{Inventory, StockItem};

pub const STORE_HEADER: [&str; 4] = ["categoria", "nombre", "precio", "stock"];

#[derive(Debug, Deserialize)]
struct RawRow {
    categoria: String,
    nombre: String,
    precio: String,
    stock: String,
}

impl RawRow {
    fn numbers(&self) -> Result<(Decimal, i64), String> {
        let price: Decimal = self
            .precio
            .trim()
            .parse()
            .map_err(|e| format!("price {:?}: {e}", self.precio))?;
        if price < Decimal::ZERO {
            return Err(format!("price {:?} is negative", self.precio));
        }
        let stock = self
            .stock
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("stock {:?}: {e}", self.stock))?;
        Ok((price, stock))
    }
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Load the store into `inventory`, appending in file order.
///
/// Returns `Ok(None)` when the store does not exist. A malformed row stops the
/// read; rows before it stay in `inventory`.
pub(crate) fn read_store(path: &Path, inventory: &mut Inventory) -> LedgerResult<Option<usize>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(LedgerError::io(path, err)),
    };

    let mut reader = ReaderBuilder::new().from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| LedgerError::from_csv(path, e))?
        .clone();

    let mut record = StringRecord::new();
    let mut rows = 0;
    while reader
        .read_record(&mut record)
        .map_err(|e| LedgerError::from_csv(path, e))?
    {
        let line = record_line(&record);
        let malformed = |reason: String| LedgerError::MalformedRow { line, reason };

        let row: RawRow = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed(e.to_string()))?;
        let (price, stock) = row.numbers().map_err(malformed)?;

        let Some(category) = Category::from_tag(&row.categoria) else {
            debug!(line, tag = %row.categoria, "ignoring store row with unknown category");
            continue;
        };
        inventory.push(StockItem::new(category, row.nombre, price, stock));
        rows += 1;
    }

    Ok(Some(rows))
}

/// Overwrite the store with the full inventory, header first.
pub(crate) fn write_store(path: &Path, inventory: &Inventory) -> LedgerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LedgerError::io(parent, e))?;
    }

    let mut writer = Writer::from_path(path).map_err(|e| LedgerError::from_csv(path, e))?;
    writer
        .write_record(STORE_HEADER)
        .map_err(|e| LedgerError::from_csv(path, e))?;

    for (category, item) in inventory.entries() {
        let price = item.price().to_string();
        let stock = item.stock().to_string();
        writer
            .write_record([category.tag(), item.key(), price.as_str(), stock.as_str()])
            .map_err(|e| LedgerError::from_csv(path, e))?;
    }

    writer.flush().map_err(|e| LedgerError::io(path, e))
}

/// Parse an external import source into items, skipping rows with an unknown
/// category or unparseable numbers.
///
/// Fails only when the source cannot be opened or read at all, or when it has
/// data rows but lacks one of the four columns. An empty source, or one with
/// only a header, yields no items.
pub(crate) fn read_import(path: &Path) -> LedgerResult<Vec<StockItem>> {
    let file = File::open(path).map_err(|e| LedgerError::source_unreadable(path, e))?;

    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| LedgerError::source_unreadable(path, e))?
        .clone();

    let mut items = Vec::new();
    let mut record = StringRecord::new();
    if let Some(missing) = STORE_HEADER
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        let has_rows = reader
            .read_record(&mut record)
            .map_err(|e| LedgerError::source_unreadable(path, e))?;
        if !has_rows {
            debug!(column = %missing, "import source has no rows");
            return Ok(items);
        }
        return Err(LedgerError::source_unreadable(
            path,
            format!("missing column {missing:?}"),
        ));
    }

    loop {
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {}
            Err(err) if err.is_io_error() => {
                return Err(LedgerError::source_unreadable(path, err));
            }
            Err(err) => {
                debug!(error = %err, "skipping unreadable import row");
                continue;
            }
        }

        let line = record_line(&record);
        let row: RawRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(err) => {
                debug!(line, error = %err, "skipping incomplete import row");
                continue;
            }
        };
        let Some(category) = Category::parse_lenient(&row.categoria) else {
            debug!(line, tag = %row.categoria, "skipping import row with unknown category");
            continue;
        };
        match row.numbers() {
            Ok((price, stock)) => items.push(StockItem::new(category, row.nombre, price, stock)),
            Err(reason) => debug!(line, %reason, "skipping import row with unparseable numbers"),
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const STORE: &str = "categoria,nombre,precio,stock\n\
        sabores,Vainilla Nórdica,3.50,50\n\
        sabores,Menta Polar,4.25,0\n\
        envases,Cono,0.50,100\n\
        envases,Copa,0.75,-3\n\
        toppings,\"Nueces, tostadas\",0.75,40\n";

    #[test]
    fn missing_store_reads_as_none() {
        let dir = tempdir().unwrap();
        let mut inventory = Inventory::new();

        let rows = read_store(&dir.path().join("absent.csv"), &mut inventory).unwrap();
        assert_eq!(rows, None);
        assert!(inventory.is_empty());
    }

    #[test]
    fn read_then_write_round_trips_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventario.csv");
        fs::write(&path, STORE).unwrap();

        let mut inventory = Inventory::new();
        assert_eq!(read_store(&path, &mut inventory).unwrap(), Some(5));
        assert!(inventory.flavors()[0].is_available());
        assert!(!inventory.flavors()[1].is_available());
        assert_eq!(inventory.containers()[1].kind(), "Copa");

        write_store(&path, &inventory).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), STORE);
    }

    #[test]
    fn malformed_row_stops_read_and_keeps_earlier_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventario.csv");
        fs::write(
            &path,
            "categoria,nombre,precio,stock\n\
             sabores,Fresa,3.75,30\n\
             envases,Cono,barato,10\n\
             toppings,Nueces,0.75,40\n",
        )
        .unwrap();

        let mut inventory = Inventory::new();
        let err = read_store(&path, &mut inventory).unwrap_err();
        match err {
            LedgerError::MalformedRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("barato"));
            }
            other => panic!("Expected MalformedRow, got {other:?}"),
        }
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.flavors()[0].name(), "Fresa");
    }

    #[test]
    fn store_tags_are_case_sensitive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventario.csv");
        fs::write(&path, "categoria,nombre,precio,stock\nSABORES,Fresa,3.75,30\n").unwrap();

        let mut inventory = Inventory::new();
        assert_eq!(read_store(&path, &mut inventory).unwrap(), Some(0));
        assert!(inventory.is_empty());
    }

    #[test]
    fn write_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("inventario.csv");

        write_store(&path, &Inventory::new()).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "categoria,nombre,precio,stock\n"
        );
    }

    #[test]
    fn import_skips_unknown_categories_and_bad_numbers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import.csv");
        fs::write(
            &path,
            "categoria,nombre,precio,stock\n\
             SABORES,Vainilla,2.50,5\n\
             bebidas,Agua,1.00,10\n\
             Toppings,Nueces,gratis,3\n\
             envases,Copa,0.75,muchos\n\
             envases,Tarrina,-1.00,4\n\
             Envases,Cono,0.50,12\n",
        )
        .unwrap();

        let items = read_import(&path).unwrap();
        let keys: Vec<(Category, &str)> = items.iter().map(|i| (i.category(), i.key())).collect();
        assert_eq!(
            keys,
            vec![(Category::Flavor, "Vainilla"), (Category::Container, "Cono")]
        );
    }

    #[test]
    fn import_of_missing_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let err = read_import(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LedgerError::SourceUnreadable { .. }));
    }

    #[test]
    fn empty_import_yields_no_items() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import.csv");

        fs::write(&path, "").unwrap();
        assert!(read_import(&path).unwrap().is_empty());

        fs::write(&path, "categoria,nombre,precio,stock\n").unwrap();
        assert!(read_import(&path).unwrap().is_empty());
    }

    #[test]
    fn import_without_required_columns_is_unreadable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import.csv");
        fs::write(&path, "name,price\nVainilla,2.50\n").unwrap();

        let err = read_import(&path).unwrap_err();
        match err {
            LedgerError::SourceUnreadable { reason, .. } => assert!(reason.contains("categoria")),
            other => panic!("Expected SourceUnreadable, got {other:?}"),
        }
    }
}
