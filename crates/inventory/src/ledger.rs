//! The inventory ledger: categorized stock plus the order history.
//!
//! Stock lives in memory and is written through to the CSV store on every
//! mutation before the operation returns. The order history is in-memory only.
//! Store failures are logged here and returned to the caller; nothing panics
//! on disk errors.

use std::path::Path;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use heladeria_core::Category;
use heladeria_sales::{OrderDraft, OrderRecord};

use crate::config::LedgerConfig;
use crate::error::LedgerResult;
use crate::item::{Inventory, Merge};
use crate::store;

#[derive(Debug)]
pub struct InventoryLedger {
    config: LedgerConfig,
    inventory: Inventory,
    history: Vec<OrderRecord>,
}

impl InventoryLedger {
    /// An empty ledger that has not read its store yet.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            inventory: Inventory::new(),
            history: Vec::new(),
        }
    }

    /// Build a ledger and load its store.
    ///
    /// A failed load is logged and the ledger keeps whatever was read before
    /// the failure.
    pub fn open(config: LedgerConfig) -> Self {
        let mut ledger = Self::new(config);
        if let Err(err) = ledger.load() {
            warn!(error = %err, "continuing with partially loaded inventory");
        }
        ledger
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn history(&self) -> &[OrderRecord] {
        &self.history
    }

    /// Sum of order totals across the history.
    pub fn sales_total(&self) -> Decimal {
        self.history.iter().map(|order| order.total).sum()
    }

    /// Rebuild all collections from the store.
    ///
    /// A missing store leaves the ledger empty. A malformed row stops the
    /// load; rows read before it stay.
    pub fn load(&mut self) -> LedgerResult<()> {
        self.inventory.clear();
        let path = &self.config.store_path;

        match store::read_store(path, &mut self.inventory) {
            Ok(Some(rows)) => {
                info!(path = %path.display(), rows, "inventory loaded");
                Ok(())
            }
            Ok(None) => {
                info!(path = %path.display(), "inventory store not found; starting empty");
                Ok(())
            }
            Err(err) => {
                error!(
                    path = %path.display(),
                    error = %err,
                    kept = self.inventory.len(),
                    "inventory load aborted"
                );
                Err(err)
            }
        }
    }

    /// Overwrite the store with the current collections.
    ///
    /// On failure the in-memory state is kept and the store is stale.
    pub fn save(&self) -> LedgerResult<()> {
        let path = &self.config.store_path;
        store::write_store(path, &self.inventory).inspect_err(|err| {
            error!(path = %path.display(), error = %err, "inventory save failed");
        })?;
        debug!(path = %path.display(), items = self.inventory.len(), "inventory saved");
        Ok(())
    }

    /// Add `delta` to an item's stock and persist.
    ///
    /// Returns the new stock, or `None` (without touching the store) when no
    /// item matches `key` exactly. Stock may go negative.
    pub fn update_stock(
        &mut self,
        category: Category,
        key: &str,
        delta: i64,
    ) -> LedgerResult<Option<i64>> {
        let Some(stock) = self.inventory.adjust(category, key, delta) else {
            debug!(%category, key, "stock update for unknown item ignored");
            return Ok(None);
        };
        self.save()?;
        Ok(Some(stock))
    }

    /// Append to the history. Stock is not checked or touched.
    pub fn add_order(&mut self, order: OrderRecord) {
        self.history.push(order);
    }

    /// Add `quantity` to every item, then persist once.
    ///
    /// Flavor availability follows the configured `RestockPolicy`.
    pub fn restock_all(&mut self, quantity: i64) -> LedgerResult<()> {
        self.inventory.restock(quantity, self.config.restock_policy);
        info!(
            quantity,
            items = self.inventory.len(),
            policy = ?self.config.restock_policy,
            "inventory restocked"
        );
        self.save()
    }

    /// Merge an external CSV into the inventory.
    ///
    /// Known items accumulate the imported stock and keep their price; new
    /// items are appended. Returns the number of rows merged. Persists once,
    /// and only when at least one row was merged.
    pub fn import_merge(&mut self, source: impl AsRef<Path>) -> LedgerResult<usize> {
        let source = source.as_ref();
        let items = store::read_import(source).inspect_err(|err| {
            error!(source = %source.display(), error = %err, "import failed");
        })?;

        let (mut accumulated, mut created) = (0usize, 0usize);
        for item in items {
            match self.inventory.merge(item) {
                Merge::Accumulated => accumulated += 1,
                Merge::Created => created += 1,
            }
        }

        let merged = accumulated + created;
        info!(source = %source.display(), accumulated, created, "import merged");
        if merged > 0 {
            self.save()?;
        }
        Ok(merged)
    }

    /// Price a draft, take its components out of stock, and record it.
    ///
    /// Stock is not checked and may go negative. The store is written once;
    /// if that write fails the order is still in the history.
    pub fn place_order(&mut self, draft: OrderDraft) -> LedgerResult<OrderRecord> {
        let total = draft.quote(&self.inventory)?;
        let delta = -i64::from(draft.quantity);

        self.inventory.adjust(Category::Flavor, &draft.flavor, delta);
        self.inventory
            .adjust(Category::Container, &draft.container, delta);
        for topping in &draft.toppings {
            self.inventory.adjust(Category::Topping, topping, delta);
        }

        let record = draft.into_record(total, Utc::now());
        info!(order_id = %record.id, total = %record.total, "order placed");
        self.add_order(record.clone());
        self.save()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use proptest::prelude::*;
    use tempfile::{TempDir, tempdir};

    use crate::config::RestockPolicy;
    use crate::error::LedgerError;
    use crate::item::{StockItem, Stocked};

    const STORE: &str = "categoria,nombre,precio,stock\n\
        sabores,Vainilla,2.50,3\n\
        sabores,Fresa,3.75,0\n\
        envases,Cono,0.50,100\n\
        toppings,Nueces,0.75,40\n";

    fn ledger_with(contents: Option<&str>) -> (TempDir, InventoryLedger) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventario.csv");
        if let Some(contents) = contents {
            fs::write(&path, contents).unwrap();
        }
        let ledger = InventoryLedger::open(LedgerConfig::new(path));
        (dir, ledger)
    }

    fn stored(ledger: &InventoryLedger) -> String {
        fs::read_to_string(&ledger.config().store_path).unwrap()
    }

    fn flavor(ledger: &InventoryLedger, name: &str) -> StockItem {
        ledger.inventory().find(Category::Flavor, name).unwrap()
    }

    #[test]
    fn open_loads_store_in_file_order() {
        let (_dir, ledger) = ledger_with(Some(STORE));

        let inventory = ledger.inventory();
        assert_eq!(inventory.len(), 4);
        assert_eq!(inventory.flavors()[0].name(), "Vainilla");
        assert!(inventory.flavors()[0].is_available());
        assert!(!inventory.flavors()[1].is_available());
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn load_rebuilds_from_scratch() {
        let (_dir, mut ledger) = ledger_with(Some(STORE));
        ledger.load().unwrap();
        ledger.load().unwrap();
        assert_eq!(ledger.inventory().len(), 4);
    }

    #[test]
    fn open_survives_malformed_store() {
        let (_dir, ledger) = ledger_with(Some(
            "categoria,nombre,precio,stock\nsabores,Fresa,3.75,30\nsabores,Menta,x,1\n",
        ));
        assert_eq!(ledger.inventory().len(), 1);
    }

    #[test]
    fn save_without_mutation_round_trips_store() {
        let (_dir, ledger) = ledger_with(Some(STORE));
        ledger.save().unwrap();
        assert_eq!(stored(&ledger), STORE);
    }

    #[test]
    fn save_failure_is_reported_and_state_kept() {
        let dir = tempdir().unwrap();
        // A directory where the store file should be.
        let path = dir.path().join("inventario.csv");
        fs::create_dir(&path).unwrap();

        let mut ledger = InventoryLedger::new(LedgerConfig::new(&path));
        ledger.inventory.push(StockItem::new(
            Category::Topping,
            "Nueces",
            Decimal::new(75, 2),
            1,
        ));

        let err = ledger.update_stock(Category::Topping, "Nueces", 2).unwrap_err();
        assert!(matches!(err, LedgerError::Io { .. }));
        assert_eq!(ledger.inventory().toppings()[0].stock(), 3);
    }

    #[test]
    fn update_stock_persists_before_returning() {
        let (_dir, mut ledger) = ledger_with(Some(STORE));

        let stock = ledger.update_stock(Category::Flavor, "Vainilla", -5).unwrap();
        assert_eq!(stock, Some(-2));
        assert_eq!(flavor(&ledger, "Vainilla").available(), Some(false));
        assert!(stored(&ledger).contains("sabores,Vainilla,2.50,-2\n"));
    }

    #[test]
    fn update_stock_on_unknown_item_is_a_no_op() {
        let (_dir, mut ledger) = ledger_with(None);

        let stock = ledger.update_stock(Category::Flavor, "Vanilla", 5).unwrap();
        assert_eq!(stock, None);
        assert!(ledger.inventory().is_empty());
        assert!(!ledger.config().store_path.exists());
    }

    #[test]
    fn add_order_does_not_touch_stock() {
        let (_dir, mut ledger) = ledger_with(Some(STORE));
        let record = OrderDraft::new("Vainilla", "Cono")
            .with_quantity(50)
            .into_record(Decimal::new(15000, 2), Utc::now());

        ledger.add_order(record.clone());
        assert_eq!(ledger.history(), &[record]);
        assert_eq!(flavor(&ledger, "Vainilla").stock(), 3);
    }

    #[test]
    fn restock_all_forces_flavors_available() {
        let (_dir, mut ledger) = ledger_with(Some(STORE));

        ledger.restock_all(10).unwrap();
        let fresa = flavor(&ledger, "Fresa");
        assert_eq!(fresa.stock(), 10);
        assert_eq!(fresa.available(), Some(true));
        assert!(stored(&ledger).contains("envases,Cono,0.50,110\n"));
    }

    #[test]
    fn restock_all_with_negative_quantity_under_each_policy() {
        let (_dir, mut ledger) = ledger_with(Some(STORE));
        ledger.restock_all(-5).unwrap();
        assert_eq!(flavor(&ledger, "Fresa").available(), Some(true));

        let dir = tempdir().unwrap();
        let path = dir.path().join("inventario.csv");
        fs::write(&path, STORE).unwrap();
        let config = LedgerConfig::new(path).with_restock_policy(RestockPolicy::DeriveFromStock);
        let mut ledger = InventoryLedger::open(config);
        ledger.restock_all(-5).unwrap();
        assert_eq!(flavor(&ledger, "Fresa").available(), Some(false));
        assert_eq!(flavor(&ledger, "Fresa").stock(), -5);
    }

    #[test]
    fn import_merge_accumulates_and_keeps_price() {
        let (dir, mut ledger) = ledger_with(Some(STORE));
        let source = dir.path().join("import.csv");
        fs::write(&source, "categoria,nombre,precio,stock\nsabores,Vainilla,9.99,4\n").unwrap();

        assert_eq!(ledger.import_merge(&source).unwrap(), 1);
        let vainilla = flavor(&ledger, "Vainilla");
        assert_eq!(vainilla.stock(), 7);
        assert_eq!(vainilla.price(), Decimal::new(250, 2));
        assert!(stored(&ledger).contains("sabores,Vainilla,2.50,7\n"));
    }

    #[test]
    fn import_merge_of_missing_source_fails_distinctly() {
        let (dir, mut ledger) = ledger_with(Some(STORE));
        let err = ledger.import_merge(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, LedgerError::SourceUnreadable { .. }));
        assert_eq!(ledger.inventory().len(), 4);
    }

    #[test]
    fn import_merge_of_empty_source_returns_zero() {
        let (dir, mut ledger) = ledger_with(Some(STORE));
        let source = dir.path().join("import.csv");

        fs::write(&source, "").unwrap();
        assert_eq!(ledger.import_merge(&source).unwrap(), 0);

        fs::write(&source, "name,price\n").unwrap();
        assert_eq!(ledger.import_merge(&source).unwrap(), 0);

        assert_eq!(ledger.inventory().len(), 4);
        assert_eq!(stored(&ledger), STORE);
    }

    #[test]
    fn import_merge_with_nothing_known_returns_zero_and_skips_save() {
        let (dir, mut ledger) = ledger_with(None);
        let source = dir.path().join("import.csv");
        fs::write(&source, "categoria,nombre,precio,stock\nbebidas,Agua,1.00,3\n").unwrap();

        assert_eq!(ledger.import_merge(&source).unwrap(), 0);
        assert!(!ledger.config().store_path.exists());
    }

    #[test]
    fn place_order_decrements_components_and_records_total() {
        let (_dir, mut ledger) = ledger_with(Some(STORE));
        let draft = OrderDraft::new("Vainilla", "Cono")
            .with_topping("Nueces")
            .with_quantity(2);

        let record = ledger.place_order(draft).unwrap();

        assert_eq!(record.total, Decimal::new(750, 2));
        assert_eq!(ledger.history(), &[record]);
        assert_eq!(flavor(&ledger, "Vainilla").stock(), 1);
        let inventory = ledger.inventory();
        assert_eq!(inventory.containers()[0].stock(), 98);
        assert_eq!(inventory.toppings()[0].stock(), 38);
        assert_eq!(ledger.sales_total(), Decimal::new(750, 2));
        assert!(stored(&ledger).contains("toppings,Nueces,0.75,38\n"));
    }

    #[test]
    fn place_order_rejects_unknown_items_without_side_effects() {
        let (_dir, mut ledger) = ledger_with(Some(STORE));
        let draft = OrderDraft::new("Chocolate", "Cono");

        let err = ledger.place_order(draft).unwrap_err();
        assert!(matches!(err, LedgerError::Domain(_)));
        assert!(ledger.history().is_empty());
        assert_eq!(ledger.inventory().containers()[0].stock(), 100);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: final stock equals initial stock plus the sum of deltas,
        /// and flavor availability tracks `stock > 0` after every update.
        #[test]
        fn stock_accumulates_deltas_and_availability_tracks_sign(
            deltas in prop::collection::vec(-50i64..50i64, 1..20)
        ) {
            let (_dir, mut ledger) = ledger_with(Some(STORE));
            let mut expected = 3i64;

            for delta in deltas {
                expected += delta;
                let stock = ledger.update_stock(Category::Flavor, "Vainilla", delta).unwrap();
                prop_assert_eq!(stock, Some(expected));
                prop_assert_eq!(flavor(&ledger, "Vainilla").available(), Some(expected > 0));
            }
        }
    }
}
