use rust_decimal::Decimal;
use serde::Serialize;

use heladeria_core::Category;
use heladeria_sales::PriceLookup;

use crate::config::RestockPolicy;

/// Read access shared by every stock record.
pub trait Stocked {
    /// Lookup key within the category (flavor/topping name, container type).
    fn key(&self) -> &str;
    fn price(&self) -> Decimal;
    fn stock(&self) -> i64;
}

/// Mutation path, only reachable through the ledger.
pub(crate) trait AdjustStock: Stocked {
    fn adjust(&mut self, delta: i64);
}

/// A flavor. `available` is derived from `stock` on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flavor {
    name: String,
    price: Decimal,
    stock: i64,
    available: bool,
}

impl Flavor {
    pub fn new(name: impl Into<String>, price: Decimal, stock: i64) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
            available: stock > 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    fn restock(&mut self, quantity: i64, policy: RestockPolicy) {
        self.stock = self.stock.saturating_add(quantity);
        self.available = match policy {
            RestockPolicy::ForceAvailable => true,
            RestockPolicy::DeriveFromStock => self.stock > 0,
        };
    }
}

/// A container (cone, cup, tub). Keyed by its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    kind: String,
    price: Decimal,
    stock: i64,
}

impl Container {
    pub fn new(kind: impl Into<String>, price: Decimal, stock: i64) -> Self {
        Self {
            kind: kind.into(),
            price,
            stock,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topping {
    name: String,
    price: Decimal,
    stock: i64,
}

impl Topping {
    pub fn new(name: impl Into<String>, price: Decimal, stock: i64) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

macro_rules! impl_stocked {
    ($t:ty, $key:ident) => {
        impl Stocked for $t {
            fn key(&self) -> &str {
                &self.$key
            }

            fn price(&self) -> Decimal {
                self.price
            }

            fn stock(&self) -> i64 {
                self.stock
            }
        }
    };
}

impl_stocked!(Flavor, name);
impl_stocked!(Container, kind);
impl_stocked!(Topping, name);

impl AdjustStock for Flavor {
    fn adjust(&mut self, delta: i64) {
        self.stock = self.stock.saturating_add(delta);
        self.available = self.stock > 0;
    }
}

impl AdjustStock for Container {
    fn adjust(&mut self, delta: i64) {
        self.stock = self.stock.saturating_add(delta);
    }
}

impl AdjustStock for Topping {
    fn adjust(&mut self, delta: i64) {
        self.stock = self.stock.saturating_add(delta);
    }
}

/// One inventory record, tagged by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum StockItem {
    Flavor(Flavor),
    Container(Container),
    Topping(Topping),
}

impl StockItem {
    pub fn new(category: Category, key: impl Into<String>, price: Decimal, stock: i64) -> Self {
        match category {
            Category::Flavor => StockItem::Flavor(Flavor::new(key, price, stock)),
            Category::Container => StockItem::Container(Container::new(key, price, stock)),
            Category::Topping => StockItem::Topping(Topping::new(key, price, stock)),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            StockItem::Flavor(_) => Category::Flavor,
            StockItem::Container(_) => Category::Container,
            StockItem::Topping(_) => Category::Topping,
        }
    }

    fn as_stocked(&self) -> &dyn Stocked {
        match self {
            StockItem::Flavor(f) => f,
            StockItem::Container(c) => c,
            StockItem::Topping(t) => t,
        }
    }

    pub fn key(&self) -> &str {
        self.as_stocked().key()
    }

    pub fn price(&self) -> Decimal {
        self.as_stocked().price()
    }

    pub fn stock(&self) -> i64 {
        self.as_stocked().stock()
    }

    /// `Some(available)` for flavors, `None` for categories without availability.
    pub fn available(&self) -> Option<bool> {
        match self {
            StockItem::Flavor(f) => Some(f.is_available()),
            _ => None,
        }
    }
}

/// What a merge did to the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Merge {
    Accumulated,
    Created,
}

fn position<T: Stocked>(items: &[T], key: &str) -> Option<usize> {
    items.iter().position(|item| item.key() == key)
}

fn adjust_in<T: AdjustStock>(items: &mut [T], key: &str, delta: i64) -> Option<i64> {
    let item = items.iter_mut().find(|item| item.key() == key)?;
    item.adjust(delta);
    Some(item.stock())
}

/// The three categorized collections, each in insertion order.
///
/// Keys are compared exactly (case-sensitive); lookups are linear scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    flavors: Vec<Flavor>,
    containers: Vec<Container>,
    toppings: Vec<Topping>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flavors(&self) -> &[Flavor] {
        &self.flavors
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn toppings(&self) -> &[Topping] {
        &self.toppings
    }

    pub fn len(&self) -> usize {
        self.flavors.len() + self.containers.len() + self.toppings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every record in store order: flavors, containers, toppings.
    pub fn entries(&self) -> impl Iterator<Item = (Category, &dyn Stocked)> + '_ {
        let flavors = self
            .flavors
            .iter()
            .map(|f| (Category::Flavor, f as &dyn Stocked));
        let containers = self
            .containers
            .iter()
            .map(|c| (Category::Container, c as &dyn Stocked));
        let toppings = self
            .toppings
            .iter()
            .map(|t| (Category::Topping, t as &dyn Stocked));
        flavors.chain(containers).chain(toppings)
    }

    /// Owned copies of every record, in store order.
    pub fn items(&self) -> Vec<StockItem> {
        let flavors = self.flavors.iter().cloned().map(StockItem::Flavor);
        let containers = self.containers.iter().cloned().map(StockItem::Container);
        let toppings = self.toppings.iter().cloned().map(StockItem::Topping);
        flavors.chain(containers).chain(toppings).collect()
    }

    pub fn find(&self, category: Category, key: &str) -> Option<StockItem> {
        match category {
            Category::Flavor => position(&self.flavors, key)
                .map(|i| StockItem::Flavor(self.flavors[i].clone())),
            Category::Container => position(&self.containers, key)
                .map(|i| StockItem::Container(self.containers[i].clone())),
            Category::Topping => position(&self.toppings, key)
                .map(|i| StockItem::Topping(self.toppings[i].clone())),
        }
    }

    pub fn contains(&self, category: Category, key: &str) -> bool {
        match category {
            Category::Flavor => position(&self.flavors, key).is_some(),
            Category::Container => position(&self.containers, key).is_some(),
            Category::Topping => position(&self.toppings, key).is_some(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.flavors.clear();
        self.containers.clear();
        self.toppings.clear();
    }

    /// Append without a uniqueness check (the store is authoritative on load).
    pub(crate) fn push(&mut self, item: StockItem) {
        match item {
            StockItem::Flavor(f) => self.flavors.push(f),
            StockItem::Container(c) => self.containers.push(c),
            StockItem::Topping(t) => self.toppings.push(t),
        }
    }

    /// Add `delta` to the first record matching `key`; returns the new stock.
    pub(crate) fn adjust(&mut self, category: Category, key: &str, delta: i64) -> Option<i64> {
        match category {
            Category::Flavor => adjust_in(&mut self.flavors, key, delta),
            Category::Container => adjust_in(&mut self.containers, key, delta),
            Category::Topping => adjust_in(&mut self.toppings, key, delta),
        }
    }

    pub(crate) fn restock(&mut self, quantity: i64, policy: RestockPolicy) {
        for flavor in &mut self.flavors {
            flavor.restock(quantity, policy);
        }
        for container in &mut self.containers {
            container.adjust(quantity);
        }
        for topping in &mut self.toppings {
            topping.adjust(quantity);
        }
    }

    /// Accumulate stock into an existing record (price of record kept), or
    /// append the item as new.
    pub(crate) fn merge(&mut self, item: StockItem) -> Merge {
        let (category, stock) = (item.category(), item.stock());
        if self.adjust(category, item.key(), stock).is_some() {
            return Merge::Accumulated;
        }
        self.push(item);
        Merge::Created
    }
}

impl PriceLookup for Inventory {
    fn unit_price(&self, category: Category, key: &str) -> Option<Decimal> {
        self.find(category, key).map(|item| item.price())
    }
}
