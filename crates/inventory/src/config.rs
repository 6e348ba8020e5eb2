//! Ledger configuration (environment-driven, with defaults).

use std::path::PathBuf;
use std::str::FromStr;

use heladeria_core::DomainError;

pub const STORE_PATH_ENV: &str = "HELADERIA_INVENTORY_PATH";
pub const RESTOCK_POLICY_ENV: &str = "HELADERIA_RESTOCK_POLICY";
pub const DEFAULT_STORE_PATH: &str = "data/inventario.csv";

/// How `restock_all` sets flavor availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestockPolicy {
    /// Every flavor becomes available, whatever the resulting stock.
    #[default]
    ForceAvailable,
    /// Availability follows `stock > 0`, like every other mutation.
    DeriveFromStock,
}

impl FromStr for RestockPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "force-available" | "force" => Ok(RestockPolicy::ForceAvailable),
            "derive" | "derive-from-stock" => Ok(RestockPolicy::DeriveFromStock),
            other => Err(DomainError::validation(format!(
                "unknown restock policy: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Location of the inventory CSV store.
    pub store_path: PathBuf,
    pub restock_policy: RestockPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            restock_policy: RestockPolicy::default(),
        }
    }
}

impl LedgerConfig {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            ..Self::default()
        }
    }

    pub fn with_restock_policy(mut self, policy: RestockPolicy) -> Self {
        self.restock_policy = policy;
        self
    }

    /// Read `HELADERIA_INVENTORY_PATH` and `HELADERIA_RESTOCK_POLICY`.
    ///
    /// An unrecognized policy is logged and replaced by the default.
    pub fn from_env() -> Self {
        let store_path = std::env::var(STORE_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH));

        let restock_policy = match std::env::var(RESTOCK_POLICY_ENV) {
            Ok(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default restock policy");
                RestockPolicy::default()
            }),
            Err(_) => RestockPolicy::default(),
        };

        Self {
            store_path,
            restock_policy,
        }
    }
}
