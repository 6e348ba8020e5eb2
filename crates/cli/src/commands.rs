//! Subcommands and their dispatch.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use heladeria_auth::{AuthConfig, CredentialStore, Identity, Permission, Role, authorize};
use heladeria_core::Category;
use heladeria_inventory::{InventoryLedger, LedgerConfig};
use heladeria_sales::{OrderDraft, write_history_csv, write_history_json};

#[derive(Debug, Parser)]
#[command(name = "heladeria", about = "Inventory and order ledger for the shop")]
pub struct Cli {
    /// Username for role-gated commands.
    #[arg(long, env = "HELADERIA_USER", global = true)]
    pub user: Option<String>,

    #[arg(long, env = "HELADERIA_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every stock record.
    List,
    /// Add a signed delta to one item's stock.
    Adjust {
        #[arg(value_parser = parse_category)]
        category: Category,
        name: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Add the same quantity to every item.
    Restock {
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Merge stock from an external CSV.
    Import { source: PathBuf },
    /// Price an order, take it out of stock, record it, and print the
    /// history as JSON.
    Order {
        #[arg(long)]
        flavor: String,
        #[arg(long)]
        container: String,
        #[arg(long = "topping")]
        toppings: Vec<String>,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        /// Also write the order history as CSV to this path.
        #[arg(long)]
        history_csv: Option<PathBuf>,
    },
    /// Check credentials and print the role.
    Login {
        username: String,
        #[arg(value_name = "PASSWORD")]
        secret: String,
    },
    /// Add a user (admins only, or anyone while the table is empty).
    AddUser {
        username: String,
        #[arg(value_name = "PASSWORD")]
        secret: String,
        #[arg(long, default_value = "employee")]
        role: String,
    },
    /// List users and roles.
    Users,
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::parse_lenient(raw)
        .ok_or_else(|| format!("unknown category '{raw}' (expected sabores, envases or toppings)"))
}

pub struct App {
    ledger: InventoryLedger,
    credentials: CredentialStore,
}

impl App {
    pub fn new(ledger: LedgerConfig, auth: AuthConfig) -> Self {
        Self {
            ledger: InventoryLedger::open(ledger),
            credentials: CredentialStore::new(auth),
        }
    }

    pub fn from_env() -> Self {
        Self::new(LedgerConfig::from_env(), AuthConfig::from_env())
    }

    /// Authenticate the caller and check the permission.
    fn require(
        &self,
        user: Option<&str>,
        password: Option<&str>,
        permission: &Permission,
    ) -> anyhow::Result<Identity> {
        let (Some(user), Some(password)) = (user, password) else {
            bail!("this command needs --user and --password");
        };
        let Some(identity) = self.credentials.authenticate(user, password)? else {
            bail!("invalid credentials for '{user}'");
        };
        authorize(&identity, permission)?;
        Ok(identity)
    }

    pub fn run(&mut self, cli: Cli) -> anyhow::Result<String> {
        let Cli {
            user,
            password,
            command,
        } = cli;

        match command {
            Command::List => {
                self.require(user.as_deref(), password.as_deref(), &Permission::INVENTORY_READ)?;
                Ok(self.render_inventory())
            }
            Command::Adjust {
                category,
                name,
                delta,
            } => {
                self.require(user.as_deref(), password.as_deref(), &Permission::INVENTORY_WRITE)?;
                match self.ledger.update_stock(category, &name, delta)? {
                    Some(stock) => Ok(format!("{category}/{name}: stock {stock}\n")),
                    None => Ok(format!("{category}/{name}: no such item\n")),
                }
            }
            Command::Restock { quantity } => {
                self.require(user.as_deref(), password.as_deref(), &Permission::INVENTORY_WRITE)?;
                self.ledger.restock_all(quantity)?;
                Ok(format!(
                    "restocked {} items by {quantity}\n",
                    self.ledger.inventory().len()
                ))
            }
            Command::Import { source } => {
                self.require(user.as_deref(), password.as_deref(), &Permission::INVENTORY_WRITE)?;
                let merged = self
                    .ledger
                    .import_merge(&source)
                    .with_context(|| format!("importing {}", source.display()))?;
                Ok(format!("merged {merged} rows\n"))
            }
            Command::Order {
                flavor,
                container,
                toppings,
                quantity,
                history_csv,
            } => {
                self.require(user.as_deref(), password.as_deref(), &Permission::ORDERS_PLACE)?;
                let draft = OrderDraft {
                    flavor,
                    container,
                    toppings,
                    quantity,
                };
                self.ledger.place_order(draft)?;
                if let Some(path) = history_csv {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    write_history_csv(file, self.ledger.history())?;
                }
                let mut out = Vec::new();
                write_history_json(&mut out, self.ledger.history())?;
                out.push(b'\n');
                Ok(String::from_utf8(out)?)
            }
            Command::Login { username, secret } => {
                match self.credentials.authenticate(&username, &secret)? {
                    Some(identity) => Ok(format!("{} ({})\n", identity.username, identity.role)),
                    None => bail!("invalid credentials for '{username}'"),
                }
            }
            Command::AddUser {
                username,
                secret,
                role,
            } => {
                if !self.credentials.list()?.is_empty() {
                    self.require(user.as_deref(), password.as_deref(), &Permission::USERS_MANAGE)?;
                }
                let outcome = self
                    .credentials
                    .create(&username, &secret, Role::new(role));
                if !outcome.created {
                    bail!("{}", outcome.message);
                }
                Ok(format!("{}: {username}\n", outcome.message))
            }
            Command::Users => {
                self.require(user.as_deref(), password.as_deref(), &Permission::USERS_MANAGE)?;
                let mut out = String::new();
                for identity in self.credentials.list()? {
                    let _ = writeln!(out, "{}\t{}", identity.username, identity.role);
                }
                Ok(out)
            }
        }
    }

    fn render_inventory(&self) -> String {
        let mut out = String::new();
        for item in self.ledger.inventory().items() {
            let _ = write!(
                out,
                "{}\t{}\t{}\t{}",
                item.category(),
                item.key(),
                item.price(),
                item.stock()
            );
            if let Some(available) = item.available() {
                let _ = write!(out, "\t{}", if available { "available" } else { "sold out" });
            }
            out.push('\n');
        }
        out
    }
}
