//! `heladeria` — operator CLI over the inventory ledger and the users table.
//!
//! Paths come from `HELADERIA_INVENTORY_PATH` / `HELADERIA_USERS_PATH`;
//! logs go to stderr, command output to stdout.

mod commands;

use clap::Parser;

use commands::{App, Cli};

fn main() -> anyhow::Result<()> {
    heladeria_observability::init();

    let cli = Cli::parse();
    let mut app = App::from_env();
    let output = app.run(cli)?;
    print!("{output}");
    Ok(())
}
