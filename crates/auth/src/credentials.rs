//! Flat-file user table (`username,password,role`).
//!
//! The table is re-read from disk on every call, so edits by another writer
//! are picked up; there is no locking.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{AuthConfig, AuthError, Identity, Role};

const USERS_HEADER: [&str; 3] = ["username", "password", "role"];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRow {
    username: String,
    password: String,
    role: String,
}

/// Result of a `create` call, shaped for display to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub created: bool,
    pub message: String,
}

impl CreateOutcome {
    fn created() -> Self {
        Self {
            created: true,
            message: "user created".to_string(),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            created: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    config: AuthConfig,
}

impl CredentialStore {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Read the table in file order. A later row for the same username
    /// replaces the earlier one.
    ///
    /// A missing file is an empty table. A malformed row is logged and ends
    /// the read; rows before it are kept.
    fn read_table(&self) -> Result<Vec<UserRow>, AuthError> {
        let path = &self.config.users_path;
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(AuthError::Io {
                    path: path.clone(),
                    source,
                });
            }
        };

        let mut rows: Vec<UserRow> = Vec::new();
        let mut reader = csv::Reader::from_reader(file);
        for result in reader.deserialize::<UserRow>() {
            let row = match result {
                Ok(row) => row,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "stopped reading users table");
                    break;
                }
            };
            match rows.iter_mut().find(|r| r.username == row.username) {
                Some(existing) => *existing = row,
                None => rows.push(row),
            }
        }
        Ok(rows)
    }

    /// Exact, opaque comparison of username and password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<Identity>, AuthError> {
        let identity = self
            .read_table()?
            .into_iter()
            .find(|row| row.username == username && row.password == password)
            .map(|row| Identity {
                username: row.username,
                role: Role::new(row.role),
            });

        match &identity {
            Some(identity) => info!(username, role = %identity.role, "login succeeded"),
            None => warn!(username, "login rejected"),
        }
        Ok(identity)
    }

    /// Add a user unless the username is taken.
    pub fn create(&self, username: &str, password: &str, role: Role) -> CreateOutcome {
        let rows = match self.read_table() {
            Ok(rows) => rows,
            Err(err) => return CreateOutcome::rejected(err.to_string()),
        };
        if rows.iter().any(|row| row.username == username) {
            return CreateOutcome::rejected("user already exists");
        }

        let row = UserRow {
            username: username.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        };
        match append_row(&self.config.users_path, &row) {
            Ok(()) => {
                info!(username, %role, "user created");
                CreateOutcome::created()
            }
            Err(err) => {
                warn!(username, error = %err, "user creation failed");
                CreateOutcome::rejected(err.to_string())
            }
        }
    }

    pub fn list(&self) -> Result<Vec<Identity>, AuthError> {
        Ok(self
            .read_table()?
            .into_iter()
            .map(|row| Identity {
                username: row.username,
                role: Role::new(row.role),
            })
            .collect())
    }
}

/// Append one row, writing the header first when the file is new or empty.
fn append_row(path: &Path, row: &UserRow) -> Result<(), AuthError> {
    let io_err = |source| AuthError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| AuthError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if needs_header {
        writer.write_record(USERS_HEADER).map_err(csv_err)?;
    }
    writer.serialize(row).map_err(csv_err)?;
    writer.flush().map_err(io_err)
}
