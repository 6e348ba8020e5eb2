use std::path::PathBuf;

pub const USERS_PATH_ENV: &str = "HELADERIA_USERS_PATH";
pub const DEFAULT_USERS_PATH: &str = "data/users.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Location of the `username,password,role` CSV table.
    pub users_path: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            users_path: PathBuf::from(DEFAULT_USERS_PATH),
        }
    }
}

impl AuthConfig {
    pub fn new(users_path: impl Into<PathBuf>) -> Self {
        Self {
            users_path: users_path.into(),
        }
    }

    pub fn from_env() -> Self {
        std::env::var(USERS_PATH_ENV)
            .map(Self::new)
            .unwrap_or_default()
    }
}
