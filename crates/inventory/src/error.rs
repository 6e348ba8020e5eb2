//! Ledger error model.

use std::path::PathBuf;

use thiserror::Error;

use heladeria_core::DomainError;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures surfaced by ledger operations.
///
/// Every variant is also logged where it occurs; callers decide whether to
/// alert the user.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The store could not be read or written.
    #[error("store io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A store row could not be parsed; the load stopped at this row.
    #[error("malformed store row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    /// The import source could not be opened or read at all.
    #[error("import source unreadable at {}: {reason}", .path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl LedgerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Map a csv failure on the store, keeping io failures distinct.
    pub(crate) fn from_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::io(path, source),
            _ => Self::MalformedRow { line, reason },
        }
    }

    pub(crate) fn source_unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
