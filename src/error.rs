// Error taxonomy for the directory core
//
// Storage failures and dangling business references are the only errors the
// core raises. Input validation lives with the caller (see `validation`).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The database could not be opened, read, or written.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The directory that should hold the database file is unusable.
    #[error("cannot prepare storage location {}: {source}", path.display())]
    StorageLocation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The operation targets a business that does not exist.
    #[error("business {0} does not exist")]
    Reference(i64),
}

impl Error {
    /// True for failures of the storage medium itself.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_) | Error::StorageLocation { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_error_is_not_storage() {
        let err = Error::Reference(42);
        assert!(!err.is_storage());
        assert_eq!(err.to_string(), "business 42 does not exist");
    }

    #[test]
    fn test_storage_error_classification() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        assert!(err.is_storage());

        let err = Error::StorageLocation {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_storage());
        assert!(err.to_string().contains("/nope"));
    }
}
