#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("stored data corrupted: {0}")]
    Corrupted(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_from_storage_error() {
        assert!(matches!(
            ReadError::from(StorageError::Unavailable),
            ReadError::Storage(StorageError::Unavailable)
        ));
        assert!(matches!(
            WriteError::from(StorageError::Unavailable),
            WriteError::Storage(StorageError::Unavailable)
        ));
    }

    #[test]
    fn test_storage_error_display() {
        assert_eq!(
            StorageError::Corrupted("unexpected token".into()).to_string(),
            "stored data corrupted: unexpected token"
        );
        assert_eq!(StorageError::Unavailable.to_string(), "storage unavailable");
        assert_eq!(
            ReadError::from(StorageError::Unavailable).to_string(),
            "storage unavailable"
        );
    }
}
