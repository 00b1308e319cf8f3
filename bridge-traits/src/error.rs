use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The identifier matched more than one resource
    #[error("Ambiguous identifier: {0}")]
    Ambiguous(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether the store reported that the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BridgeError::NotFound(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, BridgeError::Ambiguous(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_checks() {
        let missing = BridgeError::NotFound("project-x".into());
        let ambiguous = BridgeError::Ambiguous("two projects named demo".into());

        assert!(missing.is_not_found());
        assert!(!missing.is_ambiguous());
        assert!(ambiguous.is_ambiguous());
        assert!(!ambiguous.is_not_found());
    }
}
