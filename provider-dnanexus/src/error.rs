//! Error types for the DNAnexus provider

use thiserror::Error;

/// Error `type` the API reports for unknown projects, folders and objects
pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFound";

/// DNAnexus provider errors
#[derive(Error, Debug)]
pub enum DnanexusError {
    /// API request returned an error
    #[error("DNAnexus API error (status {status_code}, {error_type}): {message}")]
    ApiError {
        status_code: u16,
        error_type: String,
        message: String,
    },

    /// Token rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// More than one project carries the requested name
    #[error("Project name '{name}' is ambiguous ({count} matches); use the project ID")]
    AmbiguousProject { name: String, count: usize },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

impl DnanexusError {
    pub fn is_not_found(&self) -> bool {
        match self {
            DnanexusError::ApiError {
                status_code,
                error_type,
                ..
            } => *status_code == 404 || error_type == RESOURCE_NOT_FOUND,
            DnanexusError::BridgeError(e) => e.is_not_found(),
            _ => false,
        }
    }
}

/// Result type for DNAnexus operations
pub type Result<T> = std::result::Result<T, DnanexusError>;

impl From<DnanexusError> for bridge_traits::error::BridgeError {
    fn from(error: DnanexusError) -> Self {
        use bridge_traits::error::BridgeError;

        if error.is_not_found() {
            return match error {
                DnanexusError::BridgeError(e) => e,
                other => BridgeError::NotFound(other.to_string()),
            };
        }

        match error {
            DnanexusError::BridgeError(e) => e,
            ambiguous @ DnanexusError::AmbiguousProject { .. } => {
                BridgeError::Ambiguous(ambiguous.to_string())
            }
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;

    #[test]
    fn test_error_display() {
        let error = DnanexusError::ApiError {
            status_code: 401,
            error_type: "InvalidAuthentication".to_string(),
            message: "the token could not be found".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "DNAnexus API error (status 401, InvalidAuthentication): the token could not be found"
        );
    }

    #[test]
    fn test_not_found_conversion() {
        let error = DnanexusError::ApiError {
            status_code: 404,
            error_type: RESOURCE_NOT_FOUND.to_string(),
            message: "project-x not found".to_string(),
        };
        let bridge_error: BridgeError = error.into();

        assert!(bridge_error.is_not_found());
    }

    #[test]
    fn test_ambiguous_project_conversion() {
        let error = DnanexusError::AmbiguousProject {
            name: "demo".to_string(),
            count: 2,
        };
        let bridge_error: BridgeError = error.into();

        assert!(bridge_error.is_ambiguous());
        assert!(bridge_error.to_string().contains("'demo' is ambiguous (2 matches)"));
    }

    #[test]
    fn test_error_conversion() {
        let error = DnanexusError::ParseError("unexpected end of input".to_string());
        let bridge_error: BridgeError = error.into();

        assert!(matches!(bridge_error, BridgeError::OperationFailed(_)));
    }
}
