//! Error types for the S3 provider

use thiserror::Error;

#[derive(Error, Debug)]
pub enum S3Error {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("S3 request failed: {0}")]
    Request(String),

    /// The listing claimed more pages but gave no way to fetch them
    #[error("Listing of bucket {bucket} is truncated but has no continuation token")]
    MissingContinuationToken { bucket: String },

    #[error("Invalid object in listing of bucket {bucket}: {reason}")]
    InvalidObject { bucket: String, reason: String },
}

pub type Result<T> = std::result::Result<T, S3Error>;

impl From<S3Error> for bridge_traits::error::BridgeError {
    fn from(error: S3Error) -> Self {
        use bridge_traits::error::BridgeError;

        match error {
            S3Error::BucketNotFound(bucket) => BridgeError::NotFound(bucket),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;

    #[test]
    fn test_error_conversion() {
        let not_found: BridgeError = S3Error::BucketNotFound("archive".into()).into();
        let truncated: BridgeError = S3Error::MissingContinuationToken {
            bucket: "archive".into(),
        }
        .into();

        assert!(not_found.is_not_found());
        assert!(matches!(
            truncated,
            BridgeError::OperationFailed(ref m) if m.contains("truncated")
        ));
    }
}
