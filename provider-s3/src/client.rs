//! AWS SDK S3 bucket store.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::types::Object;
use aws_sdk_s3::Client as S3Client;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::store::{BucketStore, StoreObject};
use core_runtime::AwsCredentials;
use tracing::{debug, instrument};

use crate::error::{Result, S3Error};

/// Provider name recorded on the static credentials
const CREDENTIALS_PROVIDER: &str = "xfer-verify";

/// `BucketStore` implementation using the AWS SDK for Rust.
///
/// Retries and connection pooling come from the SDK's defaults.
pub struct S3BucketStore {
    s3_client: S3Client,
}

impl S3BucketStore {
    /// Create a store from the selected profile's static credentials.
    pub async fn new(credentials: &AwsCredentials) -> Self {
        let static_credentials = Credentials::new(
            &credentials.access_key_id,
            &credentials.secret_access_key,
            credentials.session_token.clone(),
            None,
            CREDENTIALS_PROVIDER,
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(credentials.region.clone()))
            .credentials_provider(static_credentials)
            .load()
            .await;

        Self {
            s3_client: S3Client::new(&sdk_config),
        }
    }

    /// Create a store from an existing client (for testing).
    pub fn from_client(s3_client: S3Client) -> Self {
        Self { s3_client }
    }

    async fn head_bucket(&self, bucket: &str) -> Result<bool> {
        match self.s3_client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(S3Error::Request(service_err.to_string()))
                }
            }
        }
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        continuation: Option<String>,
    ) -> Result<(Vec<StoreObject>, Option<String>)> {
        let mut request = self.s3_client.list_objects_v2().bucket(bucket);

        if let Some(prefix) = prefix {
            request = request.prefix(prefix);
        }

        if let Some(token) = continuation {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(|err| {
            let service_err = err.into_service_error();
            if service_err.is_no_such_bucket() {
                S3Error::BucketNotFound(bucket.to_string())
            } else {
                S3Error::Request(service_err.to_string())
            }
        })?;

        let objects = convert_objects(bucket, response.contents())?;
        let next = next_continuation_token(
            bucket,
            response.is_truncated(),
            response.next_continuation_token().map(str::to_string),
        )?;

        Ok((objects, next))
    }
}

/// Reduce SDK objects to `{key, size}` pairs
fn convert_objects(bucket: &str, contents: &[Object]) -> Result<Vec<StoreObject>> {
    contents
        .iter()
        .map(|object| {
            let invalid = |reason: String| S3Error::InvalidObject {
                bucket: bucket.to_string(),
                reason,
            };

            let key = object
                .key()
                .ok_or_else(|| invalid("object without a key".to_string()))?;
            let size = object
                .size()
                .ok_or_else(|| invalid(format!("{} has no size", key)))?;
            let size = u64::try_from(size)
                .map_err(|_| invalid(format!("{} has negative size {}", key, size)))?;

            Ok(StoreObject::new(key, size))
        })
        .collect()
}

/// Decide whether another page exists
fn next_continuation_token(
    bucket: &str,
    is_truncated: Option<bool>,
    token: Option<String>,
) -> Result<Option<String>> {
    if is_truncated != Some(true) {
        return Ok(None);
    }

    match token {
        Some(token) if !token.is_empty() => Ok(Some(token)),
        _ => Err(S3Error::MissingContinuationToken {
            bucket: bucket.to_string(),
        }),
    }
}

#[async_trait]
impl BucketStore for S3BucketStore {
    #[instrument(skip(self))]
    async fn bucket_exists(&self, bucket: &str) -> BridgeResult<bool> {
        let exists = self.head_bucket(bucket).await?;
        debug!("Bucket {} exists: {}", bucket, exists);
        Ok(exists)
    }

    #[instrument(skip(self, continuation))]
    async fn list_store_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        continuation: Option<String>,
    ) -> BridgeResult<(Vec<StoreObject>, Option<String>)> {
        Ok(self.list_page(bucket, prefix, continuation).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s3_bucket_store_is_a_bucket_store() {
        // Compile-time check that the trait is implemented
        fn assert_bucket_store<T: BucketStore>() {}
        assert_bucket_store::<S3BucketStore>();
    }

    #[test]
    fn test_convert_objects() {
        let contents = vec![
            Object::builder().key("run/a.txt").size(10).build(),
            Object::builder().key("run/").size(0).build(),
        ];

        let objects = convert_objects("archive", &contents).unwrap();

        assert_eq!(
            objects,
            vec![StoreObject::new("run/a.txt", 10), StoreObject::new("run/", 0)]
        );
    }

    #[test]
    fn test_convert_objects_rejects_missing_size() {
        let contents = vec![Object::builder().key("run/a.txt").build()];

        let err = convert_objects("archive", &contents).unwrap_err();

        assert!(matches!(err, S3Error::InvalidObject { .. }));
    }

    #[test]
    fn test_convert_objects_rejects_negative_size() {
        let contents = vec![Object::builder().key("run/a.txt").size(-1).build()];

        assert!(convert_objects("archive", &contents).is_err());
    }

    #[test]
    fn test_next_continuation_token() {
        assert_eq!(next_continuation_token("b", Some(false), None).unwrap(), None);
        assert_eq!(next_continuation_token("b", None, Some("t".into())).unwrap(), None);
        assert_eq!(
            next_continuation_token("b", Some(true), Some("t".into())).unwrap(),
            Some("t".to_string())
        );
        assert!(matches!(
            next_continuation_token("b", Some(true), None),
            Err(S3Error::MissingContinuationToken { .. })
        ));
    }
}
