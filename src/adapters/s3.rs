use crate::config::StorageConfig;
use crate::core::ObjectStore;
use crate::utils::error::{EtlError, Result};
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client as S3Client;

/// us-east-1 不接受 LocationConstraint
const DEFAULT_REGION: &str = "us-east-1";

/// [`ObjectStore`] backed by any S3-compatible service (AWS S3, MinIO).
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    region: String,
}

impl S3ObjectStore {
    pub async fn connect(config: &StorageConfig) -> Self {
        tracing::debug!("Initializing S3 client with config: {:?}", config);

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "weather-etl",
        );

        let timeouts = TimeoutConfig::builder()
            .connect_timeout(config.timeout())
            .operation_timeout(config.timeout())
            .build();

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .timeout_config(timeouts)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.path_style)
            .build();

        tracing::info!("S3 client initialized for endpoint: {}", config.endpoint);

        Self {
            client: S3Client::from_conf(s3_config),
            region: config.region.clone(),
        }
    }
}

impl ObjectStore for S3ObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.is_not_found() {
                    tracing::debug!("Bucket '{}' not found", bucket);
                    Ok(false)
                } else {
                    Err(EtlError::StorageError {
                        message: format!(
                            "Failed to check bucket '{}': {}",
                            bucket,
                            DisplayErrorContext(&service_error)
                        ),
                    })
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut request = self.client.create_bucket().bucket(bucket);

        if self.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request
            .send()
            .await
            .map_err(|e| EtlError::StorageError {
                message: format!(
                    "Failed to create bucket '{}': {}",
                    bucket,
                    DisplayErrorContext(&e)
                ),
            })?;

        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| EtlError::StorageError {
                message: format!(
                    "Failed to write s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::HEAD;

    // Path-style bucket requests carry a trailing slash.
    const BUCKET_PATH: &str = "/raw-weather-data/";

    async fn store_for(server: &MockServer) -> S3ObjectStore {
        let config = StorageConfig {
            endpoint: server.base_url(),
            region: "us-east-1".to_string(),
            access_key: "admin".to_string(),
            secret_key: "adminpassword".to_string(),
            bucket_name: "raw-weather-data".to_string(),
            path_style: true,
            timeout_seconds: 5,
        };
        S3ObjectStore::connect(&config).await
    }

    #[tokio::test]
    async fn test_bucket_exists() {
        let server = MockServer::start();
        let head_mock = server.mock(|when, then| {
            when.method(HEAD).path(BUCKET_PATH);
            then.status(200);
        });

        let store = store_for(&server).await;

        assert!(store.bucket_exists("raw-weather-data").await.unwrap());
        head_mock.assert();
    }

    #[tokio::test]
    async fn test_bucket_not_found_is_false() {
        let server = MockServer::start();
        let head_mock = server.mock(|when, then| {
            when.method(HEAD).path(BUCKET_PATH);
            then.status(404);
        });

        let store = store_for(&server).await;

        assert!(!store.bucket_exists("raw-weather-data").await.unwrap());
        head_mock.assert();
    }

    #[tokio::test]
    async fn test_bucket_forbidden_is_storage_error() {
        let server = MockServer::start();
        let head_mock = server.mock(|when, then| {
            when.method(HEAD).path(BUCKET_PATH);
            then.status(403);
        });

        let store = store_for(&server).await;
        let err = store.bucket_exists("raw-weather-data").await.unwrap_err();

        head_mock.assert();
        assert!(matches!(err, EtlError::StorageError { .. }));
    }

    #[tokio::test]
    async fn test_put_object_sends_body() {
        let server = MockServer::start();
        let put_mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/raw-weather-data/weather_boa_vista_20250101120000.json")
                .header("content-type", "application/json");
            then.status(200);
        });

        let store = store_for(&server).await;
        store
            .put_object(
                "raw-weather-data",
                "weather_boa_vista_20250101120000.json",
                br#"{"current_weather":{"temperature":32.5}}"#.to_vec(),
                "application/json",
            )
            .await
            .unwrap();

        put_mock.assert();
    }

    #[tokio::test]
    async fn test_create_bucket() {
        let server = MockServer::start();
        let create_mock = server.mock(|when, then| {
            when.method(PUT).path(BUCKET_PATH);
            then.status(200);
        });

        let store = store_for(&server).await;
        store.create_bucket("raw-weather-data").await.unwrap();

        create_mock.assert();
    }
}
