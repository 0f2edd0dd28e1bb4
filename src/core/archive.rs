use crate::core::{ArchivedObject, ObjectStore, WeatherSnapshot};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Writes raw snapshots into the data lake.
pub struct Archiver<O: ObjectStore> {
    store: O,
    location: String,
}

impl<O: ObjectStore> Archiver<O> {
    pub fn new(store: O, location: impl Into<String>) -> Self {
        Self {
            store,
            location: location.into(),
        }
    }

    /// Creates the bucket only when the store reports it as not found.
    pub async fn ensure_bucket(&self, bucket: &str) -> Result<()> {
        if self.store.bucket_exists(bucket).await? {
            tracing::debug!("Bucket '{}' already exists", bucket);
            return Ok(());
        }

        self.store.create_bucket(bucket).await.map_err(|e| {
            tracing::error!("❌ Failed to create bucket '{}': {}", bucket, e);
            e
        })?;
        tracing::info!("🪣 Bucket '{}' created", bucket);
        Ok(())
    }

    pub async fn archive(
        &self,
        snapshot: &WeatherSnapshot,
        bucket_name: &str,
    ) -> Result<ArchivedObject> {
        self.ensure_bucket(bucket_name).await?;

        let key = object_key(&self.location, Utc::now());
        let body = snapshot.to_json_bytes().map_err(|e| EtlError::StorageError {
            message: format!("Failed to serialize snapshot: {}", e),
        })?;
        let size_bytes = body.len();

        tracing::debug!("Writing {} bytes to s3://{}/{}", size_bytes, bucket_name, key);
        self.store
            .put_object(bucket_name, &key, body, JSON_CONTENT_TYPE)
            .await
            .map_err(|e| {
                tracing::error!("❌ Error saving to the data lake: {}", e);
                e
            })?;

        tracing::info!("📦 Raw snapshot saved to the data lake: {}", key);
        Ok(ArchivedObject {
            bucket: bucket_name.to_string(),
            key,
            size_bytes,
        })
    }
}

/// `weather_<location>_<YYYYMMDDHHMMSS>.json`，使用 UTC 到秒
pub fn object_key(location: &str, at: DateTime<Utc>) -> String {
    format!("weather_{}_{}.json", location, at.format("%Y%m%d%H%M%S"))
}
