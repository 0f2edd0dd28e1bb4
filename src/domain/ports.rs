use crate::domain::model::{ArchivedObject, FactWeatherRow, WeatherSnapshot};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of weather snapshots.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self) -> Result<WeatherSnapshot>;
}

/// S3 相容的物件儲存 (raw zone)
pub trait ObjectStore: Send + Sync {
    /// `Ok(false)` only when the store reports the bucket as not found. Any
    /// other failure is an error.
    fn bucket_exists(
        &self,
        bucket: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn create_bucket(&self, bucket: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 關聯式資料倉儲 (trusted zone)，只支援附加
pub trait Warehouse: Send + Sync {
    /// Appends `row` to `table` and returns the number of rows written.
    fn append_row(
        &self,
        table: &str,
        row: &FactWeatherRow,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<WeatherSnapshot>;
    async fn archive(&self, snapshot: &WeatherSnapshot) -> Result<ArchivedObject>;
    async fn load(&self, snapshot: &WeatherSnapshot) -> Result<u64>;
}
