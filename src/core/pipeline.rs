use crate::core::archive::Archiver;
use crate::core::load::Loader;
use crate::core::{ArchivedObject, Extractor, ObjectStore, Pipeline, Warehouse, WeatherSnapshot};
use crate::utils::error::Result;

/// Extract → archive → load over pluggable extractor, object store and
/// warehouse.
pub struct WeatherPipeline<E: Extractor, O: ObjectStore, W: Warehouse> {
    extractor: E,
    archiver: Archiver<O>,
    loader: Loader<W>,
    bucket_name: String,
}

impl<E: Extractor, O: ObjectStore, W: Warehouse> WeatherPipeline<E, O, W> {
    pub fn new(
        extractor: E,
        archiver: Archiver<O>,
        loader: Loader<W>,
        bucket_name: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            archiver,
            loader,
            bucket_name: bucket_name.into(),
        }
    }
}

#[async_trait::async_trait]
impl<E: Extractor, O: ObjectStore, W: Warehouse> Pipeline for WeatherPipeline<E, O, W> {
    async fn extract(&self) -> Result<WeatherSnapshot> {
        self.extractor.extract().await
    }

    async fn archive(&self, snapshot: &WeatherSnapshot) -> Result<ArchivedObject> {
        self.archiver.archive(snapshot, &self.bucket_name).await
    }

    async fn load(&self, snapshot: &WeatherSnapshot) -> Result<u64> {
        self.loader.load(snapshot).await
    }
}
