pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{PostgresWarehouse, S3ObjectStore};
pub use config::EtlConfig;
pub use crate::core::{
    archive::Archiver,
    etl::{EtlEngine, PipelineStage},
    extract::HttpExtractor,
    load::Loader,
    pipeline::WeatherPipeline,
};
pub use domain::model::{ArchivedObject, FactWeatherRow, RunReport, WeatherSnapshot, FACT_TABLE};
pub use utils::error::{EtlError, Result};
