pub mod archive;
pub mod etl;
pub mod extract;
pub mod load;
pub mod pipeline;

pub use crate::domain::model::{ArchivedObject, FactWeatherRow, RunReport, WeatherSnapshot};
pub use crate::domain::ports::{Extractor, ObjectStore, Pipeline, Warehouse};
pub use crate::utils::error::Result;
