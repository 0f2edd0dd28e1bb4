// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod postgres;
pub mod s3;

pub use postgres::PostgresWarehouse;
pub use s3::S3ObjectStore;
