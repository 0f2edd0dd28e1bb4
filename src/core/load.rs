use crate::core::extract::json_type_name;
use crate::core::{FactWeatherRow, Warehouse, WeatherSnapshot};
use crate::domain::model::{EXTRACTION_DATE_COLUMN, FACT_TABLE};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub const CURRENT_WEATHER_FIELD: &str = "current_weather";

/// Transforms a snapshot into one fact row and appends it to the warehouse.
pub struct Loader<W: Warehouse> {
    warehouse: W,
}

impl<W: Warehouse> Loader<W> {
    pub fn new(warehouse: W) -> Self {
        Self { warehouse }
    }

    pub async fn load(&self, snapshot: &WeatherSnapshot) -> Result<u64> {
        let row = transform(snapshot, Utc::now())?;
        tracing::info!(
            "🔄 Data transformed: {} measurement(s) for {}",
            row.measurements.len(),
            FACT_TABLE
        );

        let rows = self
            .warehouse
            .append_row(FACT_TABLE, &row)
            .await
            .map_err(|e| {
                tracing::error!("❌ Error loading into the data warehouse: {}", e);
                into_load_error(e)
            })?;

        tracing::info!("🏛️ {} row(s) appended to {}", rows, FACT_TABLE);
        Ok(rows)
    }
}

/// Builds the fact row from `current_weather`.
///
/// A snapshot without `current_weather` (or with a null one) produces a row
/// that only carries `extraction_date`. A `current_weather` that is not an
/// object is a [`EtlError::TransformError`].
pub fn transform(
    snapshot: &WeatherSnapshot,
    extraction_date: DateTime<Utc>,
) -> Result<FactWeatherRow> {
    let mut measurements = match snapshot.get(CURRENT_WEATHER_FIELD) {
        None | Some(Value::Null) => {
            tracing::warn!(
                "⚠️ Snapshot has no '{}' field, loading a row with only {}",
                CURRENT_WEATHER_FIELD,
                EXTRACTION_DATE_COLUMN
            );
            Map::new()
        }
        Some(Value::Object(current)) => current.clone(),
        Some(other) => {
            let message = format!(
                "'{}' must be an object, got {}",
                CURRENT_WEATHER_FIELD,
                json_type_name(other)
            );
            tracing::error!("❌ Error transforming snapshot: {}", message);
            return Err(EtlError::TransformError { message });
        }
    };

    // extraction_date 一律使用轉換時間
    if measurements.remove(EXTRACTION_DATE_COLUMN).is_some() {
        tracing::debug!(
            "Dropped '{}' from the API payload in favour of the transform timestamp",
            EXTRACTION_DATE_COLUMN
        );
    }

    Ok(FactWeatherRow {
        measurements,
        extraction_date,
    })
}

fn into_load_error(err: EtlError) -> EtlError {
    match err {
        EtlError::LoadError { .. } => err,
        other => EtlError::LoadError {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockWarehouse {
        rows: Arc<Mutex<Vec<(String, FactWeatherRow)>>>,
        fail: bool,
    }

    impl Warehouse for MockWarehouse {
        async fn append_row(&self, table: &str, row: &FactWeatherRow) -> Result<u64> {
            if self.fail {
                return Err(EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )));
            }
            self.rows.lock().await.push((table.to_string(), row.clone()));
            Ok(1)
        }
    }

    fn snapshot(value: serde_json::Value) -> WeatherSnapshot {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_load_appends_one_row_with_temperature() {
        let warehouse = MockWarehouse::default();
        let loader = Loader::new(warehouse.clone());

        let started = Utc::now();
        std::thread::sleep(Duration::from_millis(2));
        let rows = loader
            .load(&snapshot(serde_json::json!({"current_weather": {"temperature": 32.5}})))
            .await
            .unwrap();

        assert_eq!(rows, 1);
        let stored = warehouse.rows.lock().await;
        assert_eq!(stored.len(), 1);
        let (table, row) = &stored[0];
        assert_eq!(table, "fact_weather");
        assert_eq!(row.measurements.get("temperature").unwrap().as_f64(), Some(32.5));
        assert!(row.extraction_date > started);
    }

    #[tokio::test]
    async fn test_missing_current_weather_loads_extraction_date_only() {
        let warehouse = MockWarehouse::default();
        let loader = Loader::new(warehouse.clone());

        let rows = loader.load(&snapshot(serde_json::json!({}))).await.unwrap();

        assert_eq!(rows, 1);
        let stored = warehouse.rows.lock().await;
        assert!(stored[0].1.measurements.is_empty());
    }

    #[tokio::test]
    async fn test_non_object_current_weather_is_transform_error() {
        let warehouse = MockWarehouse::default();
        let loader = Loader::new(warehouse.clone());

        let err = loader
            .load(&snapshot(serde_json::json!({"current_weather": "sunny"})))
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::TransformError { .. }));
        assert!(warehouse.rows.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_warehouse_failure_becomes_load_error() {
        let loader = Loader::new(MockWarehouse {
            fail: true,
            ..MockWarehouse::default()
        });

        let err = loader
            .load(&snapshot(serde_json::json!({"current_weather": {"temperature": 20.0}})))
            .await
            .unwrap_err();

        match err {
            EtlError::LoadError { message } => assert!(message.contains("connection refused")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_transform_overrides_payload_extraction_date() {
        let now = Utc::now();
        let row = transform(
            &snapshot(serde_json::json!({
                "current_weather": {"temperature": 30.1, "extraction_date": "yesterday"}
            })),
            now,
        )
        .unwrap();

        assert_eq!(row.extraction_date, now);
        assert!(!row.measurements.contains_key("extraction_date"));
        assert!(row.measurements.contains_key("temperature"));
    }

    #[test]
    fn test_transform_null_current_weather_is_lenient() {
        let row = transform(&snapshot(serde_json::json!({"current_weather": null})), Utc::now())
            .unwrap();
        assert!(row.measurements.is_empty());
    }
}
