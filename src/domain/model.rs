use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Trusted zone 的事實表名稱
pub const FACT_TABLE: &str = "fact_weather";

/// Column populated at transform time, never taken from the API payload.
pub const EXTRACTION_DATE_COLUMN: &str = "extraction_date";

/// One point-in-time response from the weather API, kept as an untyped JSON
/// object. Nothing beyond "is an object" is validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherSnapshot(pub Map<String, Value>);

impl WeatherSnapshot {
    pub fn new(data: Map<String, Value>) -> Self {
        Self(data)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.0)
    }
}

/// Raw zone object written by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedObject {
    pub bucket: String,
    pub key: String,
    pub size_bytes: usize,
}

/// One row of `fact_weather`: the `current_weather` fields plus the
/// timestamp of the transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactWeatherRow {
    pub measurements: Map<String, Value>,
    pub extraction_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub archived: ArchivedObject,
    pub rows_appended: u64,
}
