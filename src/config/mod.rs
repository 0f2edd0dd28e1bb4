#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str =
    "https://api.open-meteo.com/v1/forecast?latitude=2.8197&longitude=-60.6733&current_weather=true";
pub const DEFAULT_LOCATION: &str = "boa_vista";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_S3_ENDPOINT: &str = "http://localhost:9000";
pub const DEFAULT_S3_REGION: &str = "us-east-1";
pub const DEFAULT_BUCKET_NAME: &str = "raw-weather-data";

const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Process-wide configuration, loaded once at start and never reloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    pub storage: StorageConfig,
    pub warehouse: WarehouseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Slug embedded in archived object names.
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Disables TLS certificate validation for the weather API. Only meant
    /// for networks with an intercepting proxy.
    #[serde(default)]
    pub allow_insecure_transport: bool,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_s3_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_s3_region")]
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default = "default_bucket_name")]
    pub bucket_name: String,
    #[serde(default = "default_true")]
    pub path_style: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    pub connection_string: String,
    /// Create `fact_weather` and add missing columns before inserting.
    #[serde(default = "default_true")]
    pub auto_create_table: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_s3_endpoint() -> String {
    DEFAULT_S3_ENDPOINT.to_string()
}

fn default_s3_region() -> String {
    DEFAULT_S3_REGION.to_string()
}

fn default_bucket_name() -> String {
    DEFAULT_BUCKET_NAME.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            location: default_location(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: default_user_agent(),
            allow_insecure_transport: false,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl WarehouseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("bucket_name", &self.bucket_name)
            .field("path_style", &self.path_style)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl fmt::Debug for WarehouseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarehouseConfig")
            .field(
                "connection_string",
                &redact_connection_string(&self.connection_string),
            )
            .field("auto_create_table", &self.auto_create_table)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// 隱藏連線字串中的密碼
pub fn redact_connection_string(connection_string: &str) -> String {
    match url::Url::parse(connection_string) {
        Ok(mut url) => {
            if url.password().is_some() {
                // set_password only fails for URLs that cannot carry credentials
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<unparsable connection string>".to_string(),
    }
}

impl EtlConfig {
    /// Loads from a TOML file when `path` is given, otherwise from the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 從任意 key/value 來源建立配置 (環境變數或測試用的 map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str, field: &str| {
            lookup(key).ok_or_else(|| EtlError::MissingConfigError {
                field: format!("{} ({})", field, key),
            })
        };

        let source = SourceConfig {
            api_url: string_or("API_URL", DEFAULT_API_URL),
            location: string_or("LOCATION", DEFAULT_LOCATION),
            timeout_seconds: parse_or(&lookup, "API_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?,
            user_agent: string_or("API_USER_AGENT", DEFAULT_USER_AGENT),
            allow_insecure_transport: parse_or(&lookup, "ALLOW_INSECURE_TRANSPORT", false)?,
        };

        let storage = StorageConfig {
            endpoint: string_or("S3_ENDPOINT", DEFAULT_S3_ENDPOINT),
            region: string_or("S3_REGION", DEFAULT_S3_REGION),
            access_key: required("S3_ACCESS_KEY", "storage.access_key")?,
            secret_key: required("S3_SECRET_KEY", "storage.secret_key")?,
            bucket_name: string_or("BUCKET_NAME", DEFAULT_BUCKET_NAME),
            path_style: parse_or(&lookup, "S3_PATH_STYLE", true)?,
            timeout_seconds: parse_or(&lookup, "S3_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?,
        };

        let warehouse = WarehouseConfig {
            connection_string: required("DB_CONNECTION_STRING", "warehouse.connection_string")?,
            auto_create_table: parse_or(&lookup, "DB_AUTO_CREATE_TABLE", true)?,
            timeout_seconds: parse_or(&lookup, "DB_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?,
        };

        Ok(Self {
            source,
            storage,
            warehouse,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| EtlError::InvalidConfigValueError {
                field: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

impl Validate for EtlConfig {
    fn validate(&self) -> Result<()> {
        // 驗證來源
        validation::validate_url("source.api_url", &self.source.api_url)?;
        validation::validate_location_slug("source.location", &self.source.location)?;
        validation::validate_range(
            "source.timeout_seconds",
            self.source.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validation::validate_non_empty_string("source.user_agent", &self.source.user_agent)?;

        // 驗證物件儲存
        validation::validate_url("storage.endpoint", &self.storage.endpoint)?;
        validation::validate_non_empty_string("storage.region", &self.storage.region)?;
        validation::validate_non_empty_string("storage.access_key", &self.storage.access_key)?;
        if self.storage.secret_key.trim().is_empty() {
            return Err(EtlError::InvalidConfigValueError {
                field: "storage.secret_key".to_string(),
                value: String::new(),
                reason: "Value cannot be empty or whitespace-only".to_string(),
            });
        }
        validation::validate_s3_bucket_name("storage.bucket_name", &self.storage.bucket_name)?;
        validation::validate_range(
            "storage.timeout_seconds",
            self.storage.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;

        // 驗證資料倉儲
        validation::validate_postgres_url(
            "warehouse.connection_string",
            &self.warehouse.connection_string,
        )?;
        validation::validate_range(
            "warehouse.timeout_seconds",
            self.warehouse.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
