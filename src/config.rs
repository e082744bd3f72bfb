use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::TurbidityUnit;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Connection settings supplied by the host app.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the REST API, e.g. `https://example.org/api`.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Unit shown for turbidity on the device list.
    pub dashboard_turbidity_unit: TurbidityUnit,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dashboard_turbidity_unit: TurbidityUnit::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_json(input: &str) -> Result<Self, ApiError> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| ApiError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ApiError::InvalidConfig("base_url is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ApiError::InvalidConfig(format!(
                "base_url must be http(s): {}",
                url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ApiError::InvalidConfig(
                "timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
