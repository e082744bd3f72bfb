//! Entry points exported to the mobile app through uniffi.
//!
//! Foreign callers hand over owned values and raw JSON strings; these wrappers
//! adapt them to the borrowing Rust API.

use chrono::Utc;
use serde_json::Value;

use crate::api::WaterApi;
use crate::config::ClientConfig;
use crate::devices::{aggregate_with, primary_device};
use crate::error::ApiError;
use crate::models::{
    Alert, AlertRule, Device, DeviceReading, ProfileUpdate, ReadingPage, Session, SignupRequest,
    TurbidityUnit,
};
use crate::reading::normalize_at;
use crate::relative_time::format_relative_at;
use crate::transport::HttpTransport;

/// Relative "last update" phrase measured against the current time.
pub fn format_relative(timestamp: Option<String>) -> String {
    format_relative_at(timestamp.as_deref(), Utc::now())
}

/// Normalize a raw reading given as JSON text. Invalid JSON reads as absent.
pub fn normalize_reading_json(json: String, turbidity_unit: TurbidityUnit) -> Option<DeviceReading> {
    let raw: Value = serde_json::from_str(&json).ok()?;
    normalize_at(Some(&raw), turbidity_unit, Utc::now())
}

/// Aggregate a raw device list given as JSON text.
pub fn aggregate_devices_json(json: String) -> Result<Vec<Device>, ApiError> {
    let raw: Value = serde_json::from_str(&json).map_err(|e| ApiError::Decode(e.to_string()))?;
    match raw {
        Value::Array(rows) => Ok(aggregate_with(&rows, TurbidityUnit::default(), Utc::now())),
        Value::Null => Ok(Vec::new()),
        _ => Err(ApiError::Decode("device list is not an array".to_string())),
    }
}

pub fn select_primary_device(devices: Vec<Device>) -> Option<Device> {
    primary_device(&devices).cloned()
}

pub fn init_logging(filter: String) {
    crate::logging::init(&filter);
}

/// Backend client handed to the app. Calls block the calling thread.
pub struct WaterClient {
    api: WaterApi<HttpTransport>,
}

impl WaterClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let unit = config.dashboard_turbidity_unit;
        let transport = HttpTransport::new(config)?;
        Ok(Self {
            api: WaterApi::new(transport, unit),
        })
    }

    pub fn login(&self, email: String, password: String) -> Result<Session, ApiError> {
        self.api.login(&email, &password)
    }

    pub fn signup(&self, request: SignupRequest) -> Result<Session, ApiError> {
        self.api.signup(&request)
    }

    pub fn update_profile(
        &self,
        session: Session,
        update: ProfileUpdate,
    ) -> Result<Session, ApiError> {
        self.api.update_profile(&session, &update)
    }

    pub fn list_devices(&self, session: Session) -> Result<Vec<Device>, ApiError> {
        self.api.list_devices(&session)
    }

    pub fn device_readings(
        &self,
        device_id: String,
        page: u32,
        limit: u32,
    ) -> Result<ReadingPage, ApiError> {
        self.api.device_readings(&device_id, page, limit)
    }

    pub fn list_alerts(&self, session: Session) -> Result<Vec<Alert>, ApiError> {
        self.api.list_alerts(&session)
    }

    pub fn mark_alert_read(&self, alert_id: String) -> Result<(), ApiError> {
        self.api.mark_alert_read(&alert_id)
    }

    pub fn list_alert_rules(&self, session: Session) -> Result<Vec<AlertRule>, ApiError> {
        self.api.list_alert_rules(&session)
    }

    pub fn update_alert_rule(&self, session: Session, rule: AlertRule) -> Result<(), ApiError> {
        self.api.update_alert_rule(&session, &rule)
    }
}
