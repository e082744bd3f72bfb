pub mod alerts;
pub mod api;
pub mod coerce;
pub mod config;
pub mod devices;
pub mod envelope;
pub mod error;
pub mod ffi;
pub mod logging;
pub mod models;
pub mod reading;
pub mod refresh;
pub mod relative_time;
pub mod status;
pub mod transport;
pub mod transport_mock;

uniffi::include_scaffolding!("aquamonitor");

pub use config::ClientConfig;
pub use error::ApiError;
pub use ffi::{
    aggregate_devices_json, format_relative, init_logging, normalize_reading_json,
    select_primary_device, WaterClient,
};
pub use models::{
    Alert, AlertRule, Connectivity, Device, DeviceReading, ParameterReading, ProfileUpdate,
    ReadingPage, Session, SignupRequest, TurbidityUnit,
};
pub use refresh::RefreshGate;
pub use status::{classify, Parameter, Status};
