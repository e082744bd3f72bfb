use serde::{Deserialize, Serialize};

use crate::status::{Parameter, Status};

pub const DEFAULT_SIGNAL_QUALITY: u8 = 100;
pub const DEFAULT_LOCATION: &str = "Localização não informada";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Connectivity {
    Online,
    Offline,
}

/// Unit reported for turbidity. The dashboard and history screens of the
/// app historically disagreed, so callers choose explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurbidityUnit {
    #[default]
    Ntu,
    Percent,
}

impl TurbidityUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TurbidityUnit::Ntu => "NTU",
            TurbidityUnit::Percent => "%",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterReading {
    pub value: Option<f64>,
    pub status: Status,
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeviceReading {
    pub ph: ParameterReading,
    pub turbidity: ParameterReading,
    pub conductivity: ParameterReading,
    pub temperature: ParameterReading,
    pub timestamp: String,
    pub signal_quality: u8,
}

impl DeviceReading {
    pub fn parameter(&self, parameter: Parameter) -> &ParameterReading {
        match parameter {
            Parameter::Ph => &self.ph,
            Parameter::Turbidity => &self.turbidity,
            Parameter::Conductivity => &self.conductivity,
            Parameter::Temperature => &self.temperature,
        }
    }

    /// Most severe status across the four parameters.
    pub fn worst_status(&self) -> Status {
        Parameter::ALL
            .iter()
            .map(|p| self.parameter(*p).status)
            .max_by_key(|s| s.severity())
            .unwrap_or(Status::Unknown)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub location: String,
    pub connectivity: Connectivity,
    pub battery_percent: u8,
    pub current_reading: Option<DeviceReading>,
    pub total_readings: u32,
    pub last_reading_at: Option<String>,
}

impl Device {
    /// Fully defaulted stand-in for a record that could not be mapped.
    pub fn placeholder(index: usize) -> Self {
        Device {
            id: default_device_id(index),
            name: default_device_name(index),
            location: DEFAULT_LOCATION.to_string(),
            connectivity: Connectivity::Offline,
            battery_percent: 0,
            current_reading: None,
            total_readings: 0,
            last_reading_at: None,
        }
    }

    pub fn is_online(&self) -> bool {
        self.connectivity == Connectivity::Online
    }
}

pub(crate) fn default_device_name(index: usize) -> String {
    format!("Dispositivo {}", index + 1)
}

pub(crate) fn default_device_id(index: usize) -> String {
    format!("dispositivo-{}", index + 1)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReadingPage {
    pub readings: Vec<DeviceReading>,
    pub page: u32,
    pub total: u32,
    pub has_more: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    pub id: String,
    pub device_id: Option<String>,
    pub device_name: Option<String>,
    pub parameter: Option<Parameter>,
    pub message: String,
    pub level: Status,
    pub value: Option<f64>,
    pub created_at: Option<String>,
    pub read: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AlertRule {
    pub id: String,
    pub device_id: Option<String>,
    pub parameter: Parameter,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(value: Option<f64>, status: Status) -> ParameterReading {
        ParameterReading {
            value,
            status,
            unit: String::new(),
        }
    }

    #[test]
    fn test_placeholder_defaults() {
        let device = Device::placeholder(1);
        assert_eq!(device.id, "dispositivo-2");
        assert_eq!(device.name, "Dispositivo 2");
        assert_eq!(device.location, DEFAULT_LOCATION);
        assert_eq!(device.connectivity, Connectivity::Offline);
        assert_eq!(device.battery_percent, 0);
        assert!(device.current_reading.is_none());
        assert_eq!(device.total_readings, 0);
        assert!(device.last_reading_at.is_none());
    }

    #[test]
    fn test_worst_status() {
        let reading = DeviceReading {
            ph: param(Some(7.5), Status::Normal),
            turbidity: param(Some(6.0), Status::Warning),
            conductivity: param(None, Status::Unknown),
            temperature: param(Some(35.0), Status::Danger),
            timestamp: "2024-05-01T10:00:00Z".to_string(),
            signal_quality: DEFAULT_SIGNAL_QUALITY,
        };
        assert_eq!(reading.worst_status(), Status::Danger);
        assert_eq!(reading.parameter(Parameter::Turbidity).status, Status::Warning);
    }

    #[test]
    fn test_turbidity_unit_symbol() {
        assert_eq!(TurbidityUnit::Ntu.symbol(), "NTU");
        assert_eq!(TurbidityUnit::Percent.symbol(), "%");
        assert_eq!(TurbidityUnit::default(), TurbidityUnit::Ntu);
    }
}
