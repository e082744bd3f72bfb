//! Reading normalization.
//!
//! Maps a raw `ultima_leitura` / history row into a [`DeviceReading`]. Each
//! parameter is coerced and classified on its own, so one bad field never
//! affects the others.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::coerce;
use crate::models::{DeviceReading, ParameterReading, TurbidityUnit, DEFAULT_SIGNAL_QUALITY};
use crate::relative_time::format_timestamp;
use crate::status::{classify, Parameter};

pub const TIMESTAMP_KEYS: [&str; 3] = ["timestamp", "data_hora", "criado_em"];
const SIGNAL_KEYS: [&str; 2] = ["qualidade_sinal", "sinal"];

/// Fixed display unit of a parameter.
pub fn unit_for(parameter: Parameter, turbidity_unit: TurbidityUnit) -> &'static str {
    match parameter {
        Parameter::Ph | Parameter::Conductivity => "",
        Parameter::Turbidity => turbidity_unit.symbol(),
        Parameter::Temperature => "°C",
    }
}

/// Build a parameter reading from an already coerced value.
pub fn parameter_reading(
    parameter: Parameter,
    value: Option<f64>,
    turbidity_unit: TurbidityUnit,
) -> ParameterReading {
    ParameterReading {
        value,
        status: classify(parameter, value),
        unit: unit_for(parameter, turbidity_unit).to_string(),
    }
}

/// Raw timestamp of a reading row, passed through exactly as received.
pub fn raw_timestamp(raw: &Value) -> Option<String> {
    coerce::raw_string_field(raw, &TIMESTAMP_KEYS)
}

/// Normalize a raw reading, filling a missing timestamp with `now`.
///
/// Returns `None` when there is no reading object at all.
pub fn normalize_at(
    raw: Option<&Value>,
    turbidity_unit: TurbidityUnit,
    now: DateTime<Utc>,
) -> Option<DeviceReading> {
    let raw = raw.filter(|v| v.is_object())?;

    let read = |parameter: Parameter| {
        let value = coerce::number_field(raw, &[parameter.raw_key()]);
        parameter_reading(parameter, value, turbidity_unit)
    };

    let signal_quality = coerce::field(raw, &SIGNAL_KEYS)
        .and_then(coerce::percent)
        .unwrap_or(DEFAULT_SIGNAL_QUALITY);

    Some(DeviceReading {
        ph: read(Parameter::Ph),
        turbidity: read(Parameter::Turbidity),
        conductivity: read(Parameter::Conductivity),
        temperature: read(Parameter::Temperature),
        timestamp: raw_timestamp(raw).unwrap_or_else(|| format_timestamp(&now)),
        signal_quality,
    })
}

pub fn normalize(raw: Option<&Value>, turbidity_unit: TurbidityUnit) -> Option<DeviceReading> {
    normalize_at(raw, turbidity_unit, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_normalize_full_reading() {
        let raw = json!({
            "ph": "7.4",
            "turbidez": 3.2,
            "condutividade": "2.3",
            "temperatura": 31,
            "timestamp": "2024-05-01 11:55:00"
        });
        let reading = normalize_at(Some(&raw), TurbidityUnit::Ntu, now()).unwrap();

        assert_eq!(reading.ph.value, Some(7.4));
        assert_eq!(reading.ph.status, Status::Normal);
        assert_eq!(reading.ph.unit, "");
        assert_eq!(reading.turbidity.value, Some(3.2));
        assert_eq!(reading.turbidity.status, Status::Normal);
        assert_eq!(reading.turbidity.unit, "NTU");
        assert_eq!(reading.conductivity.status, Status::Warning);
        assert_eq!(reading.conductivity.unit, "");
        assert_eq!(reading.temperature.value, Some(31.0));
        assert_eq!(reading.temperature.status, Status::Danger);
        assert_eq!(reading.temperature.unit, "°C");
        assert_eq!(reading.timestamp, "2024-05-01 11:55:00");
        assert_eq!(reading.signal_quality, 100);
    }

    #[test]
    fn test_null_ph_does_not_touch_other_fields() {
        let raw = json!({
            "ph": null,
            "turbidez": 12,
            "condutividade": 1.1,
            "temperatura": 20.5
        });
        let reading = normalize_at(Some(&raw), TurbidityUnit::Ntu, now()).unwrap();

        assert_eq!(reading.ph.value, None);
        assert_eq!(reading.ph.status, Status::Unknown);
        assert_eq!(reading.turbidity.status, Status::Danger);
        assert_eq!(reading.conductivity.status, Status::Normal);
        assert_eq!(reading.temperature.status, Status::Normal);
    }

    #[test]
    fn test_malformed_number_is_unknown() {
        let raw = json!({"ph": "ácido", "turbidez": {"v": 1}, "temperatura": [22]});
        let reading = normalize_at(Some(&raw), TurbidityUnit::Ntu, now()).unwrap();

        assert_eq!(reading.ph.value, None);
        assert_eq!(reading.ph.status, Status::Unknown);
        assert_eq!(reading.turbidity.status, Status::Unknown);
        assert_eq!(reading.temperature.status, Status::Unknown);
        assert_eq!(reading.conductivity.status, Status::Unknown);
    }

    #[test]
    fn test_missing_timestamp_uses_now() {
        let raw = json!({"ph": 7.0});
        let reading = normalize_at(Some(&raw), TurbidityUnit::Ntu, now()).unwrap();
        assert_eq!(reading.timestamp, "2024-05-01T12:00:00.000Z");

        let raw = json!({"ph": 7.0, "timestamp": "   "});
        let reading = normalize_at(Some(&raw), TurbidityUnit::Ntu, now()).unwrap();
        assert_eq!(reading.timestamp, "2024-05-01T12:00:00.000Z");
    }

    #[test]
    fn test_timestamp_passes_through_verbatim() {
        let raw = json!({"ph": 7.0, "timestamp": " 2024-05-01 11:55:00 "});
        let reading = normalize_at(Some(&raw), TurbidityUnit::Ntu, now()).unwrap();
        assert_eq!(reading.timestamp, " 2024-05-01 11:55:00 ");
    }

    #[test]
    fn test_hex_like_value_is_unknown() {
        let raw = json!({"ph": "0x10", "turbidez": "7.2abc"});
        let reading = normalize_at(Some(&raw), TurbidityUnit::Ntu, now()).unwrap();
        assert_eq!(reading.ph.value, None);
        assert_eq!(reading.ph.status, Status::Unknown);
        assert_eq!(reading.turbidity.status, Status::Unknown);
    }

    #[test]
    fn test_absent_raw() {
        assert!(normalize_at(None, TurbidityUnit::Ntu, now()).is_none());
        assert!(normalize_at(Some(&json!(null)), TurbidityUnit::Ntu, now()).is_none());
        assert!(normalize_at(Some(&json!("7.2")), TurbidityUnit::Ntu, now()).is_none());
    }

    #[test]
    fn test_turbidity_unit_and_signal() {
        let raw = json!({"turbidez": 4, "qualidade_sinal": "73.4", "data_hora": "2024-05-01T11:00:00Z"});
        let reading = normalize_at(Some(&raw), TurbidityUnit::Percent, now()).unwrap();
        assert_eq!(reading.turbidity.unit, "%");
        assert_eq!(reading.signal_quality, 73);
        assert_eq!(reading.timestamp, "2024-05-01T11:00:00Z");
    }

    #[test]
    fn test_normalize_stamps_current_time() {
        let before = Utc::now();
        let reading = normalize(Some(&json!({"ph": 7.1})), TurbidityUnit::Ntu).unwrap();
        let stamped = crate::relative_time::parse_timestamp(&reading.timestamp).unwrap();
        assert!(stamped >= before - chrono::Duration::seconds(1));
    }
}
