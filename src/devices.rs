//! Device aggregation.
//!
//! Turns the raw device list returned by the backend into canonical
//! [`Device`] values for display. Records are mapped independently; one that
//! cannot be mapped becomes a placeholder instead of failing the list.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::coerce;
use crate::error::{FieldError, RecordError};
use crate::models::{
    default_device_id, default_device_name, Connectivity, Device, TurbidityUnit, DEFAULT_LOCATION,
};
use crate::reading::{normalize_at, raw_timestamp};

const ID_KEYS: [&str; 2] = ["id", "dispositivo_id"];
const NAME_KEYS: [&str; 2] = ["nome", "name"];
const LOCATION_KEYS: [&str; 2] = ["localizacao", "location"];
const BATTERY_KEYS: [&str; 3] = ["bateria", "nivel_bateria", "battery"];
const ONLINE_KEYS: [&str; 2] = ["online", "status"];
const COUNT_KEYS: [&str; 1] = ["total_leituras"];
const READING_KEYS: [&str; 1] = ["ultima_leitura"];
const UPDATED_KEYS: [&str; 1] = ["ultima_atualizacao"];

/// Map one raw record. `index` is the record's position in the list.
pub fn map_device(
    index: usize,
    raw: &Value,
    turbidity_unit: TurbidityUnit,
    now: DateTime<Utc>,
) -> Result<Device, RecordError> {
    if !raw.is_object() {
        return Err(RecordError::NotAnObject { index });
    }
    let invalid = |source| RecordError::InvalidField { index, source };

    let id = coerce::text_field(raw, &ID_KEYS).map_err(invalid)?;
    let name = coerce::text_field(raw, &NAME_KEYS).map_err(invalid)?;
    let location = coerce::text_field(raw, &LOCATION_KEYS).map_err(invalid)?;

    let raw_reading = coerce::field(raw, &READING_KEYS);
    if raw_reading.is_some_and(|r| !r.is_object()) {
        return Err(invalid(FieldError {
            field: "ultima_leitura",
            expected: "object",
        }));
    }

    let battery_percent = coerce::field(raw, &BATTERY_KEYS)
        .and_then(coerce::percent)
        .unwrap_or(0);
    let total_readings = coerce::field(raw, &COUNT_KEYS)
        .and_then(coerce::count)
        .unwrap_or(0);

    let last_reading_at = raw_reading
        .and_then(raw_timestamp)
        .or_else(|| coerce::raw_string_field(raw, &UPDATED_KEYS));

    Ok(Device {
        id: id.unwrap_or_else(|| default_device_id(index)),
        name: name.unwrap_or_else(|| default_device_name(index)),
        location: location.unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        connectivity: connectivity(raw, total_readings),
        battery_percent,
        current_reading: normalize_at(raw_reading, turbidity_unit, now),
        total_readings,
        last_reading_at,
    })
}

/// An explicit indicator decides when present; otherwise a device that has
/// reported at least once counts as online.
fn connectivity(raw: &Value, total_readings: u32) -> Connectivity {
    let online = coerce::flag_field(raw, &ONLINE_KEYS).unwrap_or(total_readings > 0);
    if online {
        Connectivity::Online
    } else {
        Connectivity::Offline
    }
}

/// Aggregate with an explicit turbidity unit and clock.
pub fn aggregate_with(
    raw_devices: &[Value],
    turbidity_unit: TurbidityUnit,
    now: DateTime<Utc>,
) -> Vec<Device> {
    raw_devices
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            map_device(index, raw, turbidity_unit, now).unwrap_or_else(|err| {
                tracing::warn!(%err, "substituting placeholder for malformed device record");
                Device::placeholder(index)
            })
        })
        .collect()
}

/// One canonical device per raw record, in input order.
pub fn aggregate(raw_devices: &[Value]) -> Vec<Device> {
    aggregate_with(raw_devices, TurbidityUnit::default(), Utc::now())
}

/// The device the dashboard leads with: first online, else first.
pub fn primary_device(devices: &[Device]) -> Option<&Device> {
    devices
        .iter()
        .find(|d| d.is_online())
        .or_else(|| devices.first())
}
