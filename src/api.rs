//! Backend API service.
//!
//! Every operation takes its session explicitly, sends one request through a
//! [`Transport`], unwraps the response envelope and maps the payload into the
//! canonical model.

use chrono::Utc;
use serde_json::{json, Value};

use crate::alerts::{map_alert_rules, map_alerts, rule_payload};
use crate::coerce;
use crate::devices::aggregate_with;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::models::{
    Alert, AlertRule, Device, ProfileUpdate, ReadingPage, Session, SignupRequest, TurbidityUnit,
};
use crate::reading::normalize_at;
use crate::transport::Transport;

pub mod endpoints {
    pub const LOGIN: &str = "auth/login.php";
    pub const SIGNUP: &str = "auth/cadastro.php";
    pub const PROFILE: &str = "usuarios/atualizar.php";
    pub const DEVICES: &str = "dispositivos/listar.php";
    pub const READINGS: &str = "leituras/listar.php";
    pub const ALERTS: &str = "alertas/listar.php";
    pub const ALERT_READ: &str = "alertas/marcar_lido.php";
    pub const ALERT_RULES: &str = "alertas/regras.php";
    pub const ALERT_RULE_UPDATE: &str = "alertas/atualizar_regra.php";
}

/// History screens always show turbidity in NTU.
const HISTORY_TURBIDITY_UNIT: TurbidityUnit = TurbidityUnit::Ntu;

pub struct WaterApi<T: Transport> {
    transport: T,
    dashboard_turbidity_unit: TurbidityUnit,
}

fn require(value: &str, what: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{} is required", what)));
    }
    Ok(())
}

fn rows(data: Option<Value>, what: &str) -> Result<Vec<Value>, ApiError> {
    match data {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rows)) => Ok(rows),
        Some(_) => Err(ApiError::Decode(format!("{} is not a list", what))),
    }
}

fn session_from(data: &Value, fallback_email: &str) -> Result<Session, ApiError> {
    let user_id = coerce::text_field(data, &["id", "usuario_id"])
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .ok_or_else(|| ApiError::Decode("response has no user id".to_string()))?;
    Ok(Session {
        user_id,
        name: coerce::string_field(data, &["nome", "name"]).unwrap_or_default(),
        email: coerce::string_field(data, &["email"]).unwrap_or_else(|| fallback_email.to_string()),
    })
}

impl<T: Transport> WaterApi<T> {
    pub fn new(transport: T, dashboard_turbidity_unit: TurbidityUnit) -> Self {
        Self {
            transport,
            dashboard_turbidity_unit,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn fetch(&self, path: &str, query: &[(&str, String)]) -> Result<Option<Value>, ApiError> {
        let body = self.transport.get(path, query)?;
        Envelope::<Value>::from_value(body)?.into_data()
    }

    fn submit(&self, path: &str, body: &Value) -> Result<Option<Value>, ApiError> {
        let response = self.transport.post(path, body)?;
        Envelope::<Value>::from_value(response)?.into_data()
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        require(email, "email")?;
        require(password, "password")?;

        let data = self
            .submit(endpoints::LOGIN, &json!({"email": email.trim(), "senha": password}))?
            .ok_or_else(|| ApiError::Decode("login response has no user".to_string()))?;
        let session = session_from(&data, email.trim())?;
        tracing::info!(user_id = %session.user_id, "logged in");
        Ok(session)
    }

    pub fn signup(&self, request: &SignupRequest) -> Result<Session, ApiError> {
        require(&request.name, "name")?;
        require(&request.email, "email")?;
        require(&request.password, "password")?;

        let body = json!({
            "nome": request.name.trim(),
            "email": request.email.trim(),
            "senha": request.password,
        });
        let data = self
            .submit(endpoints::SIGNUP, &body)?
            .ok_or_else(|| ApiError::Decode("signup response has no user".to_string()))?;
        session_from(&data, request.email.trim())
    }

    /// Returns the session with the updated profile applied.
    pub fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<Session, ApiError> {
        require(&update.name, "name")?;
        require(&update.email, "email")?;

        let body = json!({
            "usuario_id": session.user_id,
            "nome": update.name.trim(),
            "email": update.email.trim(),
        });
        let data = self.submit(endpoints::PROFILE, &body)?;
        Ok(Session {
            user_id: session.user_id.clone(),
            name: data
                .as_ref()
                .and_then(|d| coerce::string_field(d, &["nome"]))
                .unwrap_or_else(|| update.name.trim().to_string()),
            email: data
                .as_ref()
                .and_then(|d| coerce::string_field(d, &["email"]))
                .unwrap_or_else(|| update.email.trim().to_string()),
        })
    }

    pub fn list_devices(&self, session: &Session) -> Result<Vec<Device>, ApiError> {
        let data = self.fetch(
            endpoints::DEVICES,
            &[("usuario_id", session.user_id.clone())],
        )?;
        let raw = rows(data, "device list")?;
        tracing::debug!(count = raw.len(), "aggregating devices");
        Ok(aggregate_with(&raw, self.dashboard_turbidity_unit, Utc::now()))
    }

    /// One page of a device's reading history, newest first as served.
    pub fn device_readings(
        &self,
        device_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<ReadingPage, ApiError> {
        require(device_id, "device id")?;
        if page == 0 || limit == 0 {
            return Err(ApiError::InvalidInput(
                "page and limit start at 1".to_string(),
            ));
        }

        let data = self.fetch(
            endpoints::READINGS,
            &[
                ("dispositivo_id", device_id.to_string()),
                ("pagina", page.to_string()),
                ("limite", limit.to_string()),
            ],
        )?;

        let (raw, total) = match data {
            Some(Value::Object(map)) => {
                let total = map.get("total").and_then(coerce::count);
                let raw = rows(map.get("leituras").cloned(), "readings")?;
                (raw, total)
            }
            other => (rows(other, "readings")?, None),
        };

        let now = Utc::now();
        let readings: Vec<_> = raw
            .iter()
            .filter_map(|row| {
                let reading = normalize_at(Some(row), HISTORY_TURBIDITY_UNIT, now);
                if reading.is_none() {
                    tracing::warn!(device_id, "skipping reading row that is not an object");
                }
                reading
            })
            .collect();

        let skipped = (page - 1).saturating_mul(limit);
        let total = total.unwrap_or_else(|| skipped.saturating_add(readings.len() as u32));
        let has_more = page.saturating_mul(limit) < total;

        Ok(ReadingPage {
            readings,
            page,
            total,
            has_more,
        })
    }

    pub fn list_alerts(&self, session: &Session) -> Result<Vec<Alert>, ApiError> {
        let data = self.fetch(endpoints::ALERTS, &[("usuario_id", session.user_id.clone())])?;
        Ok(map_alerts(&rows(data, "alerts")?))
    }

    pub fn mark_alert_read(&self, alert_id: &str) -> Result<(), ApiError> {
        require(alert_id, "alert id")?;
        self.submit(endpoints::ALERT_READ, &json!({"alerta_id": alert_id}))?;
        Ok(())
    }

    pub fn list_alert_rules(&self, session: &Session) -> Result<Vec<AlertRule>, ApiError> {
        let data = self.fetch(
            endpoints::ALERT_RULES,
            &[("usuario_id", session.user_id.clone())],
        )?;
        Ok(map_alert_rules(&rows(data, "alert rules")?))
    }

    pub fn update_alert_rule(&self, session: &Session, rule: &AlertRule) -> Result<(), ApiError> {
        if let (Some(min), Some(max)) = (rule.min_value, rule.max_value) {
            if min > max {
                return Err(ApiError::InvalidInput(
                    "minimum is greater than maximum".to_string(),
                ));
            }
        }
        self.submit(
            endpoints::ALERT_RULE_UPDATE,
            &rule_payload(&session.user_id, rule),
        )?;
        Ok(())
    }
}
