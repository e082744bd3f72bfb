//! Alert and alert rule mapping.

use serde_json::{json, Value};

use crate::coerce;
use crate::models::{Alert, AlertRule};
use crate::status::{classify, Parameter, Status};

const ID_KEYS: [&str; 2] = ["id", "alerta_id"];
const DEVICE_ID_KEYS: [&str; 1] = ["dispositivo_id"];
const DEVICE_NAME_KEYS: [&str; 2] = ["dispositivo_nome", "nome_dispositivo"];
const PARAMETER_KEYS: [&str; 2] = ["parametro", "tipo_parametro"];
const MESSAGE_KEYS: [&str; 2] = ["mensagem", "descricao"];
const LEVEL_KEYS: [&str; 2] = ["nivel", "tipo"];
const CREATED_KEYS: [&str; 3] = ["data_hora", "criado_em", "timestamp"];
const READ_KEYS: [&str; 2] = ["lido", "visualizado"];

fn level_from_text(level: &str) -> Option<Status> {
    match level.trim().to_lowercase().as_str() {
        "perigo" | "critico" | "crítico" | "danger" | "alto" => Some(Status::Danger),
        "atencao" | "atenção" | "aviso" | "warning" | "medio" | "médio" => Some(Status::Warning),
        "normal" | "info" => Some(Status::Normal),
        _ => None,
    }
}

fn optional_text(raw: &Value, keys: &[&'static str]) -> Option<String> {
    coerce::text_field(raw, keys).ok().flatten()
}

/// Map one alert row. Rows without an id are dropped.
pub fn map_alert(raw: &Value) -> Option<Alert> {
    let id = optional_text(raw, &ID_KEYS)?;
    let parameter = coerce::string_field(raw, &PARAMETER_KEYS).and_then(|p| Parameter::from_key(&p));
    let value = coerce::number_field(raw, &["valor"]);

    let level = coerce::string_field(raw, &LEVEL_KEYS)
        .and_then(|l| level_from_text(&l))
        .or_else(|| parameter.map(|p| classify(p, value)))
        .unwrap_or(Status::Unknown);

    let message = coerce::string_field(raw, &MESSAGE_KEYS).unwrap_or_else(|| match parameter {
        Some(p) => format!("{} fora do limite", p.label()),
        None => "Alerta".to_string(),
    });

    Some(Alert {
        id,
        device_id: optional_text(raw, &DEVICE_ID_KEYS),
        device_name: optional_text(raw, &DEVICE_NAME_KEYS),
        parameter,
        message,
        level,
        value,
        created_at: coerce::string_field(raw, &CREATED_KEYS),
        read: coerce::flag_field(raw, &READ_KEYS).unwrap_or(false),
    })
}

pub fn map_alerts(rows: &[Value]) -> Vec<Alert> {
    rows.iter()
        .filter_map(|row| {
            let alert = map_alert(row);
            if alert.is_none() {
                tracing::warn!("dropping alert row without id");
            }
            alert
        })
        .collect()
}

/// Map one rule row. Rows without an id or a known parameter are dropped.
pub fn map_alert_rule(raw: &Value) -> Option<AlertRule> {
    let id = optional_text(raw, &ID_KEYS)?;
    let parameter =
        coerce::string_field(raw, &PARAMETER_KEYS).and_then(|p| Parameter::from_key(&p))?;

    Some(AlertRule {
        id,
        device_id: optional_text(raw, &DEVICE_ID_KEYS),
        parameter,
        min_value: coerce::number_field(raw, &["valor_minimo", "minimo"]),
        max_value: coerce::number_field(raw, &["valor_maximo", "maximo"]),
        enabled: coerce::flag_field(raw, &["ativo", "habilitado"]).unwrap_or(true),
    })
}

pub fn map_alert_rules(rows: &[Value]) -> Vec<AlertRule> {
    rows.iter()
        .filter_map(|row| {
            let rule = map_alert_rule(row);
            if rule.is_none() {
                tracing::warn!("dropping malformed alert rule row");
            }
            rule
        })
        .collect()
}

/// Request body for updating a rule.
pub fn rule_payload(user_id: &str, rule: &AlertRule) -> Value {
    json!({
        "usuario_id": user_id,
        "id": rule.id,
        "dispositivo_id": rule.device_id,
        "parametro": rule.parameter.raw_key(),
        "valor_minimo": rule.min_value,
        "valor_maximo": rule.max_value,
        "ativo": if rule.enabled { 1 } else { 0 },
    })
}

pub fn unread_count(alerts: &[Alert]) -> usize {
    alerts.iter().filter(|a| !a.read).count()
}
