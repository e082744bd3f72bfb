use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    #[serde(alias = "success")]
    Sucesso,
    #[serde(alias = "error")]
    Erro,
}

/// Wrapper every backend endpoint responds with.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T = Value> {
    pub status: EnvelopeStatus,
    #[serde(default)]
    pub mensagem: String,
    pub dados: Option<T>,
    pub timestamp: Option<String>,
}

impl<T: DeserializeOwned> Envelope<T> {
    pub fn from_value(body: Value) -> Result<Self, ApiError> {
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Payload of a successful response; the backend message on failure.
    pub fn into_data(self) -> Result<Option<T>, ApiError> {
        match self.status {
            EnvelopeStatus::Sucesso => Ok(self.dados),
            EnvelopeStatus::Erro => {
                let message = if self.mensagem.trim().is_empty() {
                    "erro desconhecido".to_string()
                } else {
                    self.mensagem
                };
                Err(ApiError::Backend(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let body = json!({
            "status": "sucesso",
            "mensagem": "ok",
            "dados": [{"id": 1}],
            "timestamp": "2024-05-01 12:00:00"
        });
        let envelope = Envelope::<Value>::from_value(body).unwrap();
        assert_eq!(envelope.status, EnvelopeStatus::Sucesso);
        assert_eq!(envelope.timestamp.as_deref(), Some("2024-05-01 12:00:00"));
        assert_eq!(envelope.into_data().unwrap(), Some(json!([{"id": 1}])));
    }

    #[test]
    fn test_success_without_data() {
        let body = json!({"status": "sucesso", "mensagem": "Regra atualizada"});
        let envelope = Envelope::<Value>::from_value(body).unwrap();
        assert_eq!(envelope.into_data().unwrap(), None);
    }

    #[test]
    fn test_error_envelope() {
        let body = json!({"status": "erro", "mensagem": "Senha incorreta", "timestamp": "x"});
        let err = Envelope::<Value>::from_value(body).unwrap().into_data().unwrap_err();
        assert_eq!(err, ApiError::Backend("Senha incorreta".to_string()));

        let body = json!({"status": "erro"});
        let err = Envelope::<Value>::from_value(body).unwrap().into_data().unwrap_err();
        assert_eq!(err, ApiError::Backend("erro desconhecido".to_string()));
    }

    #[test]
    fn test_invalid_envelope() {
        let err = Envelope::<Value>::from_value(json!({"dados": []})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));

        let err = Envelope::<Value>::from_value(json!({"status": "talvez"})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_typed_payload() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Count {
            total: u32,
        }
        let body = json!({"status": "success", "dados": {"total": 4}});
        let data = Envelope::<Count>::from_value(body).unwrap().into_data().unwrap();
        assert_eq!(data, Some(Count { total: 4 }));
    }
}
