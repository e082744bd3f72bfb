use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Request/response channel to the REST backend.
///
/// Implementations return the decoded JSON body; envelope handling happens in
/// the API layer.
pub trait Transport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError>;
    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}

/// Blocking HTTP transport. Calls block the current thread for at most the
/// configured timeout and are never retried.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        let text = response.text().map_err(|e| self.map_error(e))?;
        let body = serde_json::from_str::<Value>(&text);

        if !status.is_success() {
            // The backend reports most failures as an error envelope.
            if let Some(message) = body
                .as_ref()
                .ok()
                .and_then(|b| b.get("mensagem"))
                .and_then(Value::as_str)
            {
                return Err(ApiError::Backend(message.to_string()));
            }
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        body.map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn map_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                seconds: self.config.timeout_secs,
            }
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.config.endpoint_url(path);
        tracing::debug!(%url, "GET");
        self.send(self.client.get(url).query(query))
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.config.endpoint_url(path);
        tracing::debug!(%url, "POST");
        self.send(self.client.post(url).json(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = HttpTransport::new(ClientConfig::default()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig(_)));
    }

    #[test]
    fn test_new_keeps_config() {
        let transport = HttpTransport::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        assert_eq!(transport.config().timeout_secs, 15);
    }

    #[test]
    fn test_request_failure_is_network_error() {
        let transport = HttpTransport::new(ClientConfig::new("http://localhost")).unwrap();
        let err = transport.client.get("sem url").build().unwrap_err();
        assert!(matches!(transport.map_error(err), ApiError::Network(_)));
    }
}
