use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::api::endpoints;
use crate::error::ApiError;
use crate::transport::Transport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Serves canned bodies keyed by endpoint path and records every request.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub responses: HashMap<String, Result<Value, ApiError>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), Ok(body));
        self
    }

    pub fn with_error(mut self, path: &str, err: ApiError) -> Self {
        self.responses.insert(path.to_string(), Err(err));
        self
    }

    pub fn with_sample_data() -> Self {
        Self::new()
            .with_response(
                endpoints::LOGIN,
                json!({
                    "status": "sucesso",
                    "mensagem": "Login realizado",
                    "dados": {"id": 7, "nome": "Ana Souza", "email": "ana@example.org"},
                    "timestamp": "2024-05-01 12:00:00"
                }),
            )
            .with_response(
                endpoints::DEVICES,
                json!({
                    "status": "sucesso",
                    "mensagem": "",
                    "dados": [
                        {
                            "id": 1,
                            "nome": "Reservatório Principal",
                            "localizacao": "Telhado",
                            "bateria": 76,
                            "online": 1,
                            "total_leituras": 1520,
                            "ultima_leitura": {
                                "ph": "7.3",
                                "turbidez": "2.1",
                                "condutividade": "1.2",
                                "temperatura": "23.5",
                                "timestamp": "2024-05-01 11:58:00"
                            }
                        },
                        {"id": 2, "nome": "Cisterna", "total_leituras": 0}
                    ],
                    "timestamp": "2024-05-01 12:00:00"
                }),
            )
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn respond(&self, request: RecordedRequest) -> Result<Value, ApiError> {
        let response = self
            .responses
            .get(&request.path)
            .cloned()
            .unwrap_or(Err(ApiError::Http { status: 404 }));
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        response
    }
}

impl Transport for MockTransport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        self.respond(RecordedRequest {
            method: Method::Get,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body: None,
        })
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.respond(RecordedRequest {
            method: Method::Post,
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body.clone()),
        })
    }
}
