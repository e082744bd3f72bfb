use thiserror::Error;

/// Error type for backend calls made on behalf of the app.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("unexpected http status {status}")]
    Http { status: u16 },

    #[error("backend error: {0}")]
    Backend(String),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A single raw field had a JSON type the canonical model cannot accept.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("field '{field}' expected {expected}")]
pub struct FieldError {
    pub field: &'static str,
    pub expected: &'static str,
}

/// Failure while mapping one raw device record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("record {index} is not an object")]
    NotAnObject { index: usize },

    #[error("record {index}: {source}")]
    InvalidField {
        index: usize,
        #[source]
        source: FieldError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Timeout { seconds: 15 };
        assert_eq!(err.to_string(), "request timed out after 15s");

        let err = ApiError::Backend("Usuário não encontrado".to_string());
        assert_eq!(err.to_string(), "backend error: Usuário não encontrado");

        let err = ApiError::Http { status: 502 };
        assert_eq!(err.to_string(), "unexpected http status 502");
    }

    #[test]
    fn test_record_error_display() {
        let err = RecordError::InvalidField {
            index: 1,
            source: FieldError {
                field: "nome",
                expected: "string or number",
            },
        };
        assert_eq!(
            err.to_string(),
            "record 1: field 'nome' expected string or number"
        );

        let err = RecordError::NotAnObject { index: 4 };
        assert_eq!(err.to_string(), "record 4 is not an object");
    }
}
