//! Error types for mcp-schema
//!
//! Two distinct regimes:
//!
//! 1. **Build-time errors** ([`SchemaError`]) — invalid DSL usage, raised
//!    while a component is being constructed. These abort registration.
//! 2. **Runtime errors** ([`ValidationError`](crate::schema::validate::ValidationError))
//!    — produced while validating request data. These are values carried in
//!    `Result`s, never panics, and reach clients as JSON-RPC errors.
//!
//! ## JSON-RPC Error Codes
//!
//! Standard JSON-RPC 2.0 error codes per the specification:
//! <https://www.jsonrpc.org/specification#error_object>
//!
//! | Code   | Message          | Meaning                                  |
//! |--------|------------------|------------------------------------------|
//! | -32700 | Parse error      | Invalid JSON was received                |
//! | -32600 | Invalid Request  | The JSON sent is not a valid Request     |
//! | -32601 | Method not found | The method does not exist / is not available |
//! | -32602 | Invalid params   | Invalid method parameter(s)              |
//! | -32603 | Internal error   | Internal JSON-RPC error                  |
//!
//! Validation failures map to `-32602`; the structured error list travels
//! in the error object's `data` member.

use serde::{Deserialize, Serialize};

use crate::schema::validate::ValidationError;

/// Invalid use of the schema DSL, detected when a component is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// A nested object declaration also carried an explicit type.
    #[error("field '{field}': nested object declarations imply their type")]
    NestedWithExplicitType { field: String },

    /// `values: [...]` combined with an explicit enum type.
    #[error("field '{field}': `values` cannot be combined with an enum type")]
    ValuesWithEnumType { field: String },

    /// An enum declaration (either surface form) with no values.
    #[error("field '{field}': enum declarations need at least one value")]
    EmptyEnum { field: String },

    /// The same field name declared twice in one block.
    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },

    /// A numeric bound that is NaN or infinite.
    #[error("field '{field}': numeric bounds must be finite")]
    NonFiniteBound { field: String },
}

/// Standard JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    /// Invalid JSON was received
    ParseError = -32700,
    /// The JSON sent is not a valid Request object
    InvalidRequest = -32600,
    /// The method does not exist / is not available
    MethodNotFound = -32601,
    /// Invalid method parameter(s)
    InvalidParams = -32602,
    /// Internal JSON-RPC error
    InternalError = -32603,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            ErrorCode::MethodNotFound,
            format!("Method not found: {}", method),
        )
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Renders a validation failure as an `InvalidParams` error.
    ///
    /// The message joins one line per failing field; the structured error
    /// records travel in `data` so clients can highlight exact paths.
    pub fn from_validation(errors: &[ValidationError]) -> Self {
        Self::new(ErrorCode::InvalidParams, render_errors(errors))
            .with_data(serde_json::json!({ "errors": errors }))
    }
}

/// mcp-schema error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("JSON-RPC error: {0:?}")]
    JsonRpc(JsonRpcError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Request arguments were rejected by the component's input schema.
    #[error("invalid params: {}", render_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("tool error: {0}")]
    Tool(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a tool error from any `Display` type.
    pub fn tool(message: impl Into<String>) -> Self {
        Error::Tool(message.into())
    }
}

impl From<JsonRpcError> for Error {
    fn from(err: JsonRpcError) -> Self {
        Error::JsonRpc(err)
    }
}

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Error::Validation(errors)
    }
}

fn render_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for mcp-schema
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::dsl::{FieldDecl, SchemaBuilder};
    use crate::schema::types::Primitive;
    use serde_json::json;

    fn sample_errors() -> Vec<ValidationError> {
        crate::schema::compile(
            SchemaBuilder::new()
                .field(FieldDecl::new("a", Primitive::Integer).required())
                .field(FieldDecl::new("b", Primitive::String).required()),
        )
        .unwrap()
        .validate(&json!({}))
        .unwrap_err()
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::ParseError.code(), -32700);
        assert_eq!(ErrorCode::InvalidParams.code(), -32602);
    }

    #[test]
    fn test_from_validation_sets_code_and_data() {
        let err = JsonRpcError::from_validation(&sample_errors());
        assert_eq!(err.code, ErrorCode::InvalidParams.code());
        assert_eq!(err.message, "missing_required at a; missing_required at b");
        let data = err.data.unwrap();
        assert_eq!(data["errors"].as_array().unwrap().len(), 2);
        assert_eq!(data["errors"][0]["path"], json!(["a"]));
    }

    #[test]
    fn test_data_omitted_when_absent() {
        let json = serde_json::to_value(JsonRpcError::method_not_found("nope")).unwrap();
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_validation_error_display_through_error_enum() {
        let err = Error::Validation(sample_errors());
        assert_eq!(
            err.to_string(),
            "invalid params: missing_required at a; missing_required at b"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
        assert_send_sync::<SchemaError>();
    }
}
