//! The schema subsystem: declare once, get three agreeing artifacts.
//!
//! A schema is declared through the builder DSL ([`dsl`]), normalized into
//! a canonical tree ([`normalize`], [`types`]), and from that single form
//! both the published JSON-Schema document ([`emit`]) and the runtime
//! validator ([`validate`]) are derived. The emitter and validator never
//! see the raw declarations, so the three artifacts cannot drift apart.
//!
//! # Example
//!
//! ```rust
//! use mcp_schema::{FieldDecl, Primitive, SchemaBuilder, schema};
//! use serde_json::json;
//!
//! let compiled = schema::compile(
//!     SchemaBuilder::new()
//!         .field(FieldDecl::new("query", Primitive::String).required())
//!         .field(FieldDecl::new("limit", Primitive::Integer).min(1).max(50)),
//! )
//! .unwrap();
//!
//! assert_eq!(compiled.json_schema()["required"], json!(["query"]));
//!
//! let params = compiled.validate(&json!({"query": "rust", "limit": 10})).unwrap();
//! assert_eq!(params.get("query"), Some(&json!("rust")));
//! ```

pub mod dsl;
pub mod emit;
pub mod normalize;
pub mod types;
pub mod validate;

use std::sync::Arc;

use serde_json::Value;

use crate::error::SchemaError;
use self::dsl::SchemaBuilder;
use self::types::Schema;
use self::validate::{Validated, ValidationError, Validator};

/// The immutable artifact produced by [`compile`]: the normalized schema,
/// its JSON-Schema document, and a validator, all derived from one
/// declaration.
///
/// Built once at component-registration time; cloning is cheap and the
/// clones share the underlying schema.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    schema: Arc<Schema>,
    json_schema: Value,
    validator: Validator,
}

impl CompiledSchema {
    /// The normalized schema tree.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The JSON-Schema document published to clients.
    pub fn json_schema(&self) -> &Value {
        &self.json_schema
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Shorthand for `self.validator().validate(input)`.
    pub fn validate(&self, input: &Value) -> Result<Validated, Vec<ValidationError>> {
        self.validator.validate(input)
    }
}

/// Compiles captured declarations into a [`CompiledSchema`].
///
/// This is the `build` operation the component registry calls once per
/// tool or prompt. DSL misuse surfaces here as a [`SchemaError`]; after a
/// successful compile the artifact is immutable and thread-safe.
pub fn compile(builder: SchemaBuilder) -> Result<CompiledSchema, SchemaError> {
    let raw = builder.build()?;
    let schema = Arc::new(normalize::normalize(&raw));
    let json_schema = emit::json_schema(&schema);
    let validator = Validator::new(Arc::clone(&schema));
    tracing::debug!(fields = schema.fields.len(), "compiled schema");
    Ok(CompiledSchema {
        schema,
        json_schema,
        validator,
    })
}

/// Compiles an empty schema: an open object with no declared fields.
///
/// Used for tools that take no arguments.
pub fn empty() -> CompiledSchema {
    // An empty builder cannot fail validation.
    compile(SchemaBuilder::new()).unwrap_or_else(|_| unreachable!())
}
