//! Tool definition and builder API
//!
//! A [`Tool`] couples a handler with the compiled artifacts of its declared
//! schemas: the input validator gates every call, a declared output schema
//! gates what the handler returns, and the emitted JSON-Schema documents
//! are what `tools/list` publishes. Handlers never see raw arguments; they
//! receive the key-normalized map the validator produced.
//!
//! # Example
//!
//! ```rust
//! use mcp_schema::{CallToolResult, FieldDecl, Primitive, SchemaBuilder, ToolBuilder};
//!
//! let tool = ToolBuilder::new("greet")
//!     .description("Greet someone by name")
//!     .input(
//!         SchemaBuilder::new()
//!             .field(FieldDecl::new("name", Primitive::String).required()),
//!     )
//!     .handler(|params| async move {
//!         let name = params["name"].as_str().unwrap_or_default().to_string();
//!         Ok(CallToolResult::text(format!("Hello, {name}!")))
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(tool.name, "greet");
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::protocol::{CallToolResult, ToolAnnotations, ToolDefinition};
use crate::schema::dsl::SchemaBuilder;
use crate::schema::validate::{Validated, ValidationError};
use crate::schema::{self, CompiledSchema};

/// A boxed future for tool handlers
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Tool handler trait - the core abstraction for tool execution
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with already-validated, key-normalized parameters.
    fn call(&self, params: Validated) -> BoxFuture<'_, Result<CallToolResult>>;
}

/// A complete tool definition with handler and compiled schemas.
pub struct Tool {
    pub name: String,
    pub description: Option<String>,
    pub annotations: Option<ToolAnnotations>,
    input: CompiledSchema,
    output: Option<CompiledSchema>,
    handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("annotations", &self.annotations)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl Tool {
    /// Create a new tool builder
    pub fn builder(name: impl Into<String>) -> ToolBuilder {
        ToolBuilder::new(name)
    }

    /// Get the tool definition for tools/list
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input.json_schema().clone(),
            output_schema: self.output.as_ref().map(|s| s.json_schema().clone()),
            annotations: self.annotations.clone(),
        }
    }

    /// The compiled input schema.
    pub fn input_schema(&self) -> &CompiledSchema {
        &self.input
    }

    /// The compiled output schema, if one was declared.
    pub fn output_schema(&self) -> Option<&CompiledSchema> {
        self.output.as_ref()
    }

    /// Validates raw arguments, invokes the handler, and validates the
    /// handler's structured output against the declared output shape.
    ///
    /// A `null` arguments value counts as an empty object (arguments are
    /// optional on the wire). Rejected input returns
    /// [`Error::Validation`](crate::Error::Validation) without invoking
    /// the handler; a successful result whose `structured_content` violates
    /// the output schema is rejected the same way before it can reach a
    /// client.
    pub fn call(&self, arguments: &Value) -> BoxFuture<'_, Result<CallToolResult>> {
        let params = if arguments.is_null() {
            self.input.validate(&Value::Object(serde_json::Map::new()))
        } else {
            self.input.validate(arguments)
        };
        match params {
            Ok(params) => {
                tracing::debug!(tool = %self.name, "arguments accepted");
                Box::pin(async move {
                    let result = self.handler.call(params).await?;
                    // Error results carry diagnostics, not payloads.
                    if !result.is_error
                        && let Some(payload) = &result.structured_content
                        && let Err(errors) = self.validate_output(payload)
                    {
                        tracing::warn!(tool = %self.name, errors = errors.len(), "output rejected");
                        return Err(errors.into());
                    }
                    Ok(result)
                })
            }
            Err(errors) => {
                tracing::warn!(tool = %self.name, errors = errors.len(), "arguments rejected");
                Box::pin(async move { Err(errors.into()) })
            }
        }
    }

    /// Validates an outbound payload against the declared output shape.
    ///
    /// Same machinery, same error values as input validation; [`Tool::call`]
    /// runs this on the handler's `structured_content`. Tools without an
    /// output schema accept any payload.
    pub fn validate_output(&self, payload: &Value) -> std::result::Result<(), Vec<ValidationError>> {
        match &self.output {
            Some(schema) => schema.validate(payload).map(|_| ()),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Builder API
// =============================================================================

/// Builder for creating tools with a fluent API
pub struct ToolBuilder {
    name: String,
    description: Option<String>,
    annotations: Option<ToolAnnotations>,
    input: Option<SchemaBuilder>,
    output: Option<SchemaBuilder>,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            annotations: None,
            input: None,
            output: None,
        }
    }

    /// Set the tool description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare the input schema. Omitting it leaves the tool argument-free.
    pub fn input(mut self, schema: SchemaBuilder) -> Self {
        self.input = Some(schema);
        self
    }

    /// Declare the output shape, validated via [`Tool::validate_output`].
    pub fn output(mut self, schema: SchemaBuilder) -> Self {
        self.output = Some(schema);
        self
    }

    /// Mark the tool as read-only (does not modify state)
    pub fn read_only(mut self) -> Self {
        self.annotations
            .get_or_insert_with(ToolAnnotations::default)
            .read_only_hint = Some(true);
        self
    }

    /// Mark the tool as idempotent (same args = same effect)
    pub fn idempotent(mut self) -> Self {
        self.annotations
            .get_or_insert_with(ToolAnnotations::default)
            .idempotent_hint = Some(true);
        self
    }

    /// Set tool annotations directly
    pub fn annotations(mut self, annotations: ToolAnnotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Specify the handler, which receives validated parameters.
    pub fn handler<F, Fut>(self, handler: F) -> ToolBuilderWithHandler<F>
    where
        F: Fn(Validated) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult>> + Send + 'static,
    {
        ToolBuilderWithHandler {
            inner: self,
            handler,
        }
    }
}

/// Builder state after handler is specified
pub struct ToolBuilderWithHandler<F> {
    inner: ToolBuilder,
    handler: F,
}

impl<F, Fut> ToolBuilderWithHandler<F>
where
    F: Fn(Validated) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CallToolResult>> + Send + 'static,
{
    /// Compile the declared schemas and build the tool.
    ///
    /// DSL misuse in either schema aborts construction here.
    pub fn build(self) -> std::result::Result<Tool, SchemaError> {
        let input = match self.inner.input {
            Some(builder) => schema::compile(builder)?,
            None => schema::empty(),
        };
        let output = self.inner.output.map(schema::compile).transpose()?;
        Ok(Tool {
            name: self.inner.name,
            description: self.inner.description,
            annotations: self.inner.annotations,
            input,
            output,
            handler: Arc::new(FnHandler {
                handler: self.handler,
            }),
        })
    }
}

/// Handler backed by a plain async closure.
struct FnHandler<F> {
    handler: F,
}

impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Validated) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CallToolResult>> + Send + 'static,
{
    fn call(&self, params: Validated) -> BoxFuture<'_, Result<CallToolResult>> {
        Box::pin((self.handler)(params))
    }
}
