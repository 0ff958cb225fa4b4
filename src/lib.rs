//! # mcp-schema
//!
//! Declarative input/output schemas for Model Context Protocol (MCP)
//! servers: declare the shape of a tool's arguments once and get three
//! agreeing artifacts:
//!
//! 1. a **normalized internal schema** for fast runtime checks,
//! 2. a **JSON-Schema document** (draft-07-shaped) published to clients,
//! 3. a **validator** that turns loose request arguments into a
//!    key-normalized parameter map — or a list of structured,
//!    path-qualified errors.
//!
//! The emitter and the validator are both derived from the normalized
//! form, never from the declaration surface, so the artifacts cannot
//! drift apart.
//!
//! ## Example
//!
//! ```rust
//! use mcp_schema::{
//!     CallToolResult, FieldDecl, McpRouter, Primitive, SchemaBuilder, ToolBuilder,
//! };
//!
//! let search = ToolBuilder::new("search")
//!     .description("Search the index")
//!     .input(
//!         SchemaBuilder::new()
//!             .field(FieldDecl::new("query", Primitive::String).required())
//!             .field(
//!                 FieldDecl::new("limit", Primitive::Integer)
//!                     .description("Maximum number of hits")
//!                     .min(1)
//!                     .max(100),
//!             ),
//!     )
//!     .handler(|params| async move {
//!         let query = params["query"].as_str().unwrap_or_default().to_string();
//!         Ok(CallToolResult::text(format!("results for {query}")))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let router = McpRouter::new()
//!     .server_info("search-server", "1.0.0")
//!     .tool(search);
//! # let _ = router;
//! ```
//!
//! Invalid arguments never reach a handler: the router replies with
//! JSON-RPC `-32602 InvalidParams`, the message listing every failing
//! field and the `data` member carrying the structured error records.

pub mod error;
pub mod prompt;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod schema;
pub mod tool;

// Re-exports
pub use error::{Error, ErrorCode, JsonRpcError, Result, SchemaError};
pub use prompt::{Prompt, PromptBuilder};
pub use protocol::{
    CallToolResult, Content, GetPromptResult, JsonRpcRequest, JsonRpcResponse, PromptMessage,
    PromptRole, ToolAnnotations, ToolDefinition,
};
pub use registry::ComponentRegistry;
pub use router::McpRouter;
pub use schema::dsl::{FieldDecl, Limit, SchemaBuilder};
pub use schema::types::{Constraint, Field, MetaKey, Primitive, Schema, TypeExpr};
pub use schema::validate::{ErrorKind, Validated, ValidationError, Validator};
pub use schema::{CompiledSchema, compile};
pub use tool::{Tool, ToolBuilder, ToolHandler};
