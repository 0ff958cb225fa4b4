//! Prompt definition and builder API
//!
//! Prompts reuse the same schema machinery as tools: the argument list
//! published by `prompts/list` is derived from the compiled input schema's
//! top-level fields, and `prompts/get` arguments pass through the same
//! validator before the handler renders messages. One declaration, no
//! drift between listing and validation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::protocol::{GetPromptResult, PromptArgument, PromptDefinition};
use crate::schema::dsl::SchemaBuilder;
use crate::schema::validate::Validated;
use crate::schema::{self, CompiledSchema};

/// A boxed future for prompt handlers
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Prompt handler trait
pub trait PromptHandler: Send + Sync {
    /// Render the prompt from validated arguments.
    fn call(&self, args: Validated) -> BoxFuture<'_, Result<GetPromptResult>>;
}

/// A prompt template with compiled argument schema and handler.
pub struct Prompt {
    pub name: String,
    pub description: Option<String>,
    arguments: CompiledSchema,
    handler: Arc<dyn PromptHandler>,
}

impl Prompt {
    pub fn builder(name: impl Into<String>) -> PromptBuilder {
        PromptBuilder::new(name)
    }

    /// Get the prompt definition for prompts/list.
    ///
    /// The argument entries mirror the schema's top-level fields in
    /// declaration order.
    pub fn definition(&self) -> PromptDefinition {
        let arguments = self
            .arguments
            .schema()
            .fields
            .iter()
            .map(|(name, field)| PromptArgument {
                name: name.clone(),
                description: field.description().map(str::to_string),
                required: field.is_required(),
            })
            .collect();
        PromptDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            arguments,
        }
    }

    /// The compiled argument schema.
    pub fn argument_schema(&self) -> &CompiledSchema {
        &self.arguments
    }

    /// Validates arguments and renders the prompt.
    pub fn get(&self, arguments: &Value) -> BoxFuture<'_, Result<GetPromptResult>> {
        let args = if arguments.is_null() {
            self.arguments.validate(&Value::Object(serde_json::Map::new()))
        } else {
            self.arguments.validate(arguments)
        };
        match args {
            Ok(args) => {
                tracing::debug!(prompt = %self.name, "arguments accepted");
                self.handler.call(args)
            }
            Err(errors) => {
                tracing::warn!(prompt = %self.name, errors = errors.len(), "arguments rejected");
                Box::pin(async move { Err(errors.into()) })
            }
        }
    }
}

/// Builder for creating prompts with a fluent API
pub struct PromptBuilder {
    name: String,
    description: Option<String>,
    arguments: Option<SchemaBuilder>,
}

impl PromptBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare the prompt's arguments.
    pub fn arguments(mut self, schema: SchemaBuilder) -> Self {
        self.arguments = Some(schema);
        self
    }

    /// Specify the handler, which receives validated arguments.
    pub fn handler<F, Fut>(self, handler: F) -> PromptBuilderWithHandler<F>
    where
        F: Fn(Validated) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GetPromptResult>> + Send + 'static,
    {
        PromptBuilderWithHandler {
            inner: self,
            handler,
        }
    }
}

/// Builder state after handler is specified
pub struct PromptBuilderWithHandler<F> {
    inner: PromptBuilder,
    handler: F,
}

impl<F, Fut> PromptBuilderWithHandler<F>
where
    F: Fn(Validated) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<GetPromptResult>> + Send + 'static,
{
    /// Compile the argument schema and build the prompt.
    pub fn build(self) -> std::result::Result<Prompt, SchemaError> {
        let arguments = match self.inner.arguments {
            Some(builder) => schema::compile(builder)?,
            None => schema::empty(),
        };
        Ok(Prompt {
            name: self.inner.name,
            description: self.inner.description,
            arguments,
            handler: Arc::new(FnHandler {
                handler: self.handler,
            }),
        })
    }
}

struct FnHandler<F> {
    handler: F,
}

impl<F, Fut> PromptHandler for FnHandler<F>
where
    F: Fn(Validated) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<GetPromptResult>> + Send + 'static,
{
    fn call(&self, args: Validated) -> BoxFuture<'_, Result<GetPromptResult>> {
        Box::pin((self.handler)(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::protocol::PromptMessage;
    use crate::schema::dsl::FieldDecl;
    use crate::schema::types::Primitive;
    use serde_json::json;

    fn summarize_prompt() -> Prompt {
        PromptBuilder::new("summarize")
            .description("Summarize a text")
            .arguments(
                SchemaBuilder::new()
                    .field(
                        FieldDecl::new("text", Primitive::String)
                            .description("The text to summarize")
                            .required(),
                    )
                    .field(FieldDecl::new("max_words", Primitive::Integer).min(1)),
            )
            .handler(|args| async move {
                let text = args["text"].as_str().unwrap_or_default().to_string();
                Ok(GetPromptResult {
                    description: None,
                    messages: vec![PromptMessage::user(format!("Summarize: {text}"))],
                })
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_arguments_derived_from_schema() {
        let def = summarize_prompt().definition();
        assert_eq!(
            def.arguments,
            vec![
                PromptArgument {
                    name: "text".into(),
                    description: Some("The text to summarize".into()),
                    required: true,
                },
                PromptArgument {
                    name: "max_words".into(),
                    description: None,
                    required: false,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_get_with_valid_arguments() {
        let prompt = summarize_prompt();
        let result = prompt.get(&json!({"text": "hello world"})).await.unwrap();
        assert_eq!(result.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_get_rejects_missing_argument() {
        let prompt = summarize_prompt();
        let err = prompt.get(&json!({})).await.unwrap_err();
        let Error::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].path, ["text"]);
    }

    #[tokio::test]
    async fn test_prompt_without_arguments() {
        let prompt = PromptBuilder::new("banner")
            .handler(|_| async {
                Ok(GetPromptResult {
                    description: None,
                    messages: vec![PromptMessage::user("Hello!")],
                })
            })
            .build()
            .unwrap();
        assert!(prompt.definition().arguments.is_empty());
        assert!(prompt.get(&Value::Null).await.is_ok());
    }
}
