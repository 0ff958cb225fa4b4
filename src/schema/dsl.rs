//! Raw schema capture: the declaration surface of the DSL.
//!
//! Authors describe a tool's input (or output) as an ordered list of field
//! declarations. Nothing is interpreted here beyond build-time conflict
//! checks; the normalizer in [`crate::schema::normalize`] turns the captured
//! declarations into the canonical form.
//!
//! # Example
//!
//! ```rust
//! use mcp_schema::{FieldDecl, Primitive, SchemaBuilder};
//!
//! let raw = SchemaBuilder::new()
//!     .field(
//!         FieldDecl::new("count", Primitive::Integer)
//!             .description("How many items to fetch")
//!             .min(10)
//!             .max(100),
//!     )
//!     .field(
//!         FieldDecl::object(
//!             "user",
//!             SchemaBuilder::new().field(
//!                 FieldDecl::new("email", Primitive::String)
//!                     .format("email")
//!                     .required(),
//!             ),
//!         )
//!         .required(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(raw.len(), 2);
//! ```

use std::collections::HashSet;

use serde_json::{Number, Value};

use super::types::Primitive;
use crate::error::SchemaError;

/// A numeric bound accepted by [`FieldDecl::min`] and [`FieldDecl::max`].
///
/// Integer bounds stay integers all the way into the emitted document;
/// non-finite float bounds are rejected when the schema is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit(LimitRepr);

#[derive(Debug, Clone, Copy, PartialEq)]
enum LimitRepr {
    Int(i64),
    Float(f64),
}

impl Limit {
    pub(crate) fn to_number(self) -> Option<Number> {
        match self.0 {
            LimitRepr::Int(n) => Some(Number::from(n)),
            LimitRepr::Float(f) => Number::from_f64(f),
        }
    }
}

impl From<i64> for Limit {
    fn from(n: i64) -> Self {
        Limit(LimitRepr::Int(n))
    }
}

impl From<i32> for Limit {
    fn from(n: i32) -> Self {
        Limit(LimitRepr::Int(n.into()))
    }
}

impl From<u32> for Limit {
    fn from(n: u32) -> Self {
        Limit(LimitRepr::Int(n.into()))
    }
}

impl From<f64> for Limit {
    fn from(f: f64) -> Self {
        Limit(LimitRepr::Float(f))
    }
}

/// The type named in a leaf declaration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DeclaredType {
    Prim(Primitive),
    /// The `{enum, values}` surface form.
    Enum(Vec<Value>),
}

/// An uninterpreted declaration option, in author order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawOpt {
    Required(bool),
    Description(String),
    Default(Value),
    Format(String),
    Min(Limit),
    Max(Limit),
    MinLength(u64),
    MaxLength(u64),
    /// The `values: [...]` enum sugar.
    Values(Vec<Value>),
    /// Base primitive override, only meaningful for enum declarations.
    ValueType(Primitive),
    /// Anything the DSL does not recognize; dropped by the normalizer.
    Unknown(String, Value),
}

/// A single raw field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub(crate) name: String,
    pub(crate) ty: Option<DeclaredType>,
    pub(crate) nested: Option<SchemaBuilder>,
    pub(crate) opts: Vec<RawOpt>,
}

impl FieldDecl {
    /// Declares a leaf field with a primitive type.
    pub fn new(name: impl Into<String>, ty: Primitive) -> Self {
        Self {
            name: name.into(),
            ty: Some(DeclaredType::Prim(ty)),
            nested: None,
            opts: Vec::new(),
        }
    }

    /// Declares a leaf field with an explicit enum type.
    ///
    /// Equivalent to [`FieldDecl::new`] with the `values` option, except the
    /// base primitive can be overridden with [`FieldDecl::value_type`].
    pub fn enumeration(
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        Self {
            name: name.into(),
            ty: Some(DeclaredType::Enum(
                values.into_iter().map(Into::into).collect(),
            )),
            nested: None,
            opts: Vec::new(),
        }
    }

    /// Declares a nested object field. The object type is implied; giving
    /// an explicit type is a build-time error.
    pub fn object(name: impl Into<String>, fields: SchemaBuilder) -> Self {
        Self {
            name: name.into(),
            ty: None,
            nested: Some(fields),
            opts: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.opts.push(RawOpt::Required(true));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.opts.push(RawOpt::Description(description.into()));
        self
    }

    /// Default value published in the JSON-Schema document. Whether it also
    /// satisfies `required` on absence is a validator setting, see
    /// [`Validator::with_defaults`](crate::schema::validate::Validator::with_defaults).
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.opts.push(RawOpt::Default(value.into()));
        self
    }

    /// JSON-Schema `format` hint, e.g. `"email"` or `"uuid"`.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.opts.push(RawOpt::Format(format.into()));
        self
    }

    /// Inclusive numeric lower bound.
    pub fn min(mut self, n: impl Into<Limit>) -> Self {
        self.opts.push(RawOpt::Min(n.into()));
        self
    }

    /// Inclusive numeric upper bound.
    pub fn max(mut self, n: impl Into<Limit>) -> Self {
        self.opts.push(RawOpt::Max(n.into()));
        self
    }

    /// Minimum string length, measured in code points.
    pub fn min_length(mut self, n: u64) -> Self {
        self.opts.push(RawOpt::MinLength(n));
        self
    }

    /// Maximum string length, measured in code points.
    pub fn max_length(mut self, n: u64) -> Self {
        self.opts.push(RawOpt::MaxLength(n));
        self
    }

    /// Restricts the field to a closed set of values (enum sugar).
    pub fn values(mut self, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.opts
            .push(RawOpt::Values(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Base primitive of an enum declaration (defaults to `string`).
    pub fn value_type(mut self, ty: Primitive) -> Self {
        self.opts.push(RawOpt::ValueType(ty));
        self
    }

    /// Records an unrecognized option. Kept in the raw capture for
    /// diagnostics but never survives normalization.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.opts.push(RawOpt::Unknown(key.into(), value.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Collects an ordered sequence of raw declarations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaBuilder {
    pub(crate) decls: Vec<FieldDecl>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a declaration, preserving author order.
    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.decls.push(decl);
        self
    }

    /// Validates the captured declarations and freezes them.
    ///
    /// Programmer errors (conflicting declarations) surface here, at
    /// component-construction time, never at request time.
    pub fn build(self) -> Result<RawSchema, SchemaError> {
        check_block(&self.decls)?;
        Ok(RawSchema { decls: self.decls })
    }
}

/// A validated, ordered list of raw declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSchema {
    pub(crate) decls: Vec<FieldDecl>,
}

impl RawSchema {
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

fn check_block(decls: &[FieldDecl]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for decl in decls {
        if !seen.insert(decl.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                field: decl.name.clone(),
            });
        }
        check_decl(decl)?;
    }
    Ok(())
}

fn check_decl(decl: &FieldDecl) -> Result<(), SchemaError> {
    let err_field = || decl.name.clone();

    if decl.nested.is_some() && decl.ty.is_some() {
        return Err(SchemaError::NestedWithExplicitType { field: err_field() });
    }

    let has_values_opt = decl
        .opts
        .iter()
        .any(|o| matches!(o, RawOpt::Values(_)));
    if has_values_opt && matches!(decl.ty, Some(DeclaredType::Enum(_))) {
        return Err(SchemaError::ValuesWithEnumType { field: err_field() });
    }

    if let Some(DeclaredType::Enum(values)) = &decl.ty
        && values.is_empty()
    {
        return Err(SchemaError::EmptyEnum { field: err_field() });
    }

    for opt in &decl.opts {
        match opt {
            RawOpt::Values(values) if values.is_empty() => {
                return Err(SchemaError::EmptyEnum { field: err_field() });
            }
            RawOpt::Min(limit) | RawOpt::Max(limit) if limit.to_number().is_none() => {
                return Err(SchemaError::NonFiniteBound { field: err_field() });
            }
            _ => {}
        }
    }

    if let Some(nested) = &decl.nested {
        check_block(&nested.decls)?;
    }
    Ok(())
}
