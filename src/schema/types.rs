//! Normalized schema representation.
//!
//! This is the canonical form every downstream component works against:
//! the emitter and the validator depend only on these types, never on the
//! declaration surface in [`crate::schema::dsl`].

use serde_json::{Number, Value};

/// Primitive type tags supported by the schema DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Integer,
    Float,
    Boolean,
    /// Accepts any JSON value; emits an empty schema fragment.
    Any,
    /// ISO 8601 calendar date, carried as a string on the wire.
    Date,
    /// ISO 8601 time of day, carried as a string on the wire.
    Time,
    /// ISO 8601 date-time with offset, carried as a string on the wire.
    DateTime,
    /// ISO 8601 date-time without offset, carried as a string on the wire.
    NaiveDateTime,
}

impl Primitive {
    /// Returns the tag name used in metadata and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Integer => "integer",
            Primitive::Float => "float",
            Primitive::Boolean => "boolean",
            Primitive::Any => "any",
            Primitive::Date => "date",
            Primitive::Time => "time",
            Primitive::DateTime => "datetime",
            Primitive::NaiveDateTime => "naive_datetime",
        }
    }

    /// Numeric bounds (`min`/`max`) only attach to these.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Primitive::Integer | Primitive::Float)
    }

    /// Length bounds (`min_length`/`max_length`) only attach to these.
    pub fn is_textual(&self) -> bool {
        matches!(self, Primitive::String)
    }

    /// The temporal tags validate as strings and emit a `format` hint.
    pub fn wire_format(&self) -> Option<&'static str> {
        match self {
            Primitive::Date => Some("date"),
            Primitive::Time => Some("time"),
            Primitive::DateTime | Primitive::NaiveDateTime => Some("date-time"),
            _ => None,
        }
    }

    /// Parses a tag name back into a primitive.
    pub fn parse(name: &str) -> Option<Primitive> {
        Some(match name {
            "string" => Primitive::String,
            "integer" => Primitive::Integer,
            "float" => Primitive::Float,
            "boolean" => Primitive::Boolean,
            "any" => Primitive::Any,
            "date" => Primitive::Date,
            "time" => Primitive::Time,
            "datetime" => Primitive::DateTime,
            "naive_datetime" => Primitive::NaiveDateTime,
            _ => return None,
        })
    }
}

/// A numeric or length constraint attached to a type expression.
///
/// Numeric bounds keep their `serde_json::Number` representation so an
/// integer bound round-trips as an integer in the emitted document.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// `value >= n` (closed).
    Gte(Number),
    /// `value <= n` (closed).
    Lte(Number),
    /// `a <= value <= b` (closed on both ends).
    Range(Number, Number),
    /// Code-point length `>= n`.
    MinLen(u64),
    /// Code-point length `<= n`.
    MaxLen(u64),
    /// Code-point length within `[a, b]`.
    LenRange(u64, u64),
}

/// A normalized type expression.
///
/// Invariants maintained by the normalizer:
/// - `Required` appears at most once per field and is always outermost.
/// - Paired bounds are merged (`Gte` + `Lte` never coexist as two
///   `Constrained` layers; they fold into `Range`, likewise `LenRange`).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Prim(Primitive),
    Constrained(Box<TypeExpr>, Constraint),
    /// Closed set of literal values; the base primitive travels in the
    /// field's `MetaKey::Type` metadata.
    Enum(Vec<Value>),
    Required(Box<TypeExpr>),
    Object(Vec<(String, Field)>),
}

impl TypeExpr {
    /// Wraps in `Required` without ever nesting two wrappers.
    pub fn required(self) -> TypeExpr {
        match self {
            TypeExpr::Required(_) => self,
            other => TypeExpr::Required(Box::new(other)),
        }
    }

    /// Peels an optional `Required` wrapper.
    pub fn unwrap_required(&self) -> (&TypeExpr, bool) {
        match self {
            TypeExpr::Required(inner) => (inner, true),
            other => (other, false),
        }
    }

    /// Peels all `Required` and `Constrained` wrappers.
    pub fn base(&self) -> &TypeExpr {
        match self {
            TypeExpr::Required(inner) | TypeExpr::Constrained(inner, _) => inner.base(),
            other => other,
        }
    }

    /// The primitive at the bottom of this expression, if any.
    pub fn base_primitive(&self) -> Option<Primitive> {
        match self.base() {
            TypeExpr::Prim(p) => Some(*p),
            TypeExpr::Enum(_) | TypeExpr::Object(_) => None,
            // base() never returns a wrapper
            TypeExpr::Required(_) | TypeExpr::Constrained(..) => None,
        }
    }
}

/// Recognized metadata keys. Everything else is dropped during
/// normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    Description,
    Default,
    Format,
    /// Base primitive of an `Enum` expression.
    Type,
}

/// A named schema entry: a type expression plus ordered metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub expr: TypeExpr,
    pub metadata: Vec<(MetaKey, Value)>,
}

impl Field {
    pub fn new(expr: TypeExpr) -> Self {
        Self {
            expr,
            metadata: Vec::new(),
        }
    }

    /// First value recorded for `key`, if any.
    pub fn meta(&self, key: MetaKey) -> Option<&Value> {
        self.metadata
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn description(&self) -> Option<&str> {
        self.meta(MetaKey::Description).and_then(Value::as_str)
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.meta(MetaKey::Default)
    }

    pub fn is_required(&self) -> bool {
        matches!(self.expr, TypeExpr::Required(_))
    }

    /// Base primitive of the field: the one at the bottom of the type
    /// expression, or for enums the one carried in `MetaKey::Type`.
    pub fn base_primitive(&self) -> Option<Primitive> {
        match self.expr.base() {
            TypeExpr::Enum(_) => self
                .meta(MetaKey::Type)
                .and_then(Value::as_str)
                .and_then(Primitive::parse),
            other => other.base_primitive(),
        }
    }
}

/// A normalized schema: the implicit root object.
///
/// Field order is author declaration order; the emitter and the derived
/// prompt-argument list both walk it as-is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub fields: Vec<(String, Field)>,
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
