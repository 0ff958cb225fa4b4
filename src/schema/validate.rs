//! Runtime validation of loose inputs against a compiled schema.
//!
//! The validator is the request-time gate: it takes an untrusted
//! `serde_json::Value`, checks it field by field, and either returns a
//! key-normalized parameter map or the full list of structured errors.
//! Validation is pure: no I/O, no locking, no interior mutability; the
//! same [`Validator`] can be shared freely across request-handler tasks.
//!
//! Errors are values, never panics. Sibling fields are all checked even
//! after one fails, so a caller sees every problem in a single pass;
//! within one field, a type mismatch suppresses the constraint checks
//! that would only produce noise.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use super::types::{Constraint, Field, Primitive, Schema, TypeExpr};

/// The key-normalized output of a successful validation.
pub type Validated = Map<String, Value>;

/// What went wrong with one field, with enough context to render a
/// precise message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    MissingRequired,
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
    OutOfRange {
        #[serde(skip_serializing_if = "Option::is_none")]
        minimum: Option<Number>,
        #[serde(skip_serializing_if = "Option::is_none")]
        maximum: Option<Number>,
        value: Number,
    },
    LengthOutOfRange {
        #[serde(skip_serializing_if = "Option::is_none")]
        min_length: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_length: Option<u64>,
        length: u64,
    },
    NotInEnum {
        allowed: Vec<Value>,
        got: Value,
    },
    ExpectedObject {
        got: &'static str,
    },
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequired => "missing_required",
            ErrorKind::TypeMismatch { .. } => "type_mismatch",
            ErrorKind::OutOfRange { .. } => "out_of_range",
            ErrorKind::LengthOutOfRange { .. } => "length_out_of_range",
            ErrorKind::NotInEnum { .. } => "not_in_enum",
            ErrorKind::ExpectedObject { .. } => "expected_object",
        }
    }
}

/// A single validation failure with the path of the offending field.
///
/// Paths are field names from the root; errors inside nested objects come
/// back prefixed with the outer field names. An empty path refers to the
/// input as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub path: Vec<String>,
    #[serde(flatten)]
    pub kind: ErrorKind,
}

impl ValidationError {
    fn new(path: Vec<String>, kind: ErrorKind) -> Self {
        Self { path, kind }
    }

    /// The path rendered as `outer.inner.leaf`; `input` for the root.
    pub fn dotted_path(&self) -> String {
        if self.path.is_empty() {
            "input".to_string()
        } else {
            self.path.join(".")
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind.name(), self.dotted_path())?;
        match &self.kind {
            ErrorKind::MissingRequired => Ok(()),
            ErrorKind::TypeMismatch { expected, got } => {
                write!(f, ": expected {expected}, got {got}")
            }
            ErrorKind::OutOfRange {
                minimum,
                maximum,
                value,
            } => match (minimum, maximum) {
                (Some(a), Some(b)) => write!(f, ": value {value} not within [{a}, {b}]"),
                (Some(a), None) => write!(f, ": value {value} is less than minimum {a}"),
                (None, Some(b)) => write!(f, ": value {value} is greater than maximum {b}"),
                (None, None) => write!(f, ": value {value} out of range"),
            },
            ErrorKind::LengthOutOfRange {
                min_length,
                max_length,
                length,
            } => match (min_length, max_length) {
                (Some(a), Some(b)) => write!(f, ": length {length} not within [{a}, {b}]"),
                (Some(a), None) => write!(f, ": length {length} is less than minimum {a}"),
                (None, Some(b)) => write!(f, ": length {length} is greater than maximum {b}"),
                (None, None) => write!(f, ": length {length} out of range"),
            },
            ErrorKind::NotInEnum { got, .. } => write!(f, ": {got} is not an allowed value"),
            ErrorKind::ExpectedObject { got } => write!(f, ": got {got}"),
        }
    }
}

/// A compiled, shareable validator for one schema.
///
/// Cheap to clone (the schema is behind an `Arc`); holds no state across
/// calls.
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Arc<Schema>,
    apply_defaults: bool,
}

impl Validator {
    pub(crate) fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            apply_defaults: false,
        }
    }

    /// When enabled, an absent field whose declaration carries `default`
    /// metadata takes that default, which also satisfies `required`.
    /// Disabled by default.
    pub fn with_defaults(mut self, apply: bool) -> Self {
        self.apply_defaults = apply;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates a loose input against the schema.
    ///
    /// On success the returned map contains exactly the declared fields
    /// that were present (or defaulted), with values normalized (integers
    /// widened for `float` fields, nested objects rebuilt with only
    /// declared keys). Unknown input keys are discarded.
    pub fn validate(&self, input: &Value) -> Result<Validated, Vec<ValidationError>> {
        let Some(obj) = input.as_object() else {
            return Err(vec![ValidationError::new(
                Vec::new(),
                ErrorKind::ExpectedObject {
                    got: json_type_name(input),
                },
            )]);
        };

        let mut errors = Vec::new();
        let output = self.validate_fields(&self.schema.fields, obj, &[], &mut errors);
        if errors.is_empty() {
            Ok(output)
        } else {
            tracing::debug!(errors = errors.len(), "input rejected by schema");
            Err(errors)
        }
    }

    fn validate_fields(
        &self,
        fields: &[(String, Field)],
        obj: &Map<String, Value>,
        path: &[String],
        errors: &mut Vec<ValidationError>,
    ) -> Validated {
        let mut output = Map::new();

        for (name, field) in fields {
            let field_path = || {
                let mut p = path.to_vec();
                p.push(name.clone());
                p
            };

            match obj.get(name.as_str()) {
                None => {
                    if self.apply_defaults
                        && let Some(default) = field.default_value()
                    {
                        output.insert(name.clone(), default.clone());
                    } else if field.is_required() {
                        errors.push(ValidationError::new(
                            field_path(),
                            ErrorKind::MissingRequired,
                        ));
                    }
                }
                Some(value) => {
                    if let Some(normalized) =
                        self.validate_expr(&field.expr, value, &field_path(), errors)
                    {
                        output.insert(name.clone(), normalized);
                    }
                }
            }
        }

        output
    }

    fn validate_expr(
        &self,
        expr: &TypeExpr,
        value: &Value,
        path: &[String],
        errors: &mut Vec<ValidationError>,
    ) -> Option<Value> {
        match expr {
            // Presence was handled by the caller; validate the payload.
            TypeExpr::Required(inner) => self.validate_expr(inner, value, path, errors),

            TypeExpr::Prim(p) => match check_primitive(*p, value) {
                Ok(normalized) => Some(normalized),
                Err(kind) => {
                    errors.push(ValidationError::new(path.to_vec(), kind));
                    None
                }
            },

            TypeExpr::Enum(allowed) => {
                if allowed.contains(value) {
                    Some(value.clone())
                } else {
                    errors.push(ValidationError::new(
                        path.to_vec(),
                        ErrorKind::NotInEnum {
                            allowed: allowed.clone(),
                            got: value.clone(),
                        },
                    ));
                    None
                }
            }

            TypeExpr::Constrained(inner, constraint) => {
                // A failed inner check (e.g. type mismatch) suppresses the
                // constraint check for this field.
                let normalized = self.validate_expr(inner, value, path, errors)?;
                match check_constraint(constraint, &normalized) {
                    None => Some(normalized),
                    Some(kind) => {
                        errors.push(ValidationError::new(path.to_vec(), kind));
                        None
                    }
                }
            }

            TypeExpr::Object(fields) => match value.as_object() {
                None => {
                    errors.push(ValidationError::new(
                        path.to_vec(),
                        ErrorKind::ExpectedObject {
                            got: json_type_name(value),
                        },
                    ));
                    None
                }
                Some(obj) => {
                    let before = errors.len();
                    let output = self.validate_fields(fields, obj, path, errors);
                    (errors.len() == before).then_some(Value::Object(output))
                }
            },
        }
    }
}

fn check_primitive(p: Primitive, value: &Value) -> Result<Value, ErrorKind> {
    let mismatch = || ErrorKind::TypeMismatch {
        expected: p.name(),
        got: json_type_name(value),
    };

    match p {
        Primitive::Integer => {
            if value.is_i64() || value.is_u64() {
                Ok(value.clone())
            } else {
                Err(mismatch())
            }
        }
        Primitive::Float => match value {
            // Integers widen; everything non-numeric is a mismatch.
            Value::Number(n) => Ok(n
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| value.clone())),
            _ => Err(mismatch()),
        },
        Primitive::Boolean => {
            if value.is_boolean() {
                Ok(value.clone())
            } else {
                Err(mismatch())
            }
        }
        Primitive::Any => Ok(value.clone()),
        // Strings, including the temporal tags which travel as strings.
        Primitive::String
        | Primitive::Date
        | Primitive::Time
        | Primitive::DateTime
        | Primitive::NaiveDateTime => {
            if value.is_string() {
                Ok(value.clone())
            } else {
                Err(mismatch())
            }
        }
    }
}

fn check_constraint(constraint: &Constraint, value: &Value) -> Option<ErrorKind> {
    match constraint {
        Constraint::Gte(min) => check_bounds(Some(min), None, value),
        Constraint::Lte(max) => check_bounds(None, Some(max), value),
        Constraint::Range(min, max) => check_bounds(Some(min), Some(max), value),
        Constraint::MinLen(min) => check_length(Some(*min), None, value),
        Constraint::MaxLen(max) => check_length(None, Some(*max), value),
        Constraint::LenRange(min, max) => check_length(Some(*min), Some(*max), value),
    }
}

fn check_bounds(min: Option<&Number>, max: Option<&Number>, value: &Value) -> Option<ErrorKind> {
    let (n, x) = match value {
        Value::Number(n) => (n, n.as_f64()?),
        _ => return None,
    };
    let below = min.and_then(Number::as_f64).is_some_and(|a| x < a);
    let above = max.and_then(Number::as_f64).is_some_and(|b| x > b);
    (below || above).then(|| ErrorKind::OutOfRange {
        minimum: min.cloned(),
        maximum: max.cloned(),
        value: n.clone(),
    })
}

fn check_length(min: Option<u64>, max: Option<u64>, value: &Value) -> Option<ErrorKind> {
    let s = value.as_str()?;
    // Code points, not bytes.
    let length = s.chars().count() as u64;
    let below = min.is_some_and(|a| length < a);
    let above = max.is_some_and(|b| length > b);
    (below || above).then_some(ErrorKind::LengthOutOfRange {
        min_length: min,
        max_length: max,
        length,
    })
}

/// JSON type name for error messages, distinguishing integers from floats.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
