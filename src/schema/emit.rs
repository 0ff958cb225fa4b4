//! JSON-Schema emitter.
//!
//! Walks a normalized schema depth-first and produces the draft-07-shaped
//! document published to clients in `tools/list`. No `$schema` or `$id` is
//! emitted, and objects deliberately omit `additionalProperties` (inputs
//! are open; deployments can tighten this downstream).

use serde_json::{Map, Value, json};

use super::types::{Constraint, Field, MetaKey, Primitive, Schema, TypeExpr};

/// Emits the JSON-Schema document for a normalized schema.
///
/// Top-level shape: `{"type":"object","properties":{...},"required":[...]}`
/// with `required` omitted when empty.
pub fn json_schema(schema: &Schema) -> Value {
    emit_object(&schema.fields)
}

fn emit_object(fields: &[(String, Field)]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for (name, field) in fields {
        if field.is_required() {
            required.push(Value::String(name.clone()));
        }
        properties.insert(name.clone(), emit_field(field));
    }

    let mut doc = Map::new();
    doc.insert("type".into(), json!("object"));
    doc.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        doc.insert("required".into(), Value::Array(required));
    }
    Value::Object(doc)
}

fn emit_field(field: &Field) -> Value {
    // Required-ness is recorded on the parent object, not the fragment.
    let (expr, _) = field.expr.unwrap_required();
    let mut fragment = emit_expr(expr, field);

    if let Value::Object(obj) = &mut fragment {
        for (key, value) in &field.metadata {
            match key {
                MetaKey::Description => {
                    obj.insert("description".into(), value.clone());
                }
                MetaKey::Default => {
                    obj.insert("default".into(), value.clone());
                }
                MetaKey::Format => {
                    obj.insert("format".into(), value.clone());
                }
                // Consumed by enum emission; not a JSON-Schema keyword.
                MetaKey::Type => {}
            }
        }
    }
    fragment
}

fn emit_expr(expr: &TypeExpr, field: &Field) -> Value {
    match expr {
        TypeExpr::Prim(p) => emit_primitive(*p),
        TypeExpr::Enum(values) => {
            let base = field.base_primitive().unwrap_or(Primitive::String);
            let mut fragment = emit_primitive(base);
            if let Value::Object(obj) = &mut fragment {
                obj.insert("enum".into(), Value::Array(values.clone()));
            }
            fragment
        }
        TypeExpr::Constrained(inner, constraint) => {
            let mut fragment = emit_expr(inner, field);
            if let Value::Object(obj) = &mut fragment {
                match constraint {
                    Constraint::Gte(n) => {
                        obj.insert("minimum".into(), Value::Number(n.clone()));
                    }
                    Constraint::Lte(n) => {
                        obj.insert("maximum".into(), Value::Number(n.clone()));
                    }
                    Constraint::Range(a, b) => {
                        obj.insert("minimum".into(), Value::Number(a.clone()));
                        obj.insert("maximum".into(), Value::Number(b.clone()));
                    }
                    Constraint::MinLen(n) => {
                        obj.insert("minLength".into(), json!(n));
                    }
                    Constraint::MaxLen(n) => {
                        obj.insert("maxLength".into(), json!(n));
                    }
                    Constraint::LenRange(a, b) => {
                        obj.insert("minLength".into(), json!(a));
                        obj.insert("maxLength".into(), json!(b));
                    }
                }
            }
            fragment
        }
        TypeExpr::Required(inner) => emit_expr(inner, field),
        TypeExpr::Object(fields) => emit_object(fields),
    }
}

fn emit_primitive(p: Primitive) -> Value {
    match p {
        Primitive::String => json!({"type": "string"}),
        Primitive::Integer => json!({"type": "integer"}),
        Primitive::Float => json!({"type": "number"}),
        Primitive::Boolean => json!({"type": "boolean"}),
        // `any` places no constraint at all.
        Primitive::Any => json!({}),
        Primitive::Date | Primitive::Time | Primitive::DateTime | Primitive::NaiveDateTime => {
            // Temporal tags are strings on the wire with a format hint;
            // wire_format is total for these variants.
            match p.wire_format() {
                Some(format) => json!({"type": "string", "format": format}),
                None => json!({"type": "string"}),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::dsl::{FieldDecl, SchemaBuilder};
    use crate::schema::normalize::normalize;

    fn emitted(builder: SchemaBuilder) -> Value {
        json_schema(&normalize(&builder.build().unwrap()))
    }

    #[test]
    fn test_empty_schema() {
        assert_eq!(
            emitted(SchemaBuilder::new()),
            json!({"type": "object", "properties": {}})
        );
    }

    #[test]
    fn test_primitive_mapping() {
        let doc = emitted(
            SchemaBuilder::new()
                .field(FieldDecl::new("s", Primitive::String))
                .field(FieldDecl::new("i", Primitive::Integer))
                .field(FieldDecl::new("f", Primitive::Float))
                .field(FieldDecl::new("b", Primitive::Boolean))
                .field(FieldDecl::new("a", Primitive::Any)),
        );
        assert_eq!(doc["properties"]["s"], json!({"type": "string"}));
        assert_eq!(doc["properties"]["i"], json!({"type": "integer"}));
        assert_eq!(doc["properties"]["f"], json!({"type": "number"}));
        assert_eq!(doc["properties"]["b"], json!({"type": "boolean"}));
        assert_eq!(doc["properties"]["a"], json!({}));
    }

    #[test]
    fn test_temporal_primitives_emit_format() {
        let doc = emitted(
            SchemaBuilder::new()
                .field(FieldDecl::new("d", Primitive::Date))
                .field(FieldDecl::new("t", Primitive::Time))
                .field(FieldDecl::new("dt", Primitive::DateTime))
                .field(FieldDecl::new("ndt", Primitive::NaiveDateTime)),
        );
        assert_eq!(doc["properties"]["d"], json!({"type": "string", "format": "date"}));
        assert_eq!(doc["properties"]["t"], json!({"type": "string", "format": "time"}));
        assert_eq!(
            doc["properties"]["dt"],
            json!({"type": "string", "format": "date-time"})
        );
        assert_eq!(
            doc["properties"]["ndt"],
            json!({"type": "string", "format": "date-time"})
        );
    }

    #[test]
    fn test_numeric_bounds() {
        let doc = emitted(
            SchemaBuilder::new()
                .field(FieldDecl::new("count", Primitive::Integer).min(10).max(100))
                .field(FieldDecl::new("low", Primitive::Integer).min(0))
                .field(FieldDecl::new("high", Primitive::Float).max(1.5)),
        );
        assert_eq!(
            doc["properties"]["count"],
            json!({"type": "integer", "minimum": 10, "maximum": 100})
        );
        assert_eq!(doc["properties"]["low"], json!({"type": "integer", "minimum": 0}));
        assert_eq!(doc["properties"]["high"], json!({"type": "number", "maximum": 1.5}));
    }

    #[test]
    fn test_string_lengths() {
        let doc = emitted(
            SchemaBuilder::new()
                .field(FieldDecl::new("title", Primitive::String).min_length(5).max_length(20)),
        );
        assert_eq!(
            doc["properties"]["title"],
            json!({"type": "string", "minLength": 5, "maxLength": 20})
        );
    }

    #[test]
    fn test_enum_carries_base_type() {
        let doc = emitted(
            SchemaBuilder::new()
                .field(FieldDecl::new("status", Primitive::String).values(["on", "off"]))
                .field(FieldDecl::enumeration("level", [1, 2]).value_type(Primitive::Integer)),
        );
        assert_eq!(
            doc["properties"]["status"],
            json!({"type": "string", "enum": ["on", "off"]})
        );
        assert_eq!(
            doc["properties"]["level"],
            json!({"type": "integer", "enum": [1, 2]})
        );
    }

    #[test]
    fn test_required_array_membership() {
        let doc = emitted(
            SchemaBuilder::new()
                .field(FieldDecl::new("a", Primitive::String).required())
                .field(FieldDecl::new("b", Primitive::String))
                .field(FieldDecl::new("c", Primitive::String).required()),
        );
        assert_eq!(doc["required"], json!(["a", "c"]));
    }

    #[test]
    fn test_required_omitted_when_empty() {
        let doc = emitted(SchemaBuilder::new().field(FieldDecl::new("a", Primitive::String)));
        assert!(doc.get("required").is_none());
    }

    #[test]
    fn test_metadata_projection() {
        let doc = emitted(
            SchemaBuilder::new().field(
                FieldDecl::new("email", Primitive::String)
                    .description("Contact address")
                    .format("email")
                    .default_value("nobody@example.com"),
            ),
        );
        assert_eq!(
            doc["properties"]["email"],
            json!({
                "type": "string",
                "description": "Contact address",
                "format": "email",
                "default": "nobody@example.com",
            })
        );
    }

    #[test]
    fn test_nested_object_emission() {
        let doc = emitted(
            SchemaBuilder::new().field(
                FieldDecl::object(
                    "user",
                    SchemaBuilder::new()
                        .field(FieldDecl::new("email", Primitive::String).required())
                        .field(FieldDecl::new("age", Primitive::Integer).min(0)),
                )
                .required(),
            ),
        );
        assert_eq!(
            doc["properties"]["user"],
            json!({
                "type": "object",
                "properties": {
                    "email": {"type": "string"},
                    "age": {"type": "integer", "minimum": 0},
                },
                "required": ["email"],
            })
        );
        assert_eq!(doc["required"], json!(["user"]));
    }

    #[test]
    fn test_explicit_format_overrides_temporal_hint() {
        let doc = emitted(
            SchemaBuilder::new()
                .field(FieldDecl::new("when", Primitive::Date).format("iso8601-week")),
        );
        assert_eq!(doc["properties"]["when"]["format"], json!("iso8601-week"));
    }
}
