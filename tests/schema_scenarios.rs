//! End-to-end scenarios for the schema subsystem: literal declarations,
//! literal inputs, expected outcomes across all three artifacts.

use mcp_schema::schema::normalize::canonicalize;
use mcp_schema::{
    CompiledSchema, ErrorKind, FieldDecl, Primitive, SchemaBuilder, compile,
};
use serde_json::json;

fn compiled(builder: SchemaBuilder) -> CompiledSchema {
    compile(builder).expect("valid schema")
}

// =============================================================================
// Literal scenarios
// =============================================================================

#[test]
fn numeric_range_accept_and_reject() {
    let schema = compiled(
        SchemaBuilder::new()
            .field(FieldDecl::new("count", Primitive::Integer).min(10).max(100)),
    );

    let params = schema.validate(&json!({"count": 50})).unwrap();
    assert_eq!(params.get("count"), Some(&json!(50)));

    let errors = schema.validate(&json!({"count": 5})).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, ["count"]);
    assert!(matches!(errors[0].kind, ErrorKind::OutOfRange { .. }));
}

#[test]
fn nested_required_missing_reports_full_path() {
    let schema = compiled(
        SchemaBuilder::new().field(
            FieldDecl::object(
                "user",
                SchemaBuilder::new().field(
                    FieldDecl::object(
                        "profile",
                        SchemaBuilder::new().field(
                            FieldDecl::new("email", Primitive::String)
                                .format("email")
                                .required(),
                        ),
                    )
                    .required(),
                ),
            )
            .required(),
        ),
    );

    let errors = schema.validate(&json!({"user": {"profile": {}}})).unwrap_err();
    assert!(errors.iter().any(|e| {
        e.path == ["user", "profile", "email"] && e.kind == ErrorKind::MissingRequired
    }));
}

#[test]
fn enum_via_values_full_lifecycle() {
    let schema = compiled(
        SchemaBuilder::new().field(
            FieldDecl::new("status", Primitive::String)
                .values(["active", "inactive", "pending"])
                .required(),
        ),
    );

    let errors = schema.validate(&json!({"status": "unknown"})).unwrap_err();
    assert_eq!(errors[0].path, ["status"]);
    assert!(matches!(errors[0].kind, ErrorKind::NotInEnum { .. }));

    let errors = schema.validate(&json!({})).unwrap_err();
    assert_eq!(errors[0].kind, ErrorKind::MissingRequired);

    let params = schema.validate(&json!({"status": "active"})).unwrap();
    assert_eq!(params.get("status"), Some(&json!("active")));
}

#[test]
fn string_length_bounds() {
    let schema = compiled(
        SchemaBuilder::new()
            .field(FieldDecl::new("title", Primitive::String).min_length(5).max_length(20)),
    );

    let errors = schema.validate(&json!({"title": "Shrt"})).unwrap_err();
    assert_eq!(errors[0].path, ["title"]);
    assert!(matches!(errors[0].kind, ErrorKind::LengthOutOfRange { .. }));

    assert!(schema.validate(&json!({"title": "A valid title"})).is_ok());
}

#[test]
fn json_schema_emission_scenario() {
    let schema = compiled(
        SchemaBuilder::new()
            .field(
                FieldDecl::new("username", Primitive::String)
                    .required()
                    .description("User's login name")
                    .min_length(3)
                    .max_length(12),
            )
            .field(
                FieldDecl::new("age", Primitive::Integer)
                    .min(0)
                    .description("Age in years"),
            )
            .field(
                FieldDecl::new("email", Primitive::String)
                    .format("email")
                    .required(),
            ),
    );
    let doc = schema.json_schema();

    assert_eq!(
        doc["properties"]["username"],
        json!({
            "type": "string",
            "description": "User's login name",
            "minLength": 3,
            "maxLength": 12,
        })
    );
    assert_eq!(
        doc["properties"]["age"],
        json!({"type": "integer", "minimum": 0, "description": "Age in years"})
    );
    assert_eq!(
        doc["properties"]["email"],
        json!({"type": "string", "format": "email"})
    );

    // Membership compared as a set; order is implementation-defined.
    let required: Vec<&str> = doc["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(required.len(), 2);
    assert!(required.contains(&"username"));
    assert!(required.contains(&"email"));
}

// =============================================================================
// Invariants
// =============================================================================

#[test]
fn normalization_is_idempotent() {
    let schemas = [
        SchemaBuilder::new()
            .field(FieldDecl::new("count", Primitive::Integer).min(10).max(100).required()),
        SchemaBuilder::new()
            .field(FieldDecl::new("status", Primitive::String).values(["a", "b"]))
            .field(FieldDecl::new("note", Primitive::String).min_length(1)),
        SchemaBuilder::new().field(FieldDecl::object(
            "outer",
            SchemaBuilder::new().field(FieldDecl::object(
                "inner",
                SchemaBuilder::new()
                    .field(FieldDecl::new("leaf", Primitive::Float).max(9.5).required()),
            )),
        )),
    ];
    for builder in schemas {
        let normalized = compiled(builder).schema().clone();
        assert_eq!(canonicalize(normalized.clone()), normalized);
    }
}

#[test]
fn both_enum_surfaces_produce_identical_artifacts() {
    let via_values = compiled(
        SchemaBuilder::new()
            .field(FieldDecl::new("status", Primitive::String).values(["on", "off"])),
    );
    let via_enum = compiled(
        SchemaBuilder::new().field(FieldDecl::enumeration("status", ["on", "off"])),
    );

    assert_eq!(via_values.schema(), via_enum.schema());
    assert_eq!(via_values.json_schema(), via_enum.json_schema());
}

#[test]
fn required_array_matches_required_wrappers() {
    let schema = compiled(
        SchemaBuilder::new()
            .field(FieldDecl::new("a", Primitive::String).required())
            .field(FieldDecl::new("b", Primitive::String))
            .field(FieldDecl::new("c", Primitive::Boolean).required()),
    );

    let required: Vec<String> = schema.json_schema()["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect();

    for (name, field) in &schema.schema().fields {
        assert_eq!(required.contains(name), field.is_required(), "field {name}");
    }
}

#[test]
fn unknown_options_appear_nowhere() {
    let schema = compiled(
        SchemaBuilder::new().field(
            FieldDecl::new("x", Primitive::String)
                .option("color", "red")
                .option("weight", 10),
        ),
    );

    let field = schema.schema().field("x").unwrap();
    assert!(field.metadata.is_empty());

    let doc = serde_json::to_string(schema.json_schema()).unwrap();
    assert!(!doc.contains("color"));
    assert!(!doc.contains("weight"));
}

#[test]
fn accepted_output_contains_only_declared_fields() {
    let schema = compiled(
        SchemaBuilder::new()
            .field(FieldDecl::new("a", Primitive::String))
            .field(FieldDecl::new("b", Primitive::Integer)),
    );
    let params = schema
        .validate(&json!({"a": "x", "b": 1, "stray": true, "other": null}))
        .unwrap();
    for key in params.keys() {
        assert!(schema.schema().field(key).is_some(), "undeclared key {key}");
    }
}

#[test]
fn rejected_input_errors_point_at_declared_fields() {
    let schema = compiled(
        SchemaBuilder::new()
            .field(FieldDecl::new("a", Primitive::Integer).required())
            .field(FieldDecl::object(
                "nested",
                SchemaBuilder::new().field(FieldDecl::new("b", Primitive::String).required()),
            )),
    );
    let errors = schema
        .validate(&json!({"nested": {"b": 7}}))
        .unwrap_err();
    assert!(!errors.is_empty());
    for error in &errors {
        // Walk the schema along the error path; every hop must exist.
        let mut fields = &schema.schema().fields;
        for (depth, segment) in error.path.iter().enumerate() {
            let (_, field) = fields
                .iter()
                .find(|(name, _)| name == segment)
                .unwrap_or_else(|| panic!("path segment {segment} not declared"));
            if depth + 1 < error.path.len() {
                match field.expr.unwrap_required().0 {
                    mcp_schema::TypeExpr::Object(inner) => fields = inner,
                    other => panic!("non-object mid-path: {other:?}"),
                }
            }
        }
    }
}

// =============================================================================
// Agreement between validator and emitted document
// =============================================================================

#[test]
fn temporal_primitives_validate_as_strings() {
    let schema = compiled(
        SchemaBuilder::new()
            .field(FieldDecl::new("when", Primitive::DateTime).required())
            .field(FieldDecl::new("day", Primitive::Date)),
    );

    assert!(
        schema
            .validate(&json!({"when": "2025-06-01T12:00:00Z", "day": "2025-06-01"}))
            .is_ok()
    );

    let errors = schema.validate(&json!({"when": 1717243200})).unwrap_err();
    assert_eq!(
        errors[0].kind,
        ErrorKind::TypeMismatch {
            expected: "datetime",
            got: "integer"
        }
    );
}

#[test]
fn any_field_accepts_every_json_value() {
    let schema = compiled(SchemaBuilder::new().field(FieldDecl::new("blob", Primitive::Any)));
    for value in [
        json!(null),
        json!(true),
        json!(1),
        json!(1.5),
        json!("s"),
        json!([1, 2]),
        json!({"k": "v"}),
    ] {
        assert!(schema.validate(&json!({"blob": value})).is_ok());
    }
    assert_eq!(schema.json_schema()["properties"]["blob"], json!({}));
}

#[test]
fn integer_enum_round_trip() {
    let schema = compiled(
        SchemaBuilder::new().field(
            FieldDecl::enumeration("level", [1, 2, 3])
                .value_type(Primitive::Integer)
                .required(),
        ),
    );
    assert_eq!(
        schema.json_schema()["properties"]["level"],
        json!({"type": "integer", "enum": [1, 2, 3]})
    );
    assert!(schema.validate(&json!({"level": 2})).is_ok());
    assert!(schema.validate(&json!({"level": 4})).is_err());
}
