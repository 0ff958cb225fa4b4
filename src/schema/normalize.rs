//! The normalizer: folds raw declarations into the canonical form.
//!
//! Downstream components (emitter, validator) depend only on the output of
//! this module. The two enum surface forms collapse here, bounds merge
//! here, and unknown options disappear here; nothing after this point ever
//! branches on how a schema was declared.

use serde_json::Value;

use super::dsl::{DeclaredType, FieldDecl, RawOpt, RawSchema};
use super::types::{Constraint, Field, MetaKey, Primitive, Schema, TypeExpr};

/// Normalizes a validated raw schema into its canonical form.
///
/// Total by construction: every declaration accepted by
/// [`SchemaBuilder::build`](super::dsl::SchemaBuilder::build) yields a
/// [`Field`].
pub fn normalize(raw: &RawSchema) -> Schema {
    canonicalize(Schema {
        fields: raw.decls.iter().map(normalize_decl).collect(),
    })
}

/// Re-establishes the normal-form invariants on an already-normalized tree.
///
/// Idempotent: `canonicalize(canonicalize(s)) == canonicalize(s)`, and the
/// output of [`normalize`] is a fixed point.
pub fn canonicalize(schema: Schema) -> Schema {
    Schema {
        fields: schema
            .fields
            .into_iter()
            .map(|(name, field)| (name, canonical_field(field)))
            .collect(),
    }
}

fn normalize_decl(decl: &FieldDecl) -> (String, Field) {
    // Step 1: resolve the type expression and its base primitive.
    let values_opt = decl.opts.iter().rev().find_map(|o| match o {
        RawOpt::Values(vs) => Some(vs.clone()),
        _ => None,
    });
    let value_type_opt = decl.opts.iter().rev().find_map(|o| match o {
        RawOpt::ValueType(p) => Some(*p),
        _ => None,
    });

    let (mut expr, base) = if let Some(nested) = &decl.nested {
        let fields = nested.decls.iter().map(normalize_decl).collect();
        (TypeExpr::Object(fields), None)
    } else {
        match (&decl.ty, values_opt) {
            // `values: [...]` sugar: the declared primitive is the base.
            (Some(DeclaredType::Prim(p)), Some(values)) => {
                (TypeExpr::Enum(values), Some(*p))
            }
            (Some(DeclaredType::Prim(p)), None) => (TypeExpr::Prim(*p), Some(*p)),
            // `{enum, values}` surface: the `type:` option is the base.
            (Some(DeclaredType::Enum(values)), _) => (
                TypeExpr::Enum(values.clone()),
                Some(value_type_opt.unwrap_or(Primitive::String)),
            ),
            (None, Some(values)) => (TypeExpr::Enum(values), Some(Primitive::String)),
            (None, None) => (TypeExpr::Prim(Primitive::Any), Some(Primitive::Any)),
        }
    };

    // Step 2: fold bounds into a constraint, honoring applicability:
    // numeric bounds need a numeric base, length bounds a string base.
    // Anything else is silently ignored.
    if let Some(base) = base {
        if base.is_numeric() {
            let min = decl.opts.iter().rev().find_map(|o| match o {
                RawOpt::Min(l) => l.to_number(),
                _ => None,
            });
            let max = decl.opts.iter().rev().find_map(|o| match o {
                RawOpt::Max(l) => l.to_number(),
                _ => None,
            });
            if let Some(c) = match (min, max) {
                (Some(a), Some(b)) => Some(Constraint::Range(a, b)),
                (Some(a), None) => Some(Constraint::Gte(a)),
                (None, Some(b)) => Some(Constraint::Lte(b)),
                (None, None) => None,
            } {
                expr = TypeExpr::Constrained(Box::new(expr), c);
            }
        } else if base.is_textual() {
            let min = decl.opts.iter().rev().find_map(|o| match o {
                RawOpt::MinLength(n) => Some(*n),
                _ => None,
            });
            let max = decl.opts.iter().rev().find_map(|o| match o {
                RawOpt::MaxLength(n) => Some(*n),
                _ => None,
            });
            if let Some(c) = match (min, max) {
                (Some(a), Some(b)) => Some(Constraint::LenRange(a, b)),
                (Some(a), None) => Some(Constraint::MinLen(a)),
                (None, Some(b)) => Some(Constraint::MaxLen(b)),
                (None, None) => None,
            } {
                expr = TypeExpr::Constrained(Box::new(expr), c);
            }
        }
    }

    // Step 3: `required` lifts out of the options into the type expression.
    let required = decl
        .opts
        .iter()
        .rev()
        .find_map(|o| match o {
            RawOpt::Required(r) => Some(*r),
            _ => None,
        })
        .unwrap_or(false);
    if required {
        expr = expr.required();
    }

    // Step 4: retain recognized metadata in author order; consumed and
    // unknown options never make it through.
    let is_enum = matches!(expr.base(), TypeExpr::Enum(_));
    let mut metadata: Vec<(MetaKey, Value)> = Vec::new();
    for opt in &decl.opts {
        match opt {
            RawOpt::Description(s) => {
                metadata.push((MetaKey::Description, Value::String(s.clone())));
            }
            RawOpt::Default(v) => metadata.push((MetaKey::Default, v.clone())),
            RawOpt::Format(s) => metadata.push((MetaKey::Format, Value::String(s.clone()))),
            RawOpt::ValueType(p) if is_enum => {
                metadata.push((MetaKey::Type, Value::String(p.name().to_string())));
            }
            _ => {}
        }
    }
    if is_enum && !metadata.iter().any(|(k, _)| *k == MetaKey::Type) {
        let base = base.unwrap_or(Primitive::String);
        metadata.push((MetaKey::Type, Value::String(base.name().to_string())));
    }

    (decl.name.clone(), Field { expr, metadata })
}

fn canonical_field(field: Field) -> Field {
    let expr = canonical_expr(field.expr);

    // Keep the first occurrence of each metadata key; enums always carry
    // their base primitive.
    let mut metadata: Vec<(MetaKey, Value)> = Vec::new();
    for (key, value) in field.metadata {
        if !metadata.iter().any(|(k, _)| *k == key) {
            metadata.push((key, value));
        }
    }
    if matches!(expr.base(), TypeExpr::Enum(_))
        && !metadata.iter().any(|(k, _)| *k == MetaKey::Type)
    {
        metadata.push((MetaKey::Type, Value::String(Primitive::String.name().into())));
    }

    Field { expr, metadata }
}

fn canonical_expr(expr: TypeExpr) -> TypeExpr {
    match expr {
        TypeExpr::Required(inner) => canonical_expr(*inner).required(),
        TypeExpr::Constrained(inner, c) => match canonical_expr(*inner) {
            // Required stays outermost.
            TypeExpr::Required(t) => {
                canonical_expr(TypeExpr::Constrained(t, c)).required()
            }
            TypeExpr::Constrained(t, c0) => match merge_constraints(&c0, &c) {
                Some(merged) => TypeExpr::Constrained(t, merged),
                None => TypeExpr::Constrained(Box::new(TypeExpr::Constrained(t, c0)), c),
            },
            other => TypeExpr::Constrained(Box::new(other), c),
        },
        TypeExpr::Object(fields) => TypeExpr::Object(
            fields
                .into_iter()
                .map(|(name, field)| (name, canonical_field(field)))
                .collect(),
        ),
        leaf @ (TypeExpr::Prim(_) | TypeExpr::Enum(_)) => leaf,
    }
}

fn merge_constraints(outer: &Constraint, inner: &Constraint) -> Option<Constraint> {
    match (outer, inner) {
        (Constraint::Gte(a), Constraint::Lte(b)) | (Constraint::Lte(b), Constraint::Gte(a)) => {
            Some(Constraint::Range(a.clone(), b.clone()))
        }
        (Constraint::MinLen(a), Constraint::MaxLen(b))
        | (Constraint::MaxLen(b), Constraint::MinLen(a)) => Some(Constraint::LenRange(*a, *b)),
        _ => None,
    }
}
