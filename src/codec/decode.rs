//! Decoder: transforms an untyped JSON value into a [`TypedObject`], guided
//! by the target type's descriptor, recursively. Decoding is all-or-nothing:
//! any failure aborts the whole call with the deepest failing path.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::Value as JsonValue;

use crate::codec::error::DecodeError;
use crate::codec::spec::{ModelSpec, Registry, Shape};
use crate::codec::value::{TypedObject, Value};

#[derive(Debug)]
pub(crate) enum Segment {
    Field(&'static str),
    Index(usize),
    Key(String),
}

/// Path of the value currently being decoded, rendered like
/// `$.message.to[0].email` in errors.
#[derive(Debug, Default)]
pub(crate) struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    /// Current depth, for restoring the path after a failed union attempt.
    pub(crate) fn depth(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn truncate(&mut self, depth: usize) {
        self.segments.truncate(depth);
    }

    pub(crate) fn render(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => {
                    out.push('.');
                    out.push_str(name);
                }
                Segment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
                Segment::Key(key) => {
                    let _ = write!(out, "[\"{key}\"]");
                }
            }
        }
        out
    }
}

/// JSON kind name used in mismatch diagnostics.
pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Recursive, registry-backed decoder. Stateless between calls; safe to
/// share across threads.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r Registry,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Decode `value` into an instance of the registered type `type_name`.
    pub fn decode(&self, type_name: &str, value: &JsonValue) -> Result<TypedObject, DecodeError> {
        let spec = self.registry.describe(type_name)?;
        let mut path = Path::root();
        self.decode_model(spec, value, &mut path)
    }

    pub(crate) fn decode_model(
        &self,
        spec: &'static ModelSpec,
        value: &JsonValue,
        path: &mut Path,
    ) -> Result<TypedObject, DecodeError> {
        let JsonValue::Object(map) = value else {
            return Err(DecodeError::ShapeMismatch {
                path: path.render(),
                expected: format!("object (model {})", spec.type_name),
                found: json_kind(value),
            });
        };

        // Required presence is checked up front, before any value is
        // decoded, so a value error in one field cannot mask another
        // field's absence. Union resolution relies on this: variant failure
        // reasons must name missing fields regardless of field order.
        for field in spec.fields() {
            if field.required && !map.contains_key(field.wire_name) {
                return Err(DecodeError::MissingRequiredField {
                    path: path.render(),
                    field: field.wire_name,
                });
            }
        }

        // Unknown wire keys are ignored for forward compatibility; field
        // processing order cannot affect the result because fields are
        // independent.
        let mut fields = BTreeMap::new();
        for field in spec.fields() {
            match map.get(field.wire_name) {
                None => {}
                Some(JsonValue::Null) => {
                    if !field.nullable {
                        path.push(Segment::Field(field.wire_name));
                        return Err(DecodeError::UnexpectedNull {
                            path: path.render(),
                        });
                    }
                    fields.insert(field.local_name, Value::Null);
                }
                Some(present) => {
                    path.push(Segment::Field(field.wire_name));
                    let decoded = self.decode_shape(&field.shape, present, path)?;
                    path.pop();
                    fields.insert(field.local_name, decoded);
                }
            }
        }
        Ok(TypedObject::from_parts(spec, fields))
    }

    pub(crate) fn decode_shape(
        &self,
        shape: &Shape,
        value: &JsonValue,
        path: &mut Path,
    ) -> Result<Value, DecodeError> {
        match shape {
            Shape::Bool => match value {
                JsonValue::Bool(b) => Ok(Value::Bool(*b)),
                other => Err(self.mismatch(shape, other, path)),
            },
            Shape::Int => match value {
                // Fractional numbers do not silently truncate.
                JsonValue::Number(n) => n
                    .as_i64()
                    .map(Value::Int)
                    .ok_or_else(|| self.mismatch(shape, value, path)),
                other => Err(self.mismatch(shape, other, path)),
            },
            Shape::Float => match value {
                JsonValue::Number(n) => n
                    .as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| self.mismatch(shape, value, path)),
                other => Err(self.mismatch(shape, other, path)),
            },
            Shape::String => match value {
                JsonValue::String(s) => Ok(Value::String(s.clone())),
                other => Err(self.mismatch(shape, other, path)),
            },
            Shape::Enum(values) => match value {
                JsonValue::String(s) => match values.iter().find(|candidate| *candidate == s) {
                    Some(canonical) => Ok(Value::Enum(canonical)),
                    None => Err(DecodeError::UnknownEnumValue {
                        path: path.render(),
                        value: s.clone(),
                        expected: values.join(", "),
                    }),
                },
                other => Err(self.mismatch(shape, other, path)),
            },
            Shape::Model(spec) => self.decode_model(spec, value, path).map(Value::Object),
            Shape::List(inner) => match value {
                JsonValue::Array(items) => {
                    // Order is preserved; an empty array is an empty list,
                    // not an absent field.
                    let mut decoded = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        path.push(Segment::Index(index));
                        decoded.push(self.decode_shape(inner, item, path)?);
                        path.pop();
                    }
                    Ok(Value::List(decoded))
                }
                other => Err(self.mismatch(shape, other, path)),
            },
            Shape::Map(inner) => match value {
                JsonValue::Object(entries) => {
                    let mut decoded = BTreeMap::new();
                    for (key, item) in entries {
                        path.push(Segment::Key(key.clone()));
                        decoded.insert(key.clone(), self.decode_shape(inner, item, path)?);
                        path.pop();
                    }
                    Ok(Value::Map(decoded))
                }
                other => Err(self.mismatch(shape, other, path)),
            },
            Shape::Union(union) => self
                .decode_union(union, value, path)
                .map(|(_, decoded)| decoded),
            Shape::Json => Ok(Value::Json(value.clone())),
        }
    }

    fn mismatch(&self, shape: &Shape, value: &JsonValue, path: &Path) -> DecodeError {
        DecodeError::ShapeMismatch {
            path: path.render(),
            expected: shape.describe(),
            found: json_kind(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::codec::spec::FieldSpec;

    static PAGING: ModelSpec = ModelSpec {
        type_name: "Paging",
        field_groups: &[&[
            FieldSpec::required("more", Shape::Bool),
            FieldSpec::optional("cursor", Shape::String).nullable(),
        ]],
    };

    static RENAMED: ModelSpec = ModelSpec {
        type_name: "SendMessageResponse",
        field_groups: &[&[FieldSpec::required("request_id", Shape::String).wire("requestId")]],
    };

    static STATUSES: [&str; 2] = ["ENQUEUED", "SENT"];

    static DETAILS: ModelSpec = ModelSpec {
        type_name: "Details",
        field_groups: &[&[
            FieldSpec::required("id", Shape::String),
            FieldSpec::required("status", Shape::Enum(&STATUSES)),
            FieldSpec::optional("counts", Shape::List(&Shape::Int)),
            FieldSpec::optional("scores", Shape::Map(&Shape::Float)),
            FieldSpec::optional("paging", Shape::Model(&PAGING)),
            FieldSpec::optional("payload", Shape::Json),
            FieldSpec::optional("error", Shape::String).nullable(),
        ]],
    };

    fn registry() -> Registry {
        Registry::new(&[&PAGING, &RENAMED, &DETAILS])
    }

    #[test]
    fn decodes_required_and_leaves_optional_unset() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let object = decoder.decode("Paging", &json!({"more": true})).unwrap();
        assert!(object.expect_bool("more"));
        assert!(!object.has_field("cursor"));
    }

    #[test]
    fn decodes_both_fields_when_present() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let object = decoder
            .decode("Paging", &json!({"more": false, "cursor": "abc123"}))
            .unwrap();
        assert!(!object.expect_bool("more"));
        assert_eq!(object.str_field("cursor"), Some("abc123"));
    }

    #[test]
    fn missing_required_field_names_the_field() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let err = decoder.decode("Paging", &json!({})).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingRequiredField { field: "more", .. }
        ));
    }

    #[test]
    fn missing_required_field_is_not_masked_by_an_earlier_value_error() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        // `id` has the wrong kind and `status` is absent; absence must win.
        let err = decoder.decode("Details", &json!({"id": 7})).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingRequiredField {
                field: "status",
                ..
            }
        ));
    }

    #[test]
    fn null_vs_absent_are_distinguishable() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let with_null = decoder
            .decode("Paging", &json!({"more": true, "cursor": null}))
            .unwrap();
        assert!(with_null.has_field("cursor"));
        assert_eq!(with_null.field("cursor"), Some(&Value::Null));

        let without = decoder.decode("Paging", &json!({"more": true})).unwrap();
        assert!(!without.has_field("cursor"));
    }

    #[test]
    fn null_for_non_nullable_field_fails_with_path() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let err = decoder.decode("Paging", &json!({"more": null})).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedNull { ref path } if path == "$.more"
        ));
    }

    #[test]
    fn wire_renames_are_honored() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let object = decoder
            .decode("SendMessageResponse", &json!({"requestId": "req-1"}))
            .unwrap();
        assert_eq!(object.expect_str("request_id"), "req-1");

        // The local name is not accepted on the wire.
        let err = decoder
            .decode("SendMessageResponse", &json!({"request_id": "req-1"}))
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingRequiredField {
                field: "requestId",
                ..
            }
        ));
    }

    #[test]
    fn closed_enums_reject_unknown_values() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let object = decoder
            .decode("Details", &json!({"id": "1", "status": "SENT"}))
            .unwrap();
        assert_eq!(object.str_field("status"), Some("SENT"));

        let err = decoder
            .decode("Details", &json!({"id": "1", "status": "LOST"}))
            .unwrap_err();
        match err {
            DecodeError::UnknownEnumValue { path, value, expected } => {
                assert_eq!(path, "$.status");
                assert_eq!(value, "LOST");
                assert_eq!(expected, "ENQUEUED, SENT");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lists_preserve_order_and_empty_is_present() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let object = decoder
            .decode(
                "Details",
                &json!({"id": "1", "status": "SENT", "counts": [3, 1, 2]}),
            )
            .unwrap();
        assert_eq!(
            object.list_field("counts"),
            Some(&[Value::Int(3), Value::Int(1), Value::Int(2)][..])
        );

        let object = decoder
            .decode("Details", &json!({"id": "1", "status": "SENT", "counts": []}))
            .unwrap();
        assert!(object.has_field("counts"));
        assert_eq!(object.list_field("counts"), Some(&[][..]));
    }

    #[test]
    fn nested_failures_carry_the_deepest_path() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let err = decoder
            .decode(
                "Details",
                &json!({"id": "1", "status": "SENT", "counts": [1, "two"]}),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ShapeMismatch { ref path, .. } if path == "$.counts[1]"
        ));

        let err = decoder
            .decode(
                "Details",
                &json!({"id": "1", "status": "SENT", "paging": {"cursor": "x"}}),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingRequiredField { ref path, field: "more" } if path == "$.paging"
        ));
    }

    #[test]
    fn maps_decode_values_and_keep_keys() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let object = decoder
            .decode(
                "Details",
                &json!({"id": "1", "status": "SENT", "scores": {"a": 1.5, "b": 2}}),
            )
            .unwrap();
        match object.field("scores") {
            Some(Value::Map(map)) => {
                assert_eq!(map.get("a"), Some(&Value::Float(1.5)));
                assert_eq!(map.get("b"), Some(&Value::Float(2.0)));
            }
            other => panic!("unexpected value: {other:?}"),
        }

        let err = decoder
            .decode(
                "Details",
                &json!({"id": "1", "status": "SENT", "scores": {"a": "high"}}),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ShapeMismatch { ref path, .. } if path == "$.scores[\"a\"]"
        ));
    }

    #[test]
    fn int_shape_rejects_fractional_numbers() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let err = decoder
            .decode(
                "Details",
                &json!({"id": "1", "status": "SENT", "counts": [1.5]}),
            )
            .unwrap_err();
        assert!(matches!(err, DecodeError::ShapeMismatch { .. }));
    }

    #[test]
    fn json_shape_round_trips_verbatim() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let payload = json!({"nested": {"numbers": [1, 2, 3]}, "flag": true});
        let object = decoder
            .decode(
                "Details",
                &json!({"id": "1", "status": "SENT", "payload": payload.clone()}),
            )
            .unwrap();
        assert_eq!(object.json_field("payload"), Some(&payload));
    }

    #[test]
    fn unknown_wire_keys_are_ignored() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let object = decoder
            .decode("Paging", &json!({"more": true, "added_by_server": 1}))
            .unwrap();
        assert!(object.expect_bool("more"));
        assert!(!object.has_field("added_by_server"));
    }

    #[test]
    fn decode_is_idempotent() {
        let registry = registry();
        let decoder = Decoder::new(&registry);
        let input = json!({"more": false, "cursor": "abc123"});

        let first = decoder.decode("Paging", &input).unwrap();
        let second = decoder.decode("Paging", &input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_type_fails_at_entry() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let err = decoder.decode("Missing", &json!({})).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownType { .. }));
    }

    #[test]
    fn top_level_kind_mismatch_is_reported_at_root() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let err = decoder.decode("Paging", &json!([1, 2])).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ShapeMismatch { ref path, found: "array", .. } if path == "$"
        ));
    }
}
