//! Encoder: the inverse of decoding. Produces a JSON-compatible value from
//! a [`TypedObject`], emitting only fields that were explicitly set. Total
//! and pure: a finished object cannot hold anything unencodable.

use serde_json::Value as JsonValue;

use crate::codec::value::{TypedObject, Value};

/// Encode an object for transmission. Unset fields are omitted entirely;
/// explicit nulls are emitted as JSON `null`.
pub fn encode(object: &TypedObject) -> JsonValue {
    let mut map = serde_json::Map::new();
    for field in object.spec().fields() {
        if let Some(value) = object.field(field.local_name) {
            map.insert(field.wire_name.to_owned(), encode_value(value));
        }
    }
    JsonValue::Object(map)
}

/// Encode one typed value.
pub fn encode_value(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::Number((*i).into()),
        // JSON has no non-finite numbers; decoded floats are always finite.
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Enum(s) => JsonValue::String((*s).to_owned()),
        Value::List(items) => JsonValue::Array(items.iter().map(encode_value).collect()),
        Value::Map(entries) => JsonValue::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), encode_value(value)))
                .collect(),
        ),
        Value::Object(object) => encode(object),
        Value::Json(raw) => raw.clone(),
    }
}

impl serde::Serialize for TypedObject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        encode(self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::codec::decode::Decoder;
    use crate::codec::spec::{FieldSpec, ModelSpec, Registry, Shape};

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

    static ITEM: ModelSpec = ModelSpec {
        type_name: "Item",
        field_groups: &[&[
            FieldSpec::required("id", Shape::String),
            FieldSpec::optional("counts", Shape::List(&Shape::Int)),
            FieldSpec::optional("paging", Shape::Model(&PAGING)),
            FieldSpec::optional("payload", Shape::Json),
        ]],
    };

    fn registry() -> Registry {
        Registry::new(&[&PAGING, &RENAMED, &ITEM])
    }

    #[test]
    fn unset_fields_are_omitted_not_null() {
        let object = TypedObject::builder(&PAGING)
            .set("more", Value::Bool(true))
            .build()
            .unwrap();
        assert_eq!(encode(&object), json!({"more": true}));
    }

    #[test]
    fn explicit_null_is_emitted() {
        let object = TypedObject::builder(&PAGING)
            .set("more", Value::Bool(false))
            .set("cursor", Value::Null)
            .build()
            .unwrap();
        assert_eq!(encode(&object), json!({"more": false, "cursor": null}));
    }

    #[test]
    fn wire_renames_apply_on_encode() {
        let object = TypedObject::builder(&RENAMED)
            .set("request_id", Value::String("req-1".to_owned()))
            .build()
            .unwrap();
        assert_eq!(encode(&object), json!({"requestId": "req-1"}));
    }

    #[test]
    fn round_trip_with_only_required_fields() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let original = TypedObject::builder(&PAGING)
            .set("more", Value::Bool(true))
            .build()
            .unwrap();
        let decoded = decoder.decode("Paging", &encode(&original)).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn round_trip_with_all_optional_fields_set() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let paging = TypedObject::builder(&PAGING)
            .set("more", Value::Bool(false))
            .set("cursor", Value::String("abc123".to_owned()))
            .build()
            .unwrap();
        let original = TypedObject::builder(&ITEM)
            .set("id", Value::String("item-1".to_owned()))
            .set(
                "counts",
                Value::List(vec![Value::Int(3), Value::Int(1), Value::Int(2)]),
            )
            .set("paging", Value::Object(paging))
            .set("payload", Value::Json(json!({"free": ["form", 1]})))
            .build()
            .unwrap();

        let decoded = decoder.decode("Item", &encode(&original)).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn list_order_is_preserved_through_decode_and_encode() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let input = json!({"id": "item-1", "counts": [3, 1, 2]});
        let decoded = decoder.decode("Item", &input).unwrap();
        assert_eq!(
            encode(&decoded),
            json!({"id": "item-1", "counts": [3, 1, 2]})
        );
    }

    #[test]
    fn serde_serialize_matches_encode() {
        let object = TypedObject::builder(&PAGING)
            .set("more", Value::Bool(true))
            .build()
            .unwrap();
        let via_serde = serde_json::to_value(&object).unwrap();
        assert_eq!(via_serde, encode(&object));
    }
}
