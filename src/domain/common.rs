//! Shapes shared across resources: the uniform paging block and the audit
//! timestamp field group.

use crate::codec::{FieldSpec, ModelSpec, Shape, TypedObject};
use crate::domain::ApiModel;

/// Paging block returned by every list operation.
///
/// The cursor is an opaque token owned by the remote service: it is never
/// parsed or constructed here, only passed back verbatim on the next call.
pub static PAGING: ModelSpec = ModelSpec {
    type_name: "Paging",
    field_groups: &[&[
        FieldSpec::required("more", Shape::Bool),
        FieldSpec::optional("cursor", Shape::String).nullable(),
    ]],
};

/// Field group embedded by every list response.
pub static PAGED_FIELDS: [FieldSpec; 1] = [FieldSpec::required("paging", Shape::Model(&PAGING))];

/// Epoch-millisecond audit timestamps shared by brands and subscriber lists.
pub static AUDIT_FIELDS: [FieldSpec; 2] = [
    FieldSpec::optional("created", Shape::Int),
    FieldSpec::optional("updated", Shape::Int),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Paging(TypedObject);

impl Paging {
    /// Whether another page exists.
    pub fn more(&self) -> bool {
        self.0.expect_bool("more")
    }

    /// Cursor for the next page, if the service provided one.
    pub fn cursor(&self) -> Option<&str> {
        self.0.str_field("cursor")
    }
}

impl ApiModel for Paging {
    fn spec() -> &'static ModelSpec {
        &PAGING
    }

    fn from_object(object: TypedObject) -> Self {
        Self(object)
    }

    fn as_object(&self) -> &TypedObject {
        &self.0
    }

    fn into_object(self) -> TypedObject {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::codec::{Decoder, encode};
    use crate::domain::registry;

    #[test]
    fn paging_with_cursor_unset() {
        let decoder = Decoder::new(registry());
        let object = decoder.decode("Paging", &json!({"more": true})).unwrap();
        let paging = Paging::from_object(object);
        assert!(paging.more());
        assert_eq!(paging.cursor(), None);
        assert!(!paging.as_object().has_field("cursor"));

        // Re-encoding yields exactly the input: no `cursor` key at all.
        assert_eq!(encode(paging.as_object()), json!({"more": true}));
    }

    #[test]
    fn paging_with_both_fields_set() {
        let decoder = Decoder::new(registry());
        let object = decoder
            .decode("Paging", &json!({"more": false, "cursor": "abc123"}))
            .unwrap();
        let paging = Paging::from_object(object);
        assert!(!paging.more());
        assert_eq!(paging.cursor(), Some("abc123"));
    }

    #[test]
    fn paging_with_explicit_null_cursor_is_present_but_none() {
        let decoder = Decoder::new(registry());
        let object = decoder
            .decode("Paging", &json!({"more": false, "cursor": null}))
            .unwrap();
        let paging = Paging::from_object(object);
        assert!(paging.as_object().has_field("cursor"));
        assert_eq!(paging.cursor(), None);
    }
}
