//! Lists resource: named subscriber lists addressable from the send path.

use crate::codec::{FieldSpec, ModelSpec, Shape, TypedObject};
use crate::domain::common::{AUDIT_FIELDS, PAGED_FIELDS, Paging};
use crate::domain::{ApiModel, collect_models};

pub static SUBSCRIBER_LIST: ModelSpec = ModelSpec {
    type_name: "SubscriberList",
    field_groups: &[
        &[
            FieldSpec::required("id", Shape::String),
            FieldSpec::optional("name", Shape::String),
        ],
        &AUDIT_FIELDS,
    ],
};

static SUBSCRIBER_LIST_SHAPE: Shape = Shape::Model(&SUBSCRIBER_LIST);

pub static LIST_GET_ALL: ModelSpec = ModelSpec {
    type_name: "ListGetAllResponse",
    field_groups: &[
        &PAGED_FIELDS,
        &[FieldSpec::required(
            "items",
            Shape::List(&SUBSCRIBER_LIST_SHAPE),
        )],
    ],
};

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberList(TypedObject);

impl SubscriberList {
    pub fn id(&self) -> &str {
        self.0.expect_str("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str_field("name")
    }

    pub fn created(&self) -> Option<i64> {
        self.0.int_field("created")
    }

    pub fn updated(&self) -> Option<i64> {
        self.0.int_field("updated")
    }
}

impl ApiModel for SubscriberList {
    fn spec() -> &'static ModelSpec {
        &SUBSCRIBER_LIST
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

#[derive(Debug, Clone, PartialEq)]
pub struct ListGetAllResponse(TypedObject);

impl ListGetAllResponse {
    pub fn paging(&self) -> Paging {
        Paging::from_object(self.0.expect_object("paging").clone())
    }

    pub fn items(&self) -> Vec<SubscriberList> {
        collect_models(self.0.expect_list("items"))
    }
}

impl ApiModel for ListGetAllResponse {
    fn spec() -> &'static ModelSpec {
        &LIST_GET_ALL
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
    use crate::codec::Decoder;
    use crate::domain::registry;

    #[test]
    fn list_with_audit_timestamps() {
        let decoder = Decoder::new(registry());
        let object = decoder
            .decode(
                "SubscriberList",
                &json!({"id": "list-1", "name": "Beta testers", "created": 1690000000000_i64}),
            )
            .unwrap();
        let list = SubscriberList::from_object(object);
        assert_eq!(list.id(), "list-1");
        assert_eq!(list.name(), Some("Beta testers"));
        assert_eq!(list.created(), Some(1_690_000_000_000));
        assert_eq!(list.updated(), None);
    }

    #[test]
    fn get_all_response_decodes_items() {
        let decoder = Decoder::new(registry());
        let object = decoder
            .decode(
                "ListGetAllResponse",
                &json!({
                    "paging": {"more": false},
                    "items": [{"id": "list-1"}, {"id": "list-2", "name": "VIP"}]
                }),
            )
            .unwrap();
        let response = ListGetAllResponse::from_object(object);
        assert!(!response.paging().more());
        assert_eq!(response.items().len(), 2);
        assert_eq!(response.items()[1].name(), Some("VIP"));
    }
}
