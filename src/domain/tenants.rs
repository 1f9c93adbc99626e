//! Tenants resource: per-customer scoping with inherited defaults.

use crate::codec::{FieldSpec, ModelSpec, Shape, TypedObject};
use crate::domain::common::{PAGED_FIELDS, Paging};
use crate::domain::{ApiModel, collect_models};

pub static TENANT: ModelSpec = ModelSpec {
    type_name: "Tenant",
    field_groups: &[&[
        FieldSpec::required("id", Shape::String),
        FieldSpec::required("name", Shape::String),
        FieldSpec::optional("parent_tenant_id", Shape::String),
        FieldSpec::optional("brand_id", Shape::String),
        FieldSpec::optional("default_preferences", Shape::Json),
        FieldSpec::optional("properties", Shape::Json),
        FieldSpec::optional("user_profile", Shape::Json),
    ]],
};

static TENANT_SHAPE: Shape = Shape::Model(&TENANT);

pub static TENANT_LIST: ModelSpec = ModelSpec {
    type_name: "TenantListResponse",
    field_groups: &[
        &PAGED_FIELDS,
        &[FieldSpec::required("items", Shape::List(&TENANT_SHAPE))],
    ],
};

#[derive(Debug, Clone, PartialEq)]
pub struct Tenant(TypedObject);

impl Tenant {
    pub fn id(&self) -> &str {
        self.0.expect_str("id")
    }

    pub fn name(&self) -> &str {
        self.0.expect_str("name")
    }

    pub fn parent_tenant_id(&self) -> Option<&str> {
        self.0.str_field("parent_tenant_id")
    }

    pub fn brand_id(&self) -> Option<&str> {
        self.0.str_field("brand_id")
    }

    pub fn default_preferences(&self) -> Option<&serde_json::Value> {
        self.0.json_field("default_preferences")
    }

    pub fn properties(&self) -> Option<&serde_json::Value> {
        self.0.json_field("properties")
    }

    /// Profile attributes merged into every member of this tenant.
    pub fn user_profile(&self) -> Option<&serde_json::Value> {
        self.0.json_field("user_profile")
    }
}

impl ApiModel for Tenant {
    fn spec() -> &'static ModelSpec {
        &TENANT
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
pub struct TenantListResponse(TypedObject);

impl TenantListResponse {
    pub fn paging(&self) -> Paging {
        Paging::from_object(self.0.expect_object("paging").clone())
    }

    pub fn items(&self) -> Vec<Tenant> {
        collect_models(self.0.expect_list("items"))
    }
}

impl ApiModel for TenantListResponse {
    fn spec() -> &'static ModelSpec {
        &TENANT_LIST
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
