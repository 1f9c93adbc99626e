//! Brands resource: visual identity applied to rendered notifications.

use crate::codec::{FieldSpec, ModelSpec, Shape, TypedObject};
use crate::domain::common::{AUDIT_FIELDS, PAGED_FIELDS, Paging};
use crate::domain::{ApiModel, collect_models};

pub static BRAND_COLORS: ModelSpec = ModelSpec {
    type_name: "BrandColors",
    field_groups: &[&[
        FieldSpec::optional("primary", Shape::String),
        FieldSpec::optional("secondary", Shape::String),
        FieldSpec::optional("tertiary", Shape::String),
    ]],
};

pub static BRAND_SETTINGS: ModelSpec = ModelSpec {
    type_name: "BrandSettings",
    field_groups: &[&[FieldSpec::optional("colors", Shape::Model(&BRAND_COLORS))]],
};

pub static BRAND: ModelSpec = ModelSpec {
    type_name: "Brand",
    field_groups: &[
        &[
            FieldSpec::required("id", Shape::String),
            FieldSpec::required("name", Shape::String),
        ],
        &AUDIT_FIELDS,
        &[
            FieldSpec::optional("published", Shape::Int),
            FieldSpec::optional("version", Shape::String),
            FieldSpec::optional("settings", Shape::Model(&BRAND_SETTINGS)),
            FieldSpec::optional("snippets", Shape::Json),
        ],
    ],
};

static BRAND_SHAPE: Shape = Shape::Model(&BRAND);

pub static BRAND_LIST: ModelSpec = ModelSpec {
    type_name: "BrandListResponse",
    field_groups: &[
        &PAGED_FIELDS,
        &[FieldSpec::required("results", Shape::List(&BRAND_SHAPE))],
    ],
};

#[derive(Debug, Clone, PartialEq)]
pub struct BrandColors(TypedObject);

impl BrandColors {
    pub fn primary(&self) -> Option<&str> {
        self.0.str_field("primary")
    }

    pub fn secondary(&self) -> Option<&str> {
        self.0.str_field("secondary")
    }

    pub fn tertiary(&self) -> Option<&str> {
        self.0.str_field("tertiary")
    }
}

impl ApiModel for BrandColors {
    fn spec() -> &'static ModelSpec {
        &BRAND_COLORS
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
pub struct BrandSettings(TypedObject);

impl BrandSettings {
    pub fn colors(&self) -> Option<BrandColors> {
        self.0
            .object_field("colors")
            .map(|object| BrandColors::from_object(object.clone()))
    }
}

impl ApiModel for BrandSettings {
    fn spec() -> &'static ModelSpec {
        &BRAND_SETTINGS
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
pub struct Brand(TypedObject);

impl Brand {
    pub fn id(&self) -> &str {
        self.0.expect_str("id")
    }

    pub fn name(&self) -> &str {
        self.0.expect_str("name")
    }

    /// Epoch milliseconds of creation, when reported.
    pub fn created(&self) -> Option<i64> {
        self.0.int_field("created")
    }

    pub fn updated(&self) -> Option<i64> {
        self.0.int_field("updated")
    }

    pub fn published(&self) -> Option<i64> {
        self.0.int_field("published")
    }

    pub fn version(&self) -> Option<&str> {
        self.0.str_field("version")
    }

    pub fn settings(&self) -> Option<BrandSettings> {
        self.0
            .object_field("settings")
            .map(|object| BrandSettings::from_object(object.clone()))
    }

    /// Reusable template snippets, verbatim JSON.
    pub fn snippets(&self) -> Option<&serde_json::Value> {
        self.0.json_field("snippets")
    }
}

impl ApiModel for Brand {
    fn spec() -> &'static ModelSpec {
        &BRAND
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
pub struct BrandListResponse(TypedObject);

impl BrandListResponse {
    pub fn paging(&self) -> Paging {
        Paging::from_object(self.0.expect_object("paging").clone())
    }

    pub fn results(&self) -> Vec<Brand> {
        collect_models(self.0.expect_list("results"))
    }
}

impl ApiModel for BrandListResponse {
    fn spec() -> &'static ModelSpec {
        &BRAND_LIST
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
