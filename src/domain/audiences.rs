//! Audiences resource: filter-defined recipient segments.
//!
//! An audience filter is either a single comparison or a logical node over a
//! list of nested filters; the two shapes share no discriminator tag and the
//! nested form recurses through the same union.

use std::collections::BTreeMap;

use crate::codec::{FieldSpec, ModelSpec, Shape, TypedObject, UnionSpec, Value};
use crate::domain::common::{PAGED_FIELDS, Paging};
use crate::domain::{ApiModel, collect_models};

pub static COMPARISON_OPERATORS: [&str; 13] = [
    "ENDS_WITH",
    "EQ",
    "EXISTS",
    "GT",
    "GTE",
    "INCLUDES",
    "IS_AFTER",
    "IS_BEFORE",
    "LT",
    "LTE",
    "NEQ",
    "OMIT",
    "STARTS_WITH",
];

pub static LOGICAL_OPERATORS: [&str; 2] = ["AND", "OR"];

pub static SINGLE_FILTER: ModelSpec = ModelSpec {
    type_name: "SingleFilterConfig",
    field_groups: &[&[
        FieldSpec::required("operator", Shape::Enum(&COMPARISON_OPERATORS)),
        FieldSpec::required("path", Shape::String),
        FieldSpec::required("value", Shape::String),
    ]],
};

static FILTER_SHAPE: Shape = Shape::Union(&FILTER);

pub static NESTED_FILTER: ModelSpec = ModelSpec {
    type_name: "NestedFilterConfig",
    field_groups: &[&[
        FieldSpec::required("operator", Shape::Enum(&LOGICAL_OPERATORS)),
        FieldSpec::required("rules", Shape::List(&FILTER_SHAPE)),
    ]],
};

/// Filter variants in wire-contract declaration order. Do not reorder:
/// shape-based resolution commits to the first match, so the single form
/// takes priority over the nested form.
pub static FILTER: UnionSpec = UnionSpec {
    name: "FilterConfig",
    variants: &[Shape::Model(&SINGLE_FILTER), Shape::Model(&NESTED_FILTER)],
};

pub static AUDIENCE: ModelSpec = ModelSpec {
    type_name: "Audience",
    field_groups: &[&[
        FieldSpec::required("id", Shape::String),
        FieldSpec::optional("name", Shape::String),
        FieldSpec::optional("description", Shape::String),
        FieldSpec::optional("filter", Shape::Union(&FILTER)),
        FieldSpec::optional("created_at", Shape::String),
        FieldSpec::optional("updated_at", Shape::String),
    ]],
};

/// Request body for creating or updating an audience; all fields optional,
/// unset fields are left untouched by the service.
pub static AUDIENCE_UPDATE_REQUEST: ModelSpec = ModelSpec {
    type_name: "AudienceUpdateRequest",
    field_groups: &[&[
        FieldSpec::optional("name", Shape::String),
        FieldSpec::optional("description", Shape::String),
        FieldSpec::optional("filter", Shape::Union(&FILTER)),
    ]],
};

pub static AUDIENCE_UPDATE_RESPONSE: ModelSpec = ModelSpec {
    type_name: "AudienceUpdateResponse",
    field_groups: &[&[FieldSpec::required("audience", Shape::Model(&AUDIENCE))]],
};

static AUDIENCE_SHAPE: Shape = Shape::Model(&AUDIENCE);

pub static AUDIENCE_LIST: ModelSpec = ModelSpec {
    type_name: "AudienceListResponse",
    field_groups: &[
        &PAGED_FIELDS,
        &[FieldSpec::required("items", Shape::List(&AUDIENCE_SHAPE))],
    ],
};

pub static AUDIENCE_MEMBER: ModelSpec = ModelSpec {
    type_name: "AudienceMember",
    field_groups: &[&[
        FieldSpec::required("added_at", Shape::String),
        FieldSpec::required("audience_id", Shape::String),
        FieldSpec::required("audience_version", Shape::Int),
        FieldSpec::required("member_id", Shape::String),
        FieldSpec::required("reason", Shape::String),
    ]],
};

static AUDIENCE_MEMBER_SHAPE: Shape = Shape::Model(&AUDIENCE_MEMBER);

pub static AUDIENCE_MEMBER_LIST: ModelSpec = ModelSpec {
    type_name: "AudienceMemberListResponse",
    field_groups: &[
        &PAGED_FIELDS,
        &[FieldSpec::required(
            "items",
            Shape::List(&AUDIENCE_MEMBER_SHAPE),
        )],
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Comparison applied by a single filter rule.
pub enum ComparisonOperator {
    EndsWith,
    Eq,
    Exists,
    Gt,
    Gte,
    Includes,
    IsAfter,
    IsBefore,
    Lt,
    Lte,
    Neq,
    Omit,
    StartsWith,
}

impl ComparisonOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EndsWith => "ENDS_WITH",
            Self::Eq => "EQ",
            Self::Exists => "EXISTS",
            Self::Gt => "GT",
            Self::Gte => "GTE",
            Self::Includes => "INCLUDES",
            Self::IsAfter => "IS_AFTER",
            Self::IsBefore => "IS_BEFORE",
            Self::Lt => "LT",
            Self::Lte => "LTE",
            Self::Neq => "NEQ",
            Self::Omit => "OMIT",
            Self::StartsWith => "STARTS_WITH",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Some(match value {
            "ENDS_WITH" => Self::EndsWith,
            "EQ" => Self::Eq,
            "EXISTS" => Self::Exists,
            "GT" => Self::Gt,
            "GTE" => Self::Gte,
            "INCLUDES" => Self::Includes,
            "IS_AFTER" => Self::IsAfter,
            "IS_BEFORE" => Self::IsBefore,
            "LT" => Self::Lt,
            "LTE" => Self::Lte,
            "NEQ" => Self::Neq,
            "OMIT" => Self::Omit,
            "STARTS_WITH" => Self::StartsWith,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One comparison over a profile attribute path.
pub struct SingleFilter {
    pub operator: ComparisonOperator,
    pub path: String,
    pub value: String,
}

impl SingleFilter {
    pub fn new(
        operator: ComparisonOperator,
        path: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            operator,
            path: path.into(),
            value: value.into(),
        }
    }

    fn to_object(&self) -> TypedObject {
        let mut fields = BTreeMap::new();
        fields.insert("operator", Value::Enum(self.operator.as_str()));
        fields.insert("path", Value::String(self.path.clone()));
        fields.insert("value", Value::String(self.value.clone()));
        TypedObject::from_parts(&SINGLE_FILTER, fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A logical node combining nested filter rules.
pub struct NestedFilter {
    pub operator: LogicalOperator,
    pub rules: Vec<Filter>,
}

impl NestedFilter {
    pub fn new(operator: LogicalOperator, rules: Vec<Filter>) -> Self {
        Self { operator, rules }
    }

    fn to_object(&self) -> TypedObject {
        let mut fields = BTreeMap::new();
        fields.insert("operator", Value::Enum(self.operator.as_str()));
        fields.insert(
            "rules",
            Value::List(self.rules.iter().map(Filter::to_value).collect()),
        );
        TypedObject::from_parts(&NESTED_FILTER, fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// An audience filter tree.
pub enum Filter {
    Single(SingleFilter),
    Nested(NestedFilter),
}

impl Filter {
    pub fn single(
        operator: ComparisonOperator,
        path: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Single(SingleFilter::new(operator, path, value))
    }

    pub fn all_of(rules: Vec<Filter>) -> Self {
        Self::Nested(NestedFilter::new(LogicalOperator::And, rules))
    }

    pub fn any_of(rules: Vec<Filter>) -> Self {
        Self::Nested(NestedFilter::new(LogicalOperator::Or, rules))
    }

    pub(crate) fn to_value(&self) -> Value {
        let object = match self {
            Self::Single(filter) => filter.to_object(),
            Self::Nested(filter) => filter.to_object(),
        };
        Value::Object(object)
    }

    /// Reconstruct from a decoded union value. Returns `None` for values
    /// that are not filter objects (an unset field, an explicit null).
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        let Value::Object(object) = value else {
            return None;
        };
        match object.spec().type_name {
            "SingleFilterConfig" => {
                let operator = ComparisonOperator::from_wire(object.expect_str("operator"))?;
                Some(Self::Single(SingleFilter {
                    operator,
                    path: object.expect_str("path").to_owned(),
                    value: object.expect_str("value").to_owned(),
                }))
            }
            "NestedFilterConfig" => {
                let operator = LogicalOperator::from_wire(object.expect_str("operator"))?;
                let rules = object
                    .expect_list("rules")
                    .iter()
                    .filter_map(Self::from_value)
                    .collect();
                Some(Self::Nested(NestedFilter { operator, rules }))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Audience(TypedObject);

impl Audience {
    pub fn id(&self) -> &str {
        self.0.expect_str("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.str_field("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.str_field("description")
    }

    pub fn filter(&self) -> Option<Filter> {
        self.0.field("filter").and_then(Filter::from_value)
    }

    pub fn created_at(&self) -> Option<&str> {
        self.0.str_field("created_at")
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.0.str_field("updated_at")
    }
}

impl ApiModel for Audience {
    fn spec() -> &'static ModelSpec {
        &AUDIENCE
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

#[derive(Debug, Clone, Default, PartialEq)]
/// Fields to create or update on an audience.
pub struct AudienceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub filter: Option<Filter>,
}

impl AudienceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub(crate) fn to_object(&self) -> TypedObject {
        let mut fields = BTreeMap::new();
        if let Some(name) = &self.name {
            fields.insert("name", Value::String(name.clone()));
        }
        if let Some(description) = &self.description {
            fields.insert("description", Value::String(description.clone()));
        }
        if let Some(filter) = &self.filter {
            fields.insert("filter", filter.to_value());
        }
        TypedObject::from_parts(&AUDIENCE_UPDATE_REQUEST, fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudienceUpdateResponse(TypedObject);

impl AudienceUpdateResponse {
    pub fn audience(&self) -> Audience {
        Audience::from_object(self.0.expect_object("audience").clone())
    }
}

impl ApiModel for AudienceUpdateResponse {
    fn spec() -> &'static ModelSpec {
        &AUDIENCE_UPDATE_RESPONSE
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
pub struct AudienceListResponse(TypedObject);

impl AudienceListResponse {
    pub fn paging(&self) -> Paging {
        Paging::from_object(self.0.expect_object("paging").clone())
    }

    pub fn items(&self) -> Vec<Audience> {
        collect_models(self.0.expect_list("items"))
    }
}

impl ApiModel for AudienceListResponse {
    fn spec() -> &'static ModelSpec {
        &AUDIENCE_LIST
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
pub struct AudienceMember(TypedObject);

impl AudienceMember {
    pub fn added_at(&self) -> &str {
        self.0.expect_str("added_at")
    }

    pub fn audience_id(&self) -> &str {
        self.0.expect_str("audience_id")
    }

    pub fn audience_version(&self) -> i64 {
        self.0.expect_int("audience_version")
    }

    pub fn member_id(&self) -> &str {
        self.0.expect_str("member_id")
    }

    pub fn reason(&self) -> &str {
        self.0.expect_str("reason")
    }
}

impl ApiModel for AudienceMember {
    fn spec() -> &'static ModelSpec {
        &AUDIENCE_MEMBER
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
pub struct AudienceMemberListResponse(TypedObject);

impl AudienceMemberListResponse {
    pub fn paging(&self) -> Paging {
        Paging::from_object(self.0.expect_object("paging").clone())
    }

    pub fn items(&self) -> Vec<AudienceMember> {
        collect_models(self.0.expect_list("items"))
    }
}

impl ApiModel for AudienceMemberListResponse {
    fn spec() -> &'static ModelSpec {
        &AUDIENCE_MEMBER_LIST
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
