//! Profiles resource: free-form recipient attribute maps keyed by user id.
//!
//! Profile contents are caller-defined JSON, so the payloads carry them
//! verbatim under a single required `profile` key.

use crate::codec::{FieldSpec, ModelSpec, Shape, TypedObject, Value};
use crate::domain::ApiModel;

pub static GET_PROFILE_RESPONSE: ModelSpec = ModelSpec {
    type_name: "GetProfileResponse",
    field_groups: &[&[FieldSpec::required("profile", Shape::Json)]],
};

/// Request envelope for merge and replace: `{"profile": {...}}`.
pub static PROFILE_PAYLOAD: ModelSpec = ModelSpec {
    type_name: "ProfilePayload",
    field_groups: &[&[FieldSpec::required("profile", Shape::Json)]],
};

pub static PROFILE_UPDATE_RESPONSE: ModelSpec = ModelSpec {
    type_name: "ProfileUpdateResponse",
    field_groups: &[&[FieldSpec::required("status", Shape::String)]],
};

#[derive(Debug, Clone, PartialEq)]
pub struct GetProfileResponse(TypedObject);

impl GetProfileResponse {
    /// The stored profile attributes, verbatim.
    pub fn profile(&self) -> &serde_json::Value {
        self.0.expect_json("profile")
    }
}

impl ApiModel for GetProfileResponse {
    fn spec() -> &'static ModelSpec {
        &GET_PROFILE_RESPONSE
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
pub struct ProfileUpdateResponse(TypedObject);

impl ProfileUpdateResponse {
    pub fn status(&self) -> &str {
        self.0.expect_str("status")
    }
}

impl ApiModel for ProfileUpdateResponse {
    fn spec() -> &'static ModelSpec {
        &PROFILE_UPDATE_RESPONSE
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

/// Attributes to merge into or replace a profile with.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePayload {
    profile: serde_json::Value,
}

impl ProfilePayload {
    pub fn new(profile: serde_json::Value) -> Self {
        Self { profile }
    }

    pub(crate) fn to_object(&self) -> TypedObject {
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("profile", Value::Json(self.profile.clone()));
        TypedObject::from_parts(&PROFILE_PAYLOAD, fields)
    }
}

impl From<serde_json::Value> for ProfilePayload {
    fn from(profile: serde_json::Value) -> Self {
        Self::new(profile)
    }
}
