//! Resource models and typed request/response surfaces.
//!
//! Each resource module declares its wire models as static descriptor
//! tables, plus thin typed facades over the decoded objects. The process-
//! wide [`registry`] holds every model the client can decode.

pub mod audiences;
pub mod brands;
pub mod common;
pub mod lists;
pub mod messages;
pub mod profiles;
pub mod send;
pub mod tenants;
pub mod validation;

use std::sync::OnceLock;

use crate::codec::{ModelSpec, Registry, TypedObject, Value};

pub use audiences::{
    Audience, AudienceListResponse, AudienceMember, AudienceMemberListResponse, AudienceUpdate,
    AudienceUpdateResponse, ComparisonOperator, Filter, LogicalOperator, NestedFilter,
    SingleFilter,
};
pub use brands::{Brand, BrandColors, BrandListResponse, BrandSettings};
pub use common::Paging;
pub use lists::{ListGetAllResponse, SubscriberList};
pub use messages::{
    ListMessagesParams, MessageDetails, MessageListResponse, MessageReason, MessageStatus,
};
pub use profiles::{GetProfileResponse, ProfilePayload, ProfileUpdateResponse};
pub use send::{
    Content, Message, MessageBody, Recipient, Routing, RoutingMethod, SendMessageResponse, To,
    UserRecipient,
};
pub use tenants::{Tenant, TenantListResponse};
pub use validation::ValidationError;

/// A typed facade over a decoded model instance.
///
/// Response types wrap a [`TypedObject`] and expose field accessors; the
/// client uses [`ApiModel::spec`] to pick the descriptor for decoding and
/// [`ApiModel::from_object`] to wrap the result.
pub trait ApiModel: Sized {
    fn spec() -> &'static ModelSpec;
    fn from_object(object: TypedObject) -> Self;
    fn as_object(&self) -> &TypedObject;
    fn into_object(self) -> TypedObject;
}

/// Every model spec known to the client, keyed by type name. Built once on
/// first use; registration panics are schema bugs caught by the test suite.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        Registry::new(&[
            &common::PAGING,
            &send::USER_RECIPIENT,
            &send::LIST_RECIPIENT,
            &send::LIST_PATTERN_RECIPIENT,
            &send::AUDIENCE_RECIPIENT,
            &send::CONTENT,
            &send::ROUTING,
            &send::MESSAGE,
            &send::SEND_REQUEST,
            &send::SEND_RESPONSE,
            &messages::MESSAGE_DETAILS,
            &messages::MESSAGE_LIST,
            &profiles::GET_PROFILE_RESPONSE,
            &profiles::PROFILE_PAYLOAD,
            &profiles::PROFILE_UPDATE_RESPONSE,
            &audiences::SINGLE_FILTER,
            &audiences::NESTED_FILTER,
            &audiences::AUDIENCE,
            &audiences::AUDIENCE_UPDATE_REQUEST,
            &audiences::AUDIENCE_UPDATE_RESPONSE,
            &audiences::AUDIENCE_LIST,
            &audiences::AUDIENCE_MEMBER,
            &audiences::AUDIENCE_MEMBER_LIST,
            &brands::BRAND_COLORS,
            &brands::BRAND_SETTINGS,
            &brands::BRAND,
            &brands::BRAND_LIST,
            &lists::SUBSCRIBER_LIST,
            &lists::LIST_GET_ALL,
            &tenants::TENANT,
            &tenants::TENANT_LIST,
        ])
    })
}

/// Wrap each object element of a decoded list in its typed facade.
///
/// List elements come from the decoder, which guarantees they match the
/// declared element model, so non-object values cannot occur here.
pub(crate) fn collect_models<T: ApiModel>(values: &[Value]) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| match value {
            Value::Object(object) => Some(T::from_object(object.clone())),
            _ => None,
        })
        .collect()
}
