//! Typed Rust client for the Courier notification-delivery REST API.
//!
//! The crate is split into three layers: a generic model codec driven by
//! static descriptor tables, a domain layer of per-resource models and typed
//! request builders, and a small client layer orchestrating HTTP calls.
//!
//! ```rust,no_run
//! use courier_client::{AuthToken, Content, CourierClient, Message, MessageBody, To};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), courier_client::CourierError> {
//!     let client = CourierClient::new(AuthToken::new("...")?);
//!     let message = Message::new(
//!         To::user("user-123"),
//!         MessageBody::content(Content::new("Welcome", "Thanks for signing up!")),
//!     );
//!     let response = client.send(&message).await?;
//!     println!("enqueued as {}", response.request_id());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod codec;
pub mod domain;

pub use client::{AuthToken, CourierClient, CourierClientBuilder, CourierError};
pub use codec::{
    DecodeError, Decoder, FieldSpec, ModelSpec, Registry, Shape, TypedObject, UnionSpec, Value,
    VariantFailure, encode,
};
pub use domain::{
    ApiModel, Audience, AudienceListResponse, AudienceMember, AudienceMemberListResponse,
    AudienceUpdate, AudienceUpdateResponse, Brand, BrandColors, BrandListResponse, BrandSettings,
    ComparisonOperator, Content, Filter, GetProfileResponse, ListGetAllResponse,
    ListMessagesParams, LogicalOperator, Message, MessageBody, MessageDetails,
    MessageListResponse, MessageReason, MessageStatus, NestedFilter, Paging, ProfilePayload,
    ProfileUpdateResponse, Recipient, Routing, RoutingMethod, SendMessageResponse, SingleFilter,
    SubscriberList, Tenant, TenantListResponse, To, UserRecipient, ValidationError, registry,
};
