//! Messages resource: delivery status lookups over sent messages.

use crate::codec::{FieldSpec, ModelSpec, Shape, TypedObject};
use crate::domain::common::{PAGED_FIELDS, Paging};
use crate::domain::{ApiModel, collect_models};

pub static MESSAGE_STATUSES: [&str; 12] = [
    "CANCELED",
    "CLICKED",
    "DELIVERED",
    "ENQUEUED",
    "OPENED",
    "ROUTED",
    "SENT",
    "SIMULATED",
    "THROTTLED",
    "UNDELIVERABLE",
    "UNMAPPED",
    "UNROUTABLE",
];

pub static MESSAGE_REASONS: [&str; 9] = [
    "BOUNCED",
    "FAILED",
    "FILTERED",
    "NO_CHANNELS",
    "NO_PROVIDERS",
    "OPT_IN_REQUIRED",
    "PROVIDER_ERROR",
    "UNPUBLISHED",
    "UNSUBSCRIBED",
];

pub static MESSAGE_DETAILS: ModelSpec = ModelSpec {
    type_name: "MessageDetails",
    field_groups: &[&[
        FieldSpec::required("id", Shape::String),
        FieldSpec::required("status", Shape::Enum(&MESSAGE_STATUSES)),
        FieldSpec::optional("enqueued", Shape::Int),
        FieldSpec::optional("sent", Shape::Int),
        FieldSpec::optional("delivered", Shape::Int),
        FieldSpec::optional("opened", Shape::Int),
        FieldSpec::optional("clicked", Shape::Int),
        FieldSpec::optional("recipient", Shape::String),
        FieldSpec::optional("event", Shape::String),
        FieldSpec::optional("notification", Shape::String),
        FieldSpec::optional("error", Shape::String).nullable(),
        FieldSpec::optional("reason", Shape::Enum(&MESSAGE_REASONS)),
    ]],
};

static MESSAGE_DETAILS_SHAPE: Shape = Shape::Model(&MESSAGE_DETAILS);

pub static MESSAGE_LIST: ModelSpec = ModelSpec {
    type_name: "MessageListResponse",
    field_groups: &[
        &PAGED_FIELDS,
        &[FieldSpec::required(
            "results",
            Shape::List(&MESSAGE_DETAILS_SHAPE),
        )],
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Delivery status of a message. Closed set: unknown wire values fail the
/// decode rather than mapping to a catch-all.
pub enum MessageStatus {
    Canceled,
    Clicked,
    Delivered,
    Enqueued,
    Opened,
    Routed,
    Sent,
    Simulated,
    Throttled,
    Undeliverable,
    Unmapped,
    Unroutable,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Canceled => "CANCELED",
            Self::Clicked => "CLICKED",
            Self::Delivered => "DELIVERED",
            Self::Enqueued => "ENQUEUED",
            Self::Opened => "OPENED",
            Self::Routed => "ROUTED",
            Self::Sent => "SENT",
            Self::Simulated => "SIMULATED",
            Self::Throttled => "THROTTLED",
            Self::Undeliverable => "UNDELIVERABLE",
            Self::Unmapped => "UNMAPPED",
            Self::Unroutable => "UNROUTABLE",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Some(match value {
            "CANCELED" => Self::Canceled,
            "CLICKED" => Self::Clicked,
            "DELIVERED" => Self::Delivered,
            "ENQUEUED" => Self::Enqueued,
            "OPENED" => Self::Opened,
            "ROUTED" => Self::Routed,
            "SENT" => Self::Sent,
            "SIMULATED" => Self::Simulated,
            "THROTTLED" => Self::Throttled,
            "UNDELIVERABLE" => Self::Undeliverable,
            "UNMAPPED" => Self::Unmapped,
            "UNROUTABLE" => Self::Unroutable,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Why a message ended in a terminal non-delivered state.
pub enum MessageReason {
    Bounced,
    Failed,
    Filtered,
    NoChannels,
    NoProviders,
    OptInRequired,
    ProviderError,
    Unpublished,
    Unsubscribed,
}

impl MessageReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bounced => "BOUNCED",
            Self::Failed => "FAILED",
            Self::Filtered => "FILTERED",
            Self::NoChannels => "NO_CHANNELS",
            Self::NoProviders => "NO_PROVIDERS",
            Self::OptInRequired => "OPT_IN_REQUIRED",
            Self::ProviderError => "PROVIDER_ERROR",
            Self::Unpublished => "UNPUBLISHED",
            Self::Unsubscribed => "UNSUBSCRIBED",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Some(match value {
            "BOUNCED" => Self::Bounced,
            "FAILED" => Self::Failed,
            "FILTERED" => Self::Filtered,
            "NO_CHANNELS" => Self::NoChannels,
            "NO_PROVIDERS" => Self::NoProviders,
            "OPT_IN_REQUIRED" => Self::OptInRequired,
            "PROVIDER_ERROR" => Self::ProviderError,
            "UNPUBLISHED" => Self::Unpublished,
            "UNSUBSCRIBED" => Self::Unsubscribed,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageDetails(TypedObject);

impl MessageDetails {
    pub fn id(&self) -> &str {
        self.0.expect_str("id")
    }

    pub fn status(&self) -> MessageStatus {
        let value = self.0.expect_str("status");
        MessageStatus::from_wire(value)
            .unwrap_or_else(|| unreachable!("decoder validated `status` against the closed set"))
    }

    /// Epoch milliseconds for each delivery milestone, when reached.
    pub fn enqueued(&self) -> Option<i64> {
        self.0.int_field("enqueued")
    }

    pub fn sent(&self) -> Option<i64> {
        self.0.int_field("sent")
    }

    pub fn delivered(&self) -> Option<i64> {
        self.0.int_field("delivered")
    }

    pub fn opened(&self) -> Option<i64> {
        self.0.int_field("opened")
    }

    pub fn clicked(&self) -> Option<i64> {
        self.0.int_field("clicked")
    }

    pub fn recipient(&self) -> Option<&str> {
        self.0.str_field("recipient")
    }

    pub fn event(&self) -> Option<&str> {
        self.0.str_field("event")
    }

    pub fn notification(&self) -> Option<&str> {
        self.0.str_field("notification")
    }

    pub fn error(&self) -> Option<&str> {
        self.0.str_field("error")
    }

    pub fn reason(&self) -> Option<MessageReason> {
        self.0.str_field("reason").and_then(MessageReason::from_wire)
    }
}

impl ApiModel for MessageDetails {
    fn spec() -> &'static ModelSpec {
        &MESSAGE_DETAILS
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
pub struct MessageListResponse(TypedObject);

impl MessageListResponse {
    pub fn paging(&self) -> Paging {
        Paging::from_object(self.0.expect_object("paging").clone())
    }

    pub fn results(&self) -> Vec<MessageDetails> {
        collect_models(self.0.expect_list("results"))
    }
}

impl ApiModel for MessageListResponse {
    fn spec() -> &'static ModelSpec {
        &MESSAGE_LIST
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

#[derive(Debug, Clone, Default)]
/// Query filters for the message list endpoint. All filters are optional;
/// the cursor is an opaque token from a previous response.
pub struct ListMessagesParams {
    pub cursor: Option<String>,
    pub status: Option<MessageStatus>,
    pub recipient: Option<String>,
    pub event: Option<String>,
    pub notification: Option<String>,
}

impl ListMessagesParams {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor", cursor.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_owned()));
        }
        if let Some(recipient) = &self.recipient {
            pairs.push(("recipient", recipient.clone()));
        }
        if let Some(event) = &self.event {
            pairs.push(("event", event.clone()));
        }
        if let Some(notification) = &self.notification {
            pairs.push(("notification", notification.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::codec::{DecodeError, Decoder};
    use crate::domain::registry;

    #[test]
    fn message_details_decode_with_milestones() {
        let decoder = Decoder::new(registry());
        let object = decoder
            .decode(
                "MessageDetails",
                &json!({
                    "id": "1-abc",
                    "status": "DELIVERED",
                    "enqueued": 1700000000000_i64,
                    "sent": 1700000001000_i64,
                    "delivered": 1700000002000_i64,
                    "recipient": "user-1",
                    "error": null
                }),
            )
            .unwrap();
        let details = MessageDetails::from_object(object);
        assert_eq!(details.id(), "1-abc");
        assert_eq!(details.status(), MessageStatus::Delivered);
        assert_eq!(details.enqueued(), Some(1_700_000_000_000));
        assert_eq!(details.delivered(), Some(1_700_000_002_000));
        assert_eq!(details.opened(), None);
        assert_eq!(details.recipient(), Some("user-1"));
        // Explicit null error: present but unreadable as a string.
        assert!(details.as_object().has_field("error"));
        assert_eq!(details.error(), None);
    }

    #[test]
    fn unknown_status_fails_decode() {
        let decoder = Decoder::new(registry());
        let err = decoder
            .decode("MessageDetails", &json!({"id": "1", "status": "LOST"}))
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownEnumValue { .. }));
    }

    #[test]
    fn list_response_exposes_paging_and_results_in_order() {
        let decoder = Decoder::new(registry());
        let object = decoder
            .decode(
                "MessageListResponse",
                &json!({
                    "paging": {"more": true, "cursor": "next-1"},
                    "results": [
                        {"id": "m3", "status": "SENT"},
                        {"id": "m1", "status": "ENQUEUED"},
                        {"id": "m2", "status": "UNDELIVERABLE", "reason": "BOUNCED"}
                    ]
                }),
            )
            .unwrap();
        let response = MessageListResponse::from_object(object);
        assert!(response.paging().more());
        assert_eq!(response.paging().cursor(), Some("next-1"));

        let results = response.results();
        let ids: Vec<_> = results.iter().map(MessageDetails::id).collect();
        assert_eq!(ids, vec!["m3", "m1", "m2"]);
        assert_eq!(results[2].reason(), Some(MessageReason::Bounced));
    }

    #[test]
    fn params_emit_only_set_filters() {
        let params = ListMessagesParams::default();
        assert!(params.query_pairs().is_empty());

        let params = ListMessagesParams {
            cursor: Some("abc".to_owned()),
            status: Some(MessageStatus::Sent),
            ..Default::default()
        };
        assert_eq!(
            params.query_pairs(),
            vec![("cursor", "abc".to_owned()), ("status", "SENT".to_owned())]
        );
    }

    #[test]
    fn status_and_reason_wire_mappings_cover_the_value_sets() {
        for value in MESSAGE_STATUSES {
            let status = MessageStatus::from_wire(value).unwrap();
            assert_eq!(status.as_str(), value);
        }
        for value in MESSAGE_REASONS {
            let reason = MessageReason::from_wire(value).unwrap();
            assert_eq!(reason.as_str(), value);
        }
        assert_eq!(MessageStatus::from_wire("LOST"), None);
        assert_eq!(MessageReason::from_wire("GREMLINS"), None);
    }
}
