//! Send resource: message requests, recipient variants, and the send
//! response.
//!
//! The `to` field accepts one recipient or a list of recipients, and each
//! recipient is one of several shapes with no discriminator tag; the wire
//! contract resolves them by shape in declaration order.

use std::collections::BTreeMap;

use crate::codec::{FieldSpec, ModelSpec, Shape, TypedObject, UnionSpec, Value};
use crate::domain::ApiModel;
use crate::domain::validation::ValidationError;

pub static USER_RECIPIENT: ModelSpec = ModelSpec {
    type_name: "UserRecipient",
    field_groups: &[&[
        FieldSpec::required("user_id", Shape::String),
        FieldSpec::optional("email", Shape::String),
        FieldSpec::optional("phone_number", Shape::String),
        FieldSpec::optional("data", Shape::Json).nullable(),
    ]],
};

pub static LIST_RECIPIENT: ModelSpec = ModelSpec {
    type_name: "ListRecipient",
    field_groups: &[&[FieldSpec::required("list_id", Shape::String)]],
};

pub static LIST_PATTERN_RECIPIENT: ModelSpec = ModelSpec {
    type_name: "ListPatternRecipient",
    field_groups: &[&[FieldSpec::required("list_pattern", Shape::String)]],
};

pub static AUDIENCE_RECIPIENT: ModelSpec = ModelSpec {
    type_name: "AudienceRecipient",
    field_groups: &[&[FieldSpec::required("audience_id", Shape::String)]],
};

/// Recipient variants in wire-contract declaration order. Do not reorder:
/// shape-based resolution commits to the first match.
pub static RECIPIENT: UnionSpec = UnionSpec {
    name: "Recipient",
    variants: &[
        Shape::Model(&USER_RECIPIENT),
        Shape::Model(&LIST_RECIPIENT),
        Shape::Model(&LIST_PATTERN_RECIPIENT),
        Shape::Model(&AUDIENCE_RECIPIENT),
    ],
};

static RECIPIENT_SHAPE: Shape = Shape::Union(&RECIPIENT);

/// The `to` field: a single recipient or an array of recipients.
pub static RECIPIENT_OR_LIST: UnionSpec = UnionSpec {
    name: "RecipientOrList",
    variants: &[
        Shape::Model(&USER_RECIPIENT),
        Shape::Model(&LIST_RECIPIENT),
        Shape::Model(&LIST_PATTERN_RECIPIENT),
        Shape::Model(&AUDIENCE_RECIPIENT),
        Shape::List(&RECIPIENT_SHAPE),
    ],
};

pub static CONTENT: ModelSpec = ModelSpec {
    type_name: "ElementalContentSugar",
    field_groups: &[&[
        FieldSpec::required("title", Shape::String),
        FieldSpec::required("body", Shape::String),
    ]],
};

pub static ROUTING_METHODS: [&str; 2] = ["all", "single"];

pub static ROUTING: ModelSpec = ModelSpec {
    type_name: "Routing",
    field_groups: &[&[
        // The service treats an absent method as `single`.
        FieldSpec::optional("method", Shape::Enum(&ROUTING_METHODS)).defaulted(),
        FieldSpec::required("channels", Shape::List(&Shape::String)),
    ]],
};

pub static MESSAGE: ModelSpec = ModelSpec {
    type_name: "Message",
    field_groups: &[&[
        FieldSpec::required("to", Shape::Union(&RECIPIENT_OR_LIST)),
        FieldSpec::optional("content", Shape::Model(&CONTENT)),
        FieldSpec::optional("template", Shape::String),
        FieldSpec::optional("data", Shape::Json).nullable(),
        FieldSpec::optional("brand_id", Shape::String),
        FieldSpec::optional("routing", Shape::Model(&ROUTING)),
        FieldSpec::optional("metadata", Shape::Json),
    ]],
};

pub static SEND_REQUEST: ModelSpec = ModelSpec {
    type_name: "SendMessageRequest",
    field_groups: &[&[FieldSpec::required("message", Shape::Model(&MESSAGE))]],
};

pub static SEND_RESPONSE: ModelSpec = ModelSpec {
    type_name: "SendMessageResponse",
    field_groups: &[&[FieldSpec::required("request_id", Shape::String).wire("requestId")]],
};

#[derive(Debug, Clone, PartialEq)]
/// Recipient addressed by user id, with optional contact overrides.
pub struct UserRecipient {
    pub user_id: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub data: Option<serde_json::Value>,
}

impl UserRecipient {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            phone_number: None,
            data: None,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Recipient-scoped template data, merged over the message `data`.
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    fn to_object(&self) -> TypedObject {
        let mut fields = BTreeMap::new();
        fields.insert("user_id", Value::String(self.user_id.clone()));
        if let Some(email) = &self.email {
            fields.insert("email", Value::String(email.clone()));
        }
        if let Some(phone_number) = &self.phone_number {
            fields.insert("phone_number", Value::String(phone_number.clone()));
        }
        if let Some(data) = &self.data {
            fields.insert("data", Value::Json(data.clone()));
        }
        TypedObject::from_parts(&USER_RECIPIENT, fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One of the recipient shapes accepted by the `to` field.
pub enum Recipient {
    User(UserRecipient),
    /// Every subscriber of a list, by list id.
    List(String),
    /// Every subscriber of all lists matching a pattern.
    ListPattern(String),
    /// Every member of an audience, by audience id.
    Audience(String),
}

impl Recipient {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self::User(UserRecipient::new(user_id))
    }

    pub fn list(list_id: impl Into<String>) -> Self {
        Self::List(list_id.into())
    }

    pub fn list_pattern(pattern: impl Into<String>) -> Self {
        Self::ListPattern(pattern.into())
    }

    pub fn audience(audience_id: impl Into<String>) -> Self {
        Self::Audience(audience_id.into())
    }

    pub(crate) fn to_value(&self) -> Value {
        let object = match self {
            Self::User(user) => user.to_object(),
            Self::List(list_id) => {
                let mut fields = BTreeMap::new();
                fields.insert("list_id", Value::String(list_id.clone()));
                TypedObject::from_parts(&LIST_RECIPIENT, fields)
            }
            Self::ListPattern(pattern) => {
                let mut fields = BTreeMap::new();
                fields.insert("list_pattern", Value::String(pattern.clone()));
                TypedObject::from_parts(&LIST_PATTERN_RECIPIENT, fields)
            }
            Self::Audience(audience_id) => {
                let mut fields = BTreeMap::new();
                fields.insert("audience_id", Value::String(audience_id.clone()));
                TypedObject::from_parts(&AUDIENCE_RECIPIENT, fields)
            }
        };
        Value::Object(object)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// The `to` field: one recipient or several.
pub enum To {
    Single(Recipient),
    Many(Vec<Recipient>),
}

impl To {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self::Single(Recipient::user(user_id))
    }

    pub fn list(list_id: impl Into<String>) -> Self {
        Self::Single(Recipient::list(list_id))
    }

    pub fn list_pattern(pattern: impl Into<String>) -> Self {
        Self::Single(Recipient::list_pattern(pattern))
    }

    pub fn audience(audience_id: impl Into<String>) -> Self {
        Self::Single(Recipient::audience(audience_id))
    }

    pub fn many(recipients: Vec<Recipient>) -> Self {
        Self::Many(recipients)
    }

    pub(crate) fn to_value(&self) -> Value {
        match self {
            Self::Single(recipient) => recipient.to_value(),
            Self::Many(recipients) => {
                Value::List(recipients.iter().map(Recipient::to_value).collect())
            }
        }
    }
}

impl From<Recipient> for To {
    fn from(recipient: Recipient) -> Self {
        Self::Single(recipient)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Inline title/body content ("content sugar").
pub struct Content {
    pub title: String,
    pub body: String,
}

impl Content {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    fn to_object(&self) -> TypedObject {
        let mut fields = BTreeMap::new();
        fields.insert("title", Value::String(self.title.clone()));
        fields.insert("body", Value::String(self.body.clone()));
        TypedObject::from_parts(&CONTENT, fields)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMethod {
    All,
    Single,
}

impl RoutingMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Single => "single",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "single" => Some(Self::Single),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Channel routing for a message.
pub struct Routing {
    /// Defaults to [`RoutingMethod::Single`] on the service when unset.
    pub method: Option<RoutingMethod>,
    pub channels: Vec<String>,
}

impl Routing {
    /// Create routing over the given channels.
    pub fn new(channels: Vec<String>) -> Result<Self, ValidationError> {
        if channels.is_empty() {
            return Err(ValidationError::Empty { field: "channels" });
        }
        Ok(Self {
            method: None,
            channels,
        })
    }

    pub fn method(mut self, method: RoutingMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Effective method, substituting the service-side default.
    pub fn method_or_default(&self) -> RoutingMethod {
        self.method.unwrap_or(RoutingMethod::Single)
    }

    fn to_object(&self) -> TypedObject {
        let mut fields = BTreeMap::new();
        if let Some(method) = self.method {
            fields.insert("method", Value::Enum(method.as_str()));
        }
        fields.insert(
            "channels",
            Value::List(
                self.channels
                    .iter()
                    .map(|channel| Value::String(channel.clone()))
                    .collect(),
            ),
        );
        TypedObject::from_parts(&ROUTING, fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// What to deliver: inline content or a stored template id. Exactly one is
/// required, enforced by the type.
pub enum MessageBody {
    Content(Content),
    Template(String),
}

impl MessageBody {
    pub fn content(content: Content) -> Self {
        Self::Content(content)
    }

    pub fn template(template_id: impl Into<String>) -> Self {
        Self::Template(template_id.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A message to send. Construct with [`Message::new`] and chain optional
/// settings.
pub struct Message {
    pub to: To,
    pub body: MessageBody,
    pub data: Option<serde_json::Value>,
    pub brand_id: Option<String>,
    pub routing: Option<Routing>,
    pub metadata: Option<serde_json::Value>,
}

impl Message {
    pub fn new(to: To, body: MessageBody) -> Self {
        Self {
            to,
            body,
            data: None,
            brand_id: None,
            routing: None,
            metadata: None,
        }
    }

    /// Template variables, an arbitrary JSON object.
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn brand_id(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }

    pub fn routing(mut self, routing: Routing) -> Self {
        self.routing = Some(routing);
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub(crate) fn to_object(&self) -> TypedObject {
        let mut fields = BTreeMap::new();
        fields.insert("to", self.to.to_value());
        match &self.body {
            MessageBody::Content(content) => {
                fields.insert("content", Value::Object(content.to_object()));
            }
            MessageBody::Template(template_id) => {
                fields.insert("template", Value::String(template_id.clone()));
            }
        }
        if let Some(data) = &self.data {
            fields.insert("data", Value::Json(data.clone()));
        }
        if let Some(brand_id) = &self.brand_id {
            fields.insert("brand_id", Value::String(brand_id.clone()));
        }
        if let Some(routing) = &self.routing {
            fields.insert("routing", Value::Object(routing.to_object()));
        }
        if let Some(metadata) = &self.metadata {
            fields.insert("metadata", Value::Json(metadata.clone()));
        }
        TypedObject::from_parts(&MESSAGE, fields)
    }

    /// Wrap into the `{"message": …}` request envelope.
    pub(crate) fn to_request_object(&self) -> TypedObject {
        let mut fields = BTreeMap::new();
        fields.insert("message", Value::Object(self.to_object()));
        TypedObject::from_parts(&SEND_REQUEST, fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Accepted-for-delivery acknowledgement.
pub struct SendMessageResponse(TypedObject);

impl SendMessageResponse {
    /// Id under which the send request was enqueued.
    pub fn request_id(&self) -> &str {
        self.0.expect_str("request_id")
    }
}

impl ApiModel for SendMessageResponse {
    fn spec() -> &'static ModelSpec {
        &SEND_RESPONSE
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
