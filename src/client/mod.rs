//! Client layer: orchestrates transport calls and maps wire payloads to
//! typed models through the codec.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::codec::{DecodeError, Decoder, encode};
use crate::domain::{
    ApiModel, Audience, AudienceListResponse, AudienceMemberListResponse, AudienceUpdate,
    AudienceUpdateResponse, Brand, BrandListResponse, GetProfileResponse, ListGetAllResponse,
    ListMessagesParams, Message, MessageDetails, MessageListResponse, ProfilePayload,
    ProfileUpdateResponse, SendMessageResponse, SubscriberList, Tenant, TenantListResponse,
    ValidationError, registry,
};

const DEFAULT_BASE_URL: &str = "https://api.courier.com";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone)]
struct HttpRequest {
    method: HttpMethod,
    url: Url,
    bearer: String,
    body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn send_request<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send_request<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(request.url),
                HttpMethod::Post => self.client.post(request.url),
                HttpMethod::Put => self.client.put(request.url),
                HttpMethod::Delete => self.client.delete(request.url),
            }
            .bearer_auth(&request.bearer);
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Bearer token for API authentication.
pub struct AuthToken(String);

impl AuthToken {
    /// Create a token, rejecting values that are empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: "auth_token",
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`CourierClient`].
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - response bodies that are not valid JSON,
/// - response bodies that are valid JSON but do not match the declared model.
pub enum CourierError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body could not be parsed as JSON.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// Response JSON does not match the declared response model.
    #[error("malformed response: {0}")]
    MalformedResponse(#[source] DecodeError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The configured base URL cannot carry path segments.
    #[error("invalid endpoint: {reason}")]
    InvalidEndpoint { reason: String },
}

#[derive(Debug, Clone)]
/// Builder for [`CourierClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct CourierClientBuilder {
    token: AuthToken,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl CourierClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent
    /// override.
    pub fn new(token: AuthToken) -> Self {
        Self {
            token,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`CourierClient`].
    pub fn build(self) -> Result<CourierClient, CourierError> {
        let base_url = Url::parse(&self.base_url).map_err(|err| CourierError::InvalidEndpoint {
            reason: err.to_string(),
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| CourierError::Transport(Box::new(err)))?;

        Ok(CourierClient {
            token: self.token,
            base_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level Courier REST client.
///
/// Every operation validates its typed request, encodes it through the model
/// descriptors, and decodes the response against the declared response
/// model. Paged list operations take an opaque cursor from the previous
/// response's paging block.
pub struct CourierClient {
    token: AuthToken,
    base_url: Url,
    http: Arc<dyn HttpTransport>,
}

impl CourierClient {
    /// Create a client against the default base URL.
    ///
    /// For more customization, use [`CourierClient::builder`].
    pub fn new(token: AuthToken) -> Self {
        Self {
            token,
            // Parsing the const default cannot fail.
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| {
                unreachable!("default base URL is valid")
            }),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(token: AuthToken) -> CourierClientBuilder {
        CourierClientBuilder::new(token)
    }

    /// Send a message for delivery.
    ///
    /// Errors:
    /// - [`CourierError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`CourierError::Parse`] / [`CourierError::MalformedResponse`] when
    ///   the response body is not the expected shape.
    pub async fn send(&self, message: &Message) -> Result<SendMessageResponse, CourierError> {
        let url = self.endpoint(&["send"], &[])?;
        let body = encode(&message.to_request_object());
        self.request_json(HttpMethod::Post, url, Some(body)).await
    }

    /// List sent messages, newest first, filtered by `params`.
    pub async fn list_messages(
        &self,
        params: &ListMessagesParams,
    ) -> Result<MessageListResponse, CourierError> {
        let url = self.endpoint(&["messages"], &params.query_pairs())?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// Fetch delivery status for one message.
    pub async fn get_message(&self, message_id: &str) -> Result<MessageDetails, CourierError> {
        let url = self.endpoint(&["messages", message_id], &[])?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// Fetch the stored profile for a user.
    pub async fn get_profile(&self, user_id: &str) -> Result<GetProfileResponse, CourierError> {
        let url = self.endpoint(&["profiles", user_id], &[])?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// Merge attributes into a user's profile, keeping unmentioned keys.
    pub async fn merge_profile(
        &self,
        user_id: &str,
        payload: &ProfilePayload,
    ) -> Result<ProfileUpdateResponse, CourierError> {
        let url = self.endpoint(&["profiles", user_id], &[])?;
        let body = encode(&payload.to_object());
        self.request_json(HttpMethod::Post, url, Some(body)).await
    }

    /// Replace a user's profile wholesale.
    pub async fn replace_profile(
        &self,
        user_id: &str,
        payload: &ProfilePayload,
    ) -> Result<ProfileUpdateResponse, CourierError> {
        let url = self.endpoint(&["profiles", user_id], &[])?;
        let body = encode(&payload.to_object());
        self.request_json(HttpMethod::Put, url, Some(body)).await
    }

    /// List audiences, one page per call.
    pub async fn list_audiences(
        &self,
        cursor: Option<&str>,
    ) -> Result<AudienceListResponse, CourierError> {
        let url = self.endpoint(&["audiences"], &cursor_pairs(cursor))?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// Fetch one audience by id.
    pub async fn get_audience(&self, audience_id: &str) -> Result<Audience, CourierError> {
        let url = self.endpoint(&["audiences", audience_id], &[])?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// Create or update an audience. The id is caller-chosen; membership is
    /// recomputed from the filter on update.
    pub async fn update_audience(
        &self,
        audience_id: &str,
        update: &AudienceUpdate,
    ) -> Result<AudienceUpdateResponse, CourierError> {
        let url = self.endpoint(&["audiences", audience_id], &[])?;
        let body = encode(&update.to_object());
        self.request_json(HttpMethod::Put, url, Some(body)).await
    }

    /// Delete an audience.
    pub async fn delete_audience(&self, audience_id: &str) -> Result<(), CourierError> {
        let url = self.endpoint(&["audiences", audience_id], &[])?;
        self.request_empty(HttpMethod::Delete, url).await
    }

    /// List the computed members of an audience, one page per call.
    pub async fn list_audience_members(
        &self,
        audience_id: &str,
        cursor: Option<&str>,
    ) -> Result<AudienceMemberListResponse, CourierError> {
        let url = self.endpoint(&["audiences", audience_id, "members"], &cursor_pairs(cursor))?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// List brands, one page per call.
    pub async fn list_brands(
        &self,
        cursor: Option<&str>,
    ) -> Result<BrandListResponse, CourierError> {
        let url = self.endpoint(&["brands"], &cursor_pairs(cursor))?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// Fetch one brand by id.
    pub async fn get_brand(&self, brand_id: &str) -> Result<Brand, CourierError> {
        let url = self.endpoint(&["brands", brand_id], &[])?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// List subscriber lists, one page per call.
    pub async fn get_lists(
        &self,
        cursor: Option<&str>,
    ) -> Result<ListGetAllResponse, CourierError> {
        let url = self.endpoint(&["lists"], &cursor_pairs(cursor))?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// Fetch one subscriber list by id.
    pub async fn get_list(&self, list_id: &str) -> Result<SubscriberList, CourierError> {
        let url = self.endpoint(&["lists", list_id], &[])?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// List tenants, one page per call.
    pub async fn list_tenants(
        &self,
        cursor: Option<&str>,
    ) -> Result<TenantListResponse, CourierError> {
        let url = self.endpoint(&["tenants"], &cursor_pairs(cursor))?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// Fetch one tenant by id.
    pub async fn get_tenant(&self, tenant_id: &str) -> Result<Tenant, CourierError> {
        let url = self.endpoint(&["tenants", tenant_id], &[])?;
        self.request_json(HttpMethod::Get, url, None).await
    }

    /// Build a resource URL under the base, with optional query pairs.
    fn endpoint(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<Url, CourierError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| CourierError::InvalidEndpoint {
                    reason: "base URL cannot carry path segments".to_owned(),
                })?;
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().cloned());
        }
        Ok(url)
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, CourierError> {
        let response = self
            .http
            .send_request(HttpRequest {
                method,
                url,
                bearer: self.token.as_str().to_owned(),
                body,
            })
            .await
            .map_err(CourierError::Transport)?;

        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(CourierError::HttpStatus {
                status: response.status,
                body,
            });
        }
        Ok(response)
    }

    async fn request_json<T: ApiModel>(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<T, CourierError> {
        let response = self.dispatch(method, url, body).await?;
        let json: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|err| CourierError::Parse(Box::new(err)))?;
        let object = Decoder::new(registry())
            .decode(T::spec().type_name, &json)
            .map_err(CourierError::MalformedResponse)?;
        Ok(T::from_object(object))
    }

    async fn request_empty(&self, method: HttpMethod, url: Url) -> Result<(), CourierError> {
        self.dispatch(method, url, None).await?;
        Ok(())
    }
}

fn cursor_pairs(cursor: Option<&str>) -> Vec<(&'static str, String)> {
    cursor
        .map(|cursor| vec![("cursor", cursor.to_owned())])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::domain::{Content, MessageBody, To};

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_request: Option<HttpRequest>,
        response_status: u16,
        response_body: String,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_request: None,
                    response_status,
                    response_body: response_body.into(),
                })),
            }
        }

        fn last_request(&self) -> HttpRequest {
            self.state
                .lock()
                .unwrap()
                .last_request
                .clone()
                .expect("no request recorded")
        }
    }

    impl HttpTransport for FakeTransport {
        fn send_request<'a>(
            &'a self,
            request: HttpRequest,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let (status, body) = {
                    let mut state = self.state.lock().unwrap();
                    state.last_request = Some(request);
                    (state.response_status, state.response_body.clone())
                };
                Ok(HttpResponse { status, body })
            })
        }
    }

    fn make_client(transport: FakeTransport) -> CourierClient {
        CourierClient {
            token: AuthToken::new("test_token").unwrap(),
            base_url: Url::parse("https://example.invalid").unwrap(),
            http: Arc::new(transport),
        }
    }

    fn make_message() -> Message {
        Message::new(
            To::user("user-123"),
            MessageBody::content(Content::new("Welcome", "Thanks for signing up!")),
        )
    }

    #[tokio::test]
    async fn send_posts_envelope_with_bearer_auth() {
        let transport = FakeTransport::new(200, r#"{"requestId": "req-42"}"#);
        let client = make_client(transport.clone());

        let response = client.send(&make_message()).await.unwrap();
        assert_eq!(response.request_id(), "req-42");

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url.as_str(), "https://example.invalid/send");
        assert_eq!(request.bearer, "test_token");
        assert_eq!(
            request.body,
            Some(json!({
                "message": {
                    "to": {"user_id": "user-123"},
                    "content": {"title": "Welcome", "body": "Thanks for signing up!"}
                }
            }))
        );
    }

    #[tokio::test]
    async fn list_messages_passes_filters_as_query() {
        let transport = FakeTransport::new(
            200,
            r#"{"paging": {"more": false}, "results": []}"#,
        );
        let client = make_client(transport.clone());

        let params = ListMessagesParams {
            cursor: Some("abc".to_owned()),
            status: Some(crate::domain::MessageStatus::Sent),
            ..Default::default()
        };
        let response = client.list_messages(&params).await.unwrap();
        assert!(!response.paging().more());
        assert!(response.results().is_empty());

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url.as_str(),
            "https://example.invalid/messages?cursor=abc&status=SENT"
        );
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn cursor_flows_through_list_endpoints() {
        let transport = FakeTransport::new(
            200,
            r#"{"paging": {"more": true, "cursor": "page-2"}, "items": []}"#,
        );
        let client = make_client(transport.clone());

        let response = client.list_audiences(None).await.unwrap();
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://example.invalid/audiences"
        );

        // The cursor from one page is passed back verbatim for the next.
        let cursor = response.paging().cursor().map(str::to_owned);
        client.list_audiences(cursor.as_deref()).await.unwrap();
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://example.invalid/audiences?cursor=page-2"
        );
    }

    #[tokio::test]
    async fn merge_and_replace_profile_differ_only_in_method() {
        let transport = FakeTransport::new(200, r#"{"status": "SUCCESS"}"#);
        let client = make_client(transport.clone());
        let payload = ProfilePayload::new(json!({"email": "ada@example.com"}));

        client.merge_profile("user-1", &payload).await.unwrap();
        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url.as_str(), "https://example.invalid/profiles/user-1");
        assert_eq!(
            request.body,
            Some(json!({"profile": {"email": "ada@example.com"}}))
        );

        client.replace_profile("user-1", &payload).await.unwrap();
        assert_eq!(transport.last_request().method, HttpMethod::Put);
    }

    #[tokio::test]
    async fn update_audience_puts_only_set_fields() {
        let transport = FakeTransport::new(
            200,
            r#"{"audience": {"id": "aud-1", "name": "Engineers"}}"#,
        );
        let client = make_client(transport.clone());

        let update = AudienceUpdate::new().name("Engineers");
        let response = client.update_audience("aud-1", &update).await.unwrap();
        assert_eq!(response.audience().id(), "aud-1");

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.url.as_str(), "https://example.invalid/audiences/aud-1");
        assert_eq!(request.body, Some(json!({"name": "Engineers"})));
    }

    #[tokio::test]
    async fn delete_audience_sends_no_body_and_ignores_the_response() {
        let transport = FakeTransport::new(204, "");
        let client = make_client(transport.clone());

        client.delete_audience("aud-1").await.unwrap();
        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url.as_str(), "https://example.invalid/audiences/aud-1");
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn nested_resource_path_is_built_in_order() {
        let transport = FakeTransport::new(
            200,
            r#"{"paging": {"more": false}, "items": []}"#,
        );
        let client = make_client(transport.clone());

        client
            .list_audience_members("aud-1", Some("c1"))
            .await
            .unwrap();
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://example.invalid/audiences/aud-1/members?cursor=c1"
        );
    }

    #[tokio::test]
    async fn non_success_status_maps_to_http_status_error() {
        let transport = FakeTransport::new(401, r#"{"message": "unauthorized"}"#);
        let client = make_client(transport);

        let err = client.get_brand("brand-1").await.unwrap_err();
        assert!(matches!(
            err,
            CourierError::HttpStatus {
                status: 401,
                body: Some(_)
            }
        ));
    }

    #[tokio::test]
    async fn empty_error_body_maps_to_none() {
        let transport = FakeTransport::new(503, "   ");
        let client = make_client(transport);

        let err = client.get_tenant("t1").await.unwrap_err();
        assert!(matches!(
            err,
            CourierError::HttpStatus {
                status: 503,
                body: None
            }
        ));
    }

    #[tokio::test]
    async fn invalid_json_maps_to_parse_error() {
        let transport = FakeTransport::new(200, "{ not json }");
        let client = make_client(transport);

        let err = client.send(&make_message()).await.unwrap_err();
        assert!(matches!(err, CourierError::Parse(_)));
    }

    #[tokio::test]
    async fn wrong_shape_maps_to_malformed_response() {
        // Valid JSON, but missing the required `requestId`.
        let transport = FakeTransport::new(200, r#"{"ok": true}"#);
        let client = make_client(transport);

        let err = client.send(&make_message()).await.unwrap_err();
        match err {
            CourierError::MalformedResponse(DecodeError::MissingRequiredField {
                field, ..
            }) => assert_eq!(field, "requestId"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn auth_token_rejects_blank_values() {
        assert!(AuthToken::new("   ").is_err());
        assert!(AuthToken::new("").is_err());
        assert_eq!(AuthToken::new("  tok  ").unwrap().as_str(), "tok");
    }

    #[test]
    fn builder_applies_base_url_override() {
        let client = CourierClient::builder(AuthToken::new("key").unwrap())
            .base_url("https://eu.example.invalid/api/")
            .timeout(Duration::from_secs(5))
            .user_agent("test-agent/1.0")
            .build()
            .unwrap();
        let url = client.endpoint(&["send"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://eu.example.invalid/api/send");

        assert!(matches!(
            CourierClient::builder(AuthToken::new("key").unwrap())
                .base_url("not a url")
                .build(),
            Err(CourierError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn default_base_url_is_used_by_new() {
        let client = CourierClient::new(AuthToken::new("key").unwrap());
        let url = client.endpoint(&["messages", "m-1"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.courier.com/messages/m-1");
    }
}
