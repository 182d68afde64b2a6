use crate::error::{ApiError, TransportError};
use crate::types::ErrorBody;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Issues JSON calls relative to the API root and hands back the parsed body.
///
/// Failures are already normalized: a structured `{ error: {code, message} }`
/// body becomes [`ApiError::Domain`], everything else is a
/// [`TransportError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, ApiError>;
    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError>;
}

/// Request stage. Runs on every outgoing request right before it is sent.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError>;
}

pub struct Passthrough;

impl RequestInterceptor for Passthrough {
    fn intercept(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        Ok(request)
    }
}

pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl RequestInterceptor for BearerAuth {
    fn intercept(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let value = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| TransportError::InvalidRequest(format!("authorization header: {e}")))?;
        Ok(request.header(AUTHORIZATION, value))
    }
}

// Thin wrapper around reqwest shared by every API call.
pub struct HttpTransport {
    http: Client,
    base_url: String,
    interceptor: Box<dyn RequestInterceptor>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            interceptor: Box::new(Passthrough),
        })
    }

    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptor = Box::new(interceptor);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "sending request");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let request = self.interceptor.intercept(request).inspect_err(|e| {
            warn!(%method, %url, "request rejected before sending: {}", e);
        })?;

        let response = request.send().await.map_err(|e| {
            warn!(%method, %url, timeout = e.is_timeout(), "request failed: {}", e);
            ApiError::from(e)
        })?;

        unwrap_response(response).await.inspect_err(|e| {
            warn!(%method, %url, "call failed: {}", e);
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.send(Method::POST, path, Some(body)).await
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

// Response stage: unwrap the body on success, pull out the nested error otherwise.
async fn unwrap_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(parse_body(&body));
    }
    Err(extract_error(status, body))
}

// Success bodies that are not JSON come back as a plain string.
fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

fn extract_error(status: StatusCode, body: String) -> ApiError {
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(ErrorEnvelope { error: Some(error) }) => ApiError::domain(error.code, error.message),
        _ => TransportError::Status { status, body }.into(),
    }
}
