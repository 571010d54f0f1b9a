//! Error response parsing for JSON services.
//!
//! JSON services report failures with a non-2xx status and a body like:
//! ```json
//! {
//!   "__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException",
//!   "message": "Requested resource not found"
//! }
//! ```
//!
//! Some services also (or only) send the code in the `x-amzn-ErrorType`
//! header, e.g. `ResourceNotFoundException:http://internal.amazon.com/...`,
//! or in a plain `code` body field. The header wins when present.
//!
//! Classification is a per-error-kind lookup: each [`ErrorMatcher`] claims a
//! response by code and [`classify`] picks the first one that does.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::Deserialize;

use crate::{ClientError, ServiceError};

/// Header carrying the error code.
pub const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-amzn-requestid";

/// A parsed error response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonErrorResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Error code, from the header or the body. `None` when neither carried one.
    pub error_code: Option<String>,
    /// Error message from `message` or `Message`.
    pub message: Option<String>,
    /// Request id from `x-amzn-RequestId`.
    pub request_id: Option<String>,
}

/// JSON structure for error bodies.
#[derive(Deserialize)]
struct ErrorBodyJson {
    #[serde(rename = "__type", default)]
    type_name: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

impl JsonErrorResponse {
    /// Parse an error response.
    ///
    /// A body that is not a JSON object does not fail the parse; the code then
    /// comes from the header alone and the message is absent.
    pub fn parse(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<ErrorBodyJson>(body).ok();

        let header_code = header_value(headers, ERROR_TYPE_HEADER)
            .map(code_from_header)
            .filter(|code| !code.is_empty());
        let body_code = parsed
            .as_ref()
            .and_then(|b| b.type_name.as_deref().or(b.code.as_deref()))
            .map(code_from_type)
            .filter(|code| !code.is_empty());

        Self {
            status,
            error_code: header_code.or(body_code).map(str::to_owned),
            message: parsed.and_then(|b| b.message),
            request_id: header_value(headers, REQUEST_ID_HEADER).map(str::to_owned),
        }
    }

    /// Parse a buffered HTTP response.
    pub fn from_http_response(response: &http::Response<Bytes>) -> Self {
        Self::parse(response.status(), response.headers(), response.body())
    }

    /// Build the [`ServiceError`] for this response under `code`.
    pub fn to_service_error(&self, code: &str, service_name: &str) -> ServiceError {
        ServiceError {
            code: code.to_string(),
            message: self.message.clone(),
            status: self.status,
            request_id: self.request_id.clone(),
            error_type: crate::ErrorType::from_status(self.status),
            service_name: service_name.to_string(),
        }
    }
}

fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// `Code:http://...` -> `Code`.
fn code_from_header(value: &str) -> &str {
    value.split(':').next().unwrap_or(value).trim()
}

/// `namespace#Code` -> `Code`.
fn code_from_type(value: &str) -> &str {
    value.rsplit('#').next().unwrap_or(value).trim()
}

/// Capability of recognising one kind of service error.
pub trait ErrorMatcher: Send + Sync {
    /// The error code this matcher claims.
    fn error_code(&self) -> &str;

    /// Whether this matcher claims `response`.
    fn matches(&self, response: &JsonErrorResponse) -> bool {
        response.error_code.as_deref() == Some(self.error_code())
    }

    /// Build the error for a claimed response.
    fn to_error(&self, response: &JsonErrorResponse, service_name: &str) -> ServiceError {
        response.to_service_error(self.error_code(), service_name)
    }
}

/// Matcher for one modelled error shape, identified by its code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorShape {
    code: &'static str,
}

impl ErrorShape {
    /// A matcher claiming responses whose error code is `code`.
    pub const fn new(code: &'static str) -> Self {
        Self { code }
    }
}

impl ErrorMatcher for ErrorShape {
    fn error_code(&self) -> &str {
        self.code
    }
}

/// Classify an error response.
///
/// The first matcher claiming the response decides the error. Unclaimed
/// responses become a generic service error carrying the raw code, or the
/// status reason when there is no code at all.
pub fn classify(
    response: &JsonErrorResponse,
    matchers: &[&dyn ErrorMatcher],
    service_name: &str,
) -> ClientError {
    let error = match matchers.iter().find(|m| m.matches(response)) {
        Some(matcher) => matcher.to_error(response, service_name),
        None => {
            let code = response
                .error_code
                .as_deref()
                .or_else(|| response.status.canonical_reason())
                .unwrap_or("Unknown");
            response.to_service_error(code, service_name)
        }
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        service = service_name,
        status = response.status.as_u16(),
        code = %error.code,
        request_id = ?response.request_id,
        "classified service error"
    );

    error.into()
}
