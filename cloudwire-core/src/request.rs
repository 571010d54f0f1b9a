//! Transport request descriptor.
//!
//! [`SdkRequest`] is what a marshaller produces and what an HTTP execution
//! layer consumes: method, resource path, headers, query parameters, body,
//! and a reference back to the typed request it was built from.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use futures::stream::BoxStream;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::MarshallError;

/// Body of an outbound request.
#[derive(Default)]
pub enum RequestBody {
    /// Explicitly empty body.
    #[default]
    Empty,
    /// Fully buffered payload.
    Bytes(Bytes),
    /// Payload produced incrementally, e.g. an archive upload.
    Streaming(BoxStream<'static, Result<Bytes, std::io::Error>>),
}

impl RequestBody {
    /// Buffered bytes, if the body is not streamed. Empty bodies yield an
    /// empty slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RequestBody::Empty => Some(&[]),
            RequestBody::Bytes(bytes) => Some(bytes),
            RequestBody::Streaming(_) => None,
        }
    }

    /// Whether the body is streamed.
    pub fn is_streaming(&self) -> bool {
        matches!(self, RequestBody::Streaming(_))
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            RequestBody::Streaming(_) => f.write_str("Streaming"),
        }
    }
}

/// One outbound call, produced fresh by every marshall.
///
/// Headers have unique names (last write wins); query parameters form a
/// multimap kept in name order.
pub struct SdkRequest<'a, I> {
    service_name: &'static str,
    operation: &'static str,
    method: Method,
    resource_path: String,
    headers: HeaderMap,
    parameters: BTreeMap<String, Vec<String>>,
    body: RequestBody,
    original: &'a I,
}

impl<'a, I> SdkRequest<'a, I> {
    /// Create an empty `POST /` descriptor for `operation` of `service_name`.
    pub fn new(service_name: &'static str, operation: &'static str, original: &'a I) -> Self {
        Self {
            service_name,
            operation,
            method: Method::POST,
            resource_path: String::new(),
            headers: HeaderMap::new(),
            parameters: BTreeMap::new(),
            body: RequestBody::Empty,
            original,
        }
    }

    /// Service namespace (also used as the metrics namespace).
    pub fn service_name(&self) -> &'static str {
        self.service_name
    }

    /// Operation name, for routing and tracing.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// The typed request this descriptor was built from.
    pub fn original_request(&self) -> &'a I {
        self.original
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Replace the HTTP method.
    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    /// Resource path after template resolution. Empty means `/`.
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// Replace the resource path.
    pub fn set_resource_path(&mut self, path: impl Into<String>) {
        self.resource_path = path.into();
    }

    /// All headers set so far.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set a header, replacing any previous value.
    pub fn add_header(&mut self, name: &'static str, value: &str) -> Result<(), MarshallError> {
        let value = HeaderValue::from_str(value)
            .map_err(|source| MarshallError::InvalidHeader { name, source })?;
        self.headers.insert(HeaderName::from_static(name), value);
        Ok(())
    }

    /// Query parameters by name, values in insertion order.
    pub fn parameters(&self) -> &BTreeMap<String, Vec<String>> {
        &self.parameters
    }

    /// Append a query parameter value.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// The request body.
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Take the body, leaving [`RequestBody::Empty`] behind.
    pub fn take_body(&mut self) -> RequestBody {
        std::mem::take(&mut self.body)
    }

    /// Set a buffered body and its `Content-Length`.
    pub fn set_content(&mut self, content: Bytes) {
        self.headers
            .insert(CONTENT_LENGTH, HeaderValue::from(content.len()));
        self.body = RequestBody::Bytes(content);
    }

    /// Set an explicitly empty body with `Content-Length: 0`.
    pub fn set_empty_content(&mut self) {
        self.headers.insert(CONTENT_LENGTH, HeaderValue::from(0u32));
        self.body = RequestBody::Empty;
    }

    /// Set a streamed body. `Content-Length` is only set when known.
    pub fn set_streaming_content(
        &mut self,
        content: BoxStream<'static, Result<Bytes, std::io::Error>>,
        content_length: Option<u64>,
    ) {
        match content_length {
            Some(len) => {
                self.headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
            }
            None => {
                self.headers.remove(CONTENT_LENGTH);
            }
        }
        self.body = RequestBody::Streaming(content);
    }

    /// The `Content-Type` header, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Query parameters as an RFC 3986 encoded string, in name order.
    pub fn query_string(&self) -> String {
        let mut query = String::new();
        for (name, values) in &self.parameters {
            for value in values {
                if !query.is_empty() {
                    query.push('&');
                }
                query.extend(utf8_percent_encode(name, QUERY_ENCODE_SET));
                query.push('=');
                query.extend(utf8_percent_encode(value, QUERY_ENCODE_SET));
            }
        }
        query
    }

    /// Join the resource path and query string onto `endpoint`.
    pub fn to_uri(&self, endpoint: &str) -> Result<Url, MarshallError> {
        let base = Url::parse(endpoint)
            .map_err(|e| MarshallError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        let mut path = base.path().trim_end_matches('/').to_string();
        let resource = self.resource_path.trim_start_matches('/');
        path.push('/');
        path.push_str(resource);

        let mut url = base;
        url.set_path(&path);
        let query = self.query_string();
        url.set_query((!query.is_empty()).then_some(query.as_str()));
        Ok(url)
    }

    /// Build a buffered [`http::Request`] against `endpoint`.
    ///
    /// Fails with [`MarshallError::StreamingBody`] when the body is streamed.
    pub fn into_http_request(self, endpoint: &str) -> Result<http::Request<Bytes>, MarshallError> {
        let url = self.to_uri(endpoint)?;
        let body = match self.body {
            RequestBody::Empty => Bytes::new(),
            RequestBody::Bytes(bytes) => bytes,
            RequestBody::Streaming(_) => return Err(MarshallError::StreamingBody),
        };

        let mut request = http::Request::builder()
            .method(self.method)
            .uri(url.as_str())
            .body(body)
            .map_err(|e| MarshallError::InvalidEndpoint(e.to_string()))?;
        *request.headers_mut() = self.headers;
        Ok(request)
    }
}

impl<I> fmt::Debug for SdkRequest<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkRequest")
            .field("service_name", &self.service_name)
            .field("operation", &self.operation)
            .field("method", &self.method)
            .field("resource_path", &self.resource_path)
            .field("headers", &self.headers)
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish()
    }
}

/// Everything except RFC 3986 unreserved characters.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');
