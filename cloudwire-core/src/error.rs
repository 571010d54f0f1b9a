//! Wire-level error types.
//!
//! This module provides the two failure kinds raised by the core contract:
//! - [`MarshallError`]: Failures while turning a typed request into an
//!   [`SdkRequest`](crate::SdkRequest)
//! - [`ParseError`]: Failures while walking a response token stream

use crate::json::JsonToken;

/// Errors raised while marshalling a request.
///
/// Lower-level serializer failures never escape in their native form: they
/// are wrapped into [`MarshallError::Serialization`] with the original error
/// kept as the source.
#[derive(Debug, thiserror::Error)]
pub enum MarshallError {
    /// The request value was absent or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request body could not be serialized.
    #[error("unable to marshall request to JSON: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A header value contained characters not allowed in HTTP headers.
    #[error("invalid value for header {name}")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: http::header::InvalidHeaderValue,
    },

    /// The endpoint or resolved path did not form a valid URI.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A streaming body cannot be converted into a buffered HTTP request.
    #[error("request body is streamed and cannot be buffered")]
    StreamingBody,
}

impl MarshallError {
    /// Create the error returned when a marshaller receives no request.
    pub fn null_request(operation: &str) -> Self {
        MarshallError::InvalidArgument(format!(
            "Invalid argument passed to marshall({operation}): request must not be absent"
        ))
    }
}

impl From<serde_json::Error> for MarshallError {
    fn from(err: serde_json::Error) -> Self {
        MarshallError::Serialization(err)
    }
}

/// Errors raised while walking a response token stream.
///
/// Unmarshallers perform no semantic validation; these errors only signal a
/// body that is not well-formed or a scalar whose token type does not match
/// the shape being read.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The body is not valid JSON.
    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// A token of the wrong kind was found.
    #[error("unexpected token {found} while reading {expected}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    /// The token stream ended inside an open object or array.
    #[error("unexpected end of token stream while reading {0}")]
    UnexpectedEnd(&'static str),

    /// A scalar token could not be converted to the requested type.
    #[error("invalid {expected} value: {value}")]
    InvalidValue {
        expected: &'static str,
        value: String,
    },
}

impl ParseError {
    /// A token of the wrong type was found while reading `expected`.
    pub fn unexpected(expected: &'static str, found: &JsonToken) -> Self {
        ParseError::UnexpectedToken {
            expected,
            found: found.describe(),
        }
    }

    /// A scalar token could not be converted to `expected`.
    pub fn invalid(expected: &'static str, value: impl Into<String>) -> Self {
        ParseError::InvalidValue {
            expected,
            value: value.into(),
        }
    }
}
