//! Client-side error types.
//!
//! This module provides [`ClientError`], the error type returned by service
//! operations, and [`ServiceError`], the structured form of an error response
//! sent back by a service.

use cloudwire_core::{MarshallError, ParseError};
use http::StatusCode;

/// Error codes that signal request throttling.
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "ProvisionedThroughputExceededException",
    "RequestLimitExceeded",
    "RequestThrottled",
    "RequestThrottledException",
    "SlowDown",
    "TooManyRequestsException",
    "PriorRequestNotComplete",
    "TransactionInProgressException",
    "BandwidthLimitExceeded",
];

/// Which party a service blamed for an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorType {
    /// The request was rejected (4xx).
    Client,
    /// The service failed to process a valid request (5xx).
    Service,
    /// No status was available.
    #[default]
    Unknown,
}

impl ErrorType {
    /// Derive the error type from an HTTP status.
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_client_error() {
            ErrorType::Client
        } else if status.is_server_error() {
            ErrorType::Service
        } else {
            ErrorType::Unknown
        }
    }
}

/// An error response returned by a service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceError {
    /// Error code, e.g. `ResourceNotFoundException`.
    pub code: String,
    /// Human readable message, when the service sent one.
    pub message: Option<String>,
    /// HTTP status of the error response.
    pub status: StatusCode,
    /// Value of the `x-amzn-RequestId` header.
    pub request_id: Option<String>,
    /// Which party the service blamed.
    pub error_type: ErrorType,
    /// Service that returned the error.
    pub service_name: String,
}

impl ServiceError {
    /// Create a service error with the error type derived from `status`.
    pub fn new<S: Into<String>>(code: S, status: StatusCode) -> Self {
        Self {
            code: code.into(),
            message: None,
            status,
            request_id: None,
            error_type: ErrorType::from_status(status),
            service_name: String::new(),
        }
    }

    /// Set the message.
    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the request id.
    pub fn with_request_id<S: Into<String>>(mut self, request_id: S) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Set the service name.
    pub fn with_service_name<S: Into<String>>(mut self, service_name: S) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Whether the code is a known throttling code.
    pub fn is_throttling(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS
            || THROTTLING_CODES.contains(&self.code.as_str())
    }

    /// Throttled requests and 5xx responses are safe to retry.
    pub fn is_retryable(&self) -> bool {
        self.is_throttling() || self.status.is_server_error()
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (Service: {}; Status Code: {}; Error Code: {}; Request ID: {})",
            self.message.as_deref().unwrap_or("no message"),
            self.service_name,
            self.status.as_u16(),
            self.code,
            self.request_id.as_deref().unwrap_or("none"),
        )
    }
}

impl std::error::Error for ServiceError {}

/// Client-side error variants.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A caller-supplied value was unusable before any request was built.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request could not be marshalled.
    #[error(transparent)]
    Marshall(#[from] MarshallError),

    /// The response body could not be parsed.
    #[error("unable to unmarshall response: {0}")]
    Parse(#[from] ParseError),

    /// The service returned an error response.
    #[error("{0}")]
    Service(Box<ServiceError>),

    /// Transport-level error (connection failed, timeout, etc.).
    #[error("transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// Create an invalid argument error.
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        ClientError::InvalidArgument(message.into())
    }

    /// Create a transport error.
    pub fn transport<S: Into<String>>(message: S) -> Self {
        ClientError::Transport(message.into())
    }

    /// The service error, if this is one.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            ClientError::Service(err) => Some(err),
            _ => None,
        }
    }

    /// The service error code, if this is a service error.
    pub fn code(&self) -> Option<&str> {
        self.service_error().map(|err| err.code.as_str())
    }

    /// Whether the service throttled this call.
    pub fn is_throttling(&self) -> bool {
        self.service_error().is_some_and(ServiceError::is_throttling)
    }

    /// Returns whether this error indicates a transient condition that may
    /// be resolved by retrying.
    ///
    /// # Example
    ///
    /// ```
    /// use cloudwire_client::{ClientError, ServiceError};
    /// use http::StatusCode;
    ///
    /// let err = ClientError::from(ServiceError::new("ThrottlingException", StatusCode::BAD_REQUEST));
    /// assert!(err.is_retryable());
    ///
    /// let err = ClientError::from(ServiceError::new("ResourceNotFoundException", StatusCode::BAD_REQUEST));
    /// assert!(!err.is_retryable());
    ///
    /// // Transport errors are also retryable
    /// let err = ClientError::transport("connection reset");
    /// assert!(err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Service(err) => err.is_retryable(),
            ClientError::Transport(_) => true,
            _ => false,
        }
    }
}

impl From<ServiceError> for ClientError {
    fn from(err: ServiceError) -> Self {
        ClientError::Service(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_type_from_status() {
        assert_eq!(ErrorType::from_status(StatusCode::BAD_REQUEST), ErrorType::Client);
        assert_eq!(
            ErrorType::from_status(StatusCode::SERVICE_UNAVAILABLE),
            ErrorType::Service
        );
        assert_eq!(ErrorType::from_status(StatusCode::OK), ErrorType::Unknown);
    }

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::new("ResourceNotFoundException", StatusCode::BAD_REQUEST)
            .with_message("Requested resource not found")
            .with_request_id("REQ1")
            .with_service_name("AmazonDynamoDBv2");
        assert_eq!(
            err.to_string(),
            "Requested resource not found (Service: AmazonDynamoDBv2; Status Code: 400; \
             Error Code: ResourceNotFoundException; Request ID: REQ1)"
        );
    }

    #[test]
    fn test_client_error_code() {
        let err = ClientError::from(ServiceError::new("ValidationException", StatusCode::BAD_REQUEST));
        assert_eq!(err.code(), Some("ValidationException"));
        assert!(ClientError::transport("reset").code().is_none());
    }

    #[test]
    fn test_client_error_is_retryable() {
        // Throttling codes and 5xx service errors
        assert!(
            ClientError::from(ServiceError::new(
                "ProvisionedThroughputExceededException",
                StatusCode::BAD_REQUEST
            ))
            .is_retryable()
        );
        assert!(
            ClientError::from(ServiceError::new(
                "InternalServerError",
                StatusCode::INTERNAL_SERVER_ERROR
            ))
            .is_retryable()
        );
        assert!(
            ClientError::from(ServiceError::new("Whatever", StatusCode::TOO_MANY_REQUESTS))
                .is_retryable()
        );

        // Client errors that are not throttling
        let quota = ClientError::from(ServiceError::new(
            "LimitExceededException",
            StatusCode::BAD_REQUEST,
        ));
        assert!(!quota.is_throttling());
        assert!(!quota.is_retryable());
        assert!(
            !ClientError::from(ServiceError::new("ValidationException", StatusCode::BAD_REQUEST))
                .is_retryable()
        );

        // Transport errors are retryable, local failures are not
        assert!(ClientError::transport("connection reset").is_retryable());
        assert!(!ClientError::invalid_argument("bad input").is_retryable());
        assert!(!ClientError::from(MarshallError::StreamingBody).is_retryable());
        assert!(!ClientError::from(ParseError::UnexpectedEnd("object")).is_retryable());
    }
}
