//! Client plumbing and sample service bindings for cloudwire.
//!
//! This crate sits on top of `cloudwire-core` and provides what every
//! service binding shares: client configuration and retry behavior,
//! credentials, throughput metric naming, and classification of service
//! error responses. It also carries three sample services:
//!
//! - [`dynamodb`]: RPC-style JSON 1.0, routed by `X-Amz-Target`
//! - [`elastictranscoder`]: REST-style JSON with path and query templates
//! - [`glacier`]: binary upload with header-bound request and result fields
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use cloudwire_client::dynamodb::{self, DescribeTableMarshaller, DescribeTableRequest, DescribeTableResultUnmarshaller};
//! use cloudwire_core::Marshaller;
//!
//! let input = DescribeTableRequest { table_name: Some("users".into()) };
//! let request = DescribeTableMarshaller.marshall(&input)?
//!     .into_http_request("https://dynamodb.us-east-1.amazonaws.com")?;
//! assert_eq!(request.uri(), "https://dynamodb.us-east-1.amazonaws.com/");
//!
//! // Hand `request` to an HTTP client, then decode what comes back:
//! let response = http::Response::builder()
//!     .status(200)
//!     .body(Bytes::from_static(br#"{"Table":{"TableName":"users","ItemCount":3}}"#))?;
//! let result = dynamodb::handle(&DescribeTableResultUnmarshaller, response)?;
//! assert_eq!(result.table.and_then(|t| t.item_count), Some(3));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Retries
//!
//! ```ignore
//! use cloudwire_client::{ClientConfiguration, dynamodb, retry};
//!
//! let config = ClientConfiguration::new().max_error_retry(5);
//!
//! let result = retry(&config, Some(&dynamodb::retry_policy()), || async {
//!     let response = transport.send(DescribeTableMarshaller.marshall(&input)?.into_http_request(endpoint)?).await?;
//!     dynamodb::handle(&DescribeTableResultUnmarshaller, response)
//! }).await?;
//! ```

mod config;
mod credentials;
mod error;
pub mod error_parser;
mod metrics;
pub mod services;

pub use config::{
    ClientConfiguration, Protocol, RetryPolicy, client_defaults, defaults, retry,
    retry_with_policy,
};
pub use credentials::{
    AnonymousCredentials, BasicCredentials, Credentials, EnvironmentCredentials, should_sign,
};
pub use error::{ClientError, ErrorType, ServiceError};
pub use error_parser::{ErrorMatcher, ErrorShape, JsonErrorResponse, classify};
pub use metrics::{S3_SERVICE_NAME, ThroughputMetricType, guess_throughput_metric_type};
pub use services::{dynamodb, elastictranscoder, glacier, handle_response};

// Re-export the core contract
pub use cloudwire_core;
