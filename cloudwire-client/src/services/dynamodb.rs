//! Amazon DynamoDB (API version 2012-08-10).
//!
//! RPC-style JSON 1.0 service: every operation is `POST /` routed by
//! `X-Amz-Target: DynamoDB_20120810.<Operation>`.
//!
//! # Example
//!
//! ```
//! use cloudwire_client::dynamodb::{DescribeTableMarshaller, DescribeTableRequest};
//! use cloudwire_core::Marshaller;
//!
//! let input = DescribeTableRequest { table_name: Some("users".into()) };
//! let request = DescribeTableMarshaller.marshall(&input)?;
//!
//! assert_eq!(request.header("x-amz-target"), Some("DynamoDB_20120810.DescribeTable"));
//! assert_eq!(request.body().as_bytes(), Some(&br#"{"TableName":"users"}"#[..]));
//! # Ok::<(), cloudwire_core::MarshallError>(())
//! ```

mod model;
mod unmarshall;

pub use model::*;
pub use unmarshall::*;

use bytes::Bytes;
use cloudwire_core::{ContentType, MarshallError, Marshaller, Operation, SdkRequest, Unmarshaller};

use super::{handle_response, json_request};
use crate::error_parser::{ErrorMatcher, ErrorShape};
use crate::{ClientError, RetryPolicy};

/// Service namespace.
pub const SERVICE_NAME: &str = "AmazonDynamoDBv2";

const CREATE_TABLE: Operation = Operation::json_rpc(
    SERVICE_NAME,
    "CreateTable",
    "DynamoDB_20120810.CreateTable",
    ContentType::AmzJson10,
);
const DESCRIBE_TABLE: Operation = Operation::json_rpc(
    SERVICE_NAME,
    "DescribeTable",
    "DynamoDB_20120810.DescribeTable",
    ContentType::AmzJson10,
);
const GET_ITEM: Operation = Operation::json_rpc(
    SERVICE_NAME,
    "GetItem",
    "DynamoDB_20120810.GetItem",
    ContentType::AmzJson10,
);
const PUT_ITEM: Operation = Operation::json_rpc(
    SERVICE_NAME,
    "PutItem",
    "DynamoDB_20120810.PutItem",
    ContentType::AmzJson10,
);
const LIST_TABLES: Operation = Operation::json_rpc(
    SERVICE_NAME,
    "ListTables",
    "DynamoDB_20120810.ListTables",
    ContentType::AmzJson10,
);

pub const CONDITIONAL_CHECK_FAILED: ErrorShape =
    ErrorShape::new("ConditionalCheckFailedException");
pub const INTERNAL_SERVER_ERROR: ErrorShape = ErrorShape::new("InternalServerError");
pub const ITEM_COLLECTION_SIZE_LIMIT_EXCEEDED: ErrorShape =
    ErrorShape::new("ItemCollectionSizeLimitExceededException");
pub const LIMIT_EXCEEDED: ErrorShape = ErrorShape::new("LimitExceededException");
pub const PROVISIONED_THROUGHPUT_EXCEEDED: ErrorShape =
    ErrorShape::new("ProvisionedThroughputExceededException");
pub const RESOURCE_IN_USE: ErrorShape = ErrorShape::new("ResourceInUseException");
pub const RESOURCE_NOT_FOUND: ErrorShape = ErrorShape::new("ResourceNotFoundException");

/// Error shapes DynamoDB documents.
pub static ERRORS: &[&dyn ErrorMatcher] = &[
    &CONDITIONAL_CHECK_FAILED,
    &INTERNAL_SERVER_ERROR,
    &ITEM_COLLECTION_SIZE_LIMIT_EXCEEDED,
    &LIMIT_EXCEEDED,
    &PROVISIONED_THROUGHPUT_EXCEEDED,
    &RESOURCE_IN_USE,
    &RESOURCE_NOT_FOUND,
];

/// Default retry policy for DynamoDB calls.
pub fn retry_policy() -> RetryPolicy {
    RetryPolicy::dynamodb()
}

/// Unmarshall a DynamoDB response, classifying error responses.
pub fn handle<U>(unmarshaller: &U, response: http::Response<Bytes>) -> Result<U::Output, ClientError>
where
    U: Unmarshaller,
    U::Output: Default,
{
    handle_response(unmarshaller, response, ERRORS, SERVICE_NAME)
}

pub struct CreateTableMarshaller;

impl Marshaller<CreateTableRequest> for CreateTableMarshaller {
    fn marshall<'a>(
        &self,
        input: &'a CreateTableRequest,
    ) -> Result<SdkRequest<'a, CreateTableRequest>, MarshallError> {
        json_request(&CREATE_TABLE, input)
    }
}

pub struct DescribeTableMarshaller;

impl Marshaller<DescribeTableRequest> for DescribeTableMarshaller {
    fn marshall<'a>(
        &self,
        input: &'a DescribeTableRequest,
    ) -> Result<SdkRequest<'a, DescribeTableRequest>, MarshallError> {
        json_request(&DESCRIBE_TABLE, input)
    }
}

pub struct GetItemMarshaller;

impl Marshaller<GetItemRequest> for GetItemMarshaller {
    fn marshall<'a>(
        &self,
        input: &'a GetItemRequest,
    ) -> Result<SdkRequest<'a, GetItemRequest>, MarshallError> {
        json_request(&GET_ITEM, input)
    }
}

pub struct PutItemMarshaller;

impl Marshaller<PutItemRequest> for PutItemMarshaller {
    fn marshall<'a>(
        &self,
        input: &'a PutItemRequest,
    ) -> Result<SdkRequest<'a, PutItemRequest>, MarshallError> {
        json_request(&PUT_ITEM, input)
    }
}

pub struct ListTablesMarshaller;

impl Marshaller<ListTablesRequest> for ListTablesMarshaller {
    fn marshall<'a>(
        &self,
        input: &'a ListTablesRequest,
    ) -> Result<SdkRequest<'a, ListTablesRequest>, MarshallError> {
        json_request(&LIST_TABLES, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use std::collections::HashMap;

    fn body_of<I>(request: &SdkRequest<'_, I>) -> String {
        String::from_utf8(request.body().as_bytes().unwrap().to_vec()).unwrap()
    }

    #[test]
    fn test_rpc_headers() {
        let input = ListTablesRequest::default();
        let request = ListTablesMarshaller.marshall(&input).unwrap();
        assert_eq!(*request.method(), Method::POST);
        assert_eq!(request.resource_path(), "/");
        assert_eq!(request.service_name(), "AmazonDynamoDBv2");
        assert_eq!(request.header("x-amz-target"), Some("DynamoDB_20120810.ListTables"));
        assert_eq!(request.content_type(), Some("application/x-amz-json-1.0"));
        assert_eq!(body_of(&request), "{}");
        assert_eq!(request.header("content-length"), Some("2"));
    }

    #[test]
    fn test_create_table_body() {
        let input = CreateTableRequest {
            table_name: Some("users".into()),
            key_schema: Some(vec![KeySchemaElement {
                attribute_name: Some("id".into()),
                key_type: Some("HASH".into()),
            }]),
            attribute_definitions: Some(vec![]),
            provisioned_throughput: Some(ProvisionedThroughput {
                read_capacity_units: Some(5),
                write_capacity_units: None,
            }),
        };
        let request = CreateTableMarshaller.marshall(&input).unwrap();
        assert_eq!(
            body_of(&request),
            r#"{"AttributeDefinitions":[],"TableName":"users","KeySchema":[{"AttributeName":"id","KeyType":"HASH"}],"ProvisionedThroughput":{"ReadCapacityUnits":5}}"#
        );
        assert!(std::ptr::eq(request.original_request(), &input));
    }

    #[test]
    fn test_get_item_key_with_binary() {
        let input = GetItemRequest {
            table_name: Some("files".into()),
            key: Some(HashMap::from([(
                "hash".to_string(),
                AttributeValue::binary(&b"\x01\x02\x03\x04"[..]),
            )])),
            consistent_read: Some(true),
            ..Default::default()
        };
        let request = GetItemMarshaller.marshall(&input).unwrap();
        assert_eq!(
            body_of(&request),
            r#"{"TableName":"files","Key":{"hash":{"B":"AQIDBA=="}},"ConsistentRead":true}"#
        );
    }

    #[test]
    fn test_absent_request() {
        let err = PutItemMarshaller.marshall_opt(None).unwrap_err();
        assert!(matches!(err, MarshallError::InvalidArgument(_)));
    }

    #[test]
    fn test_handle_success() {
        let response = http::Response::builder()
            .status(StatusCode::OK)
            .body(Bytes::from_static(br#"{"TableNames":["a"]}"#))
            .unwrap();
        let result = handle(&ListTablesResultUnmarshaller, response).unwrap();
        assert_eq!(result.table_names, Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_handle_error_response() {
        let response = http::Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header("x-amzn-RequestId", "REQ9")
            .body(Bytes::from_static(
                br#"{"__type":"com.amazonaws.dynamodb.v20120810#ItemCollectionSizeLimitExceededException","message":"too big"}"#,
            ))
            .unwrap();
        let err = handle(&PutItemResultUnmarshaller, response).unwrap_err();
        let service = err.service_error().unwrap();
        assert_eq!(service.code, "ItemCollectionSizeLimitExceededException");
        assert_eq!(service.request_id.as_deref(), Some("REQ9"));
        assert_eq!(service.service_name, SERVICE_NAME);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_internal_server_error_is_retryable() {
        let response = http::Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(Bytes::from_static(
                br#"{"__type":"com.amazon.coral.service#InternalServerError"}"#,
            ))
            .unwrap();
        let err = handle(&GetItemResultUnmarshaller, response).unwrap_err();
        assert_eq!(err.code(), Some("InternalServerError"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_limit_exceeded_is_not_retried() {
        let response = http::Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .body(Bytes::from_static(
                br#"{"__type":"com.amazonaws.dynamodb.v20120810#LimitExceededException","message":"Too many tables"}"#,
            ))
            .unwrap();
        let err = handle(&CreateTableResultUnmarshaller, response).unwrap_err();
        assert_eq!(err.code(), Some("LimitExceededException"));
        assert!(!err.is_throttling());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retry_policy() {
        assert_eq!(retry_policy().max_retries, 10);
    }
}
