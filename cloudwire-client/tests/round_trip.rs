//! End-to-end marshall / unmarshall behavior across the sample services.

use std::collections::HashMap;

use bytes::Bytes;
use cloudwire_client::dynamodb::{
    AttributeDefinition, AttributeValue, CreateTableMarshaller, CreateTableRequest,
    CreateTableResultUnmarshaller, DescribeTableResultUnmarshaller, GetItemResultUnmarshaller,
    KeySchemaElement, ListTablesMarshaller, ListTablesRequest, ProvisionedThroughput,
    PutItemMarshaller, PutItemRequest,
};
use cloudwire_client::elastictranscoder::{ReadPipelineMarshaller, ReadPipelineRequest};
use cloudwire_client::{ClientError, RetryPolicy, dynamodb, retry_with_policy};
use cloudwire_core::{Marshaller, ParseContext, UriTemplate, Unmarshaller};
use http::StatusCode;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn ok_response(body: Vec<u8>) -> http::Response<Bytes> {
    http::Response::builder()
        .status(StatusCode::OK)
        .body(Bytes::from(body))
        .unwrap()
}

fn body_json<I>(request: &cloudwire_core::SdkRequest<'_, I>) -> serde_json::Value {
    serde_json::from_slice(request.body().as_bytes().unwrap()).unwrap()
}

#[test]
fn item_survives_put_then_get() {
    init_tracing();

    let item = HashMap::from([
        ("id".to_string(), AttributeValue::string("u1")),
        ("age".to_string(), AttributeValue::number(42)),
        ("avatar".to_string(), AttributeValue::binary(vec![0u8, 255, 7])),
        (
            "tags".to_string(),
            AttributeValue {
                ss: Some(vec!["x".into(), "y".into()]),
                ..Default::default()
            },
        ),
        (
            "profile".to_string(),
            AttributeValue {
                m: Some(HashMap::from([(
                    "active".to_string(),
                    AttributeValue {
                        bool: Some(true),
                        ..Default::default()
                    },
                )])),
                ..Default::default()
            },
        ),
        (
            "history".to_string(),
            AttributeValue {
                l: Some(vec![AttributeValue::number(1), AttributeValue::string("two")]),
                ..Default::default()
            },
        ),
    ]);
    let input = PutItemRequest {
        table_name: Some("users".into()),
        item: Some(item.clone()),
        ..Default::default()
    };

    let request = PutItemMarshaller.marshall(&input).unwrap();
    let sent = body_json(&request);
    let response_body = serde_json::to_vec(&serde_json::json!({ "Item": sent["Item"] })).unwrap();

    let result = dynamodb::handle(&GetItemResultUnmarshaller, ok_response(response_body)).unwrap();
    assert_eq!(result.item, Some(item));
}

#[test]
fn table_shape_survives_create_then_describe() {
    init_tracing();

    let input = CreateTableRequest {
        table_name: Some("users".into()),
        attribute_definitions: Some(vec![AttributeDefinition {
            attribute_name: Some("id".into()),
            attribute_type: Some("S".into()),
        }]),
        key_schema: Some(vec![KeySchemaElement {
            attribute_name: Some("id".into()),
            key_type: Some("HASH".into()),
        }]),
        provisioned_throughput: Some(ProvisionedThroughput {
            read_capacity_units: Some(5),
            write_capacity_units: Some(5),
        }),
    };

    let request = CreateTableMarshaller.marshall(&input).unwrap();
    let sent = body_json(&request);
    let response_body =
        serde_json::to_vec(&serde_json::json!({ "TableDescription": sent })).unwrap();

    let result =
        dynamodb::handle(&CreateTableResultUnmarshaller, ok_response(response_body)).unwrap();
    let table = result.table_description.unwrap();
    assert_eq!(table.table_name, input.table_name);
    assert_eq!(table.attribute_definitions, input.attribute_definitions);
    assert_eq!(table.key_schema, input.key_schema);
    let throughput = table.provisioned_throughput.unwrap();
    assert_eq!(throughput.read_capacity_units, Some(5));
    assert_eq!(throughput.write_capacity_units, Some(5));
}

#[test]
fn unset_fields_and_lists_are_omitted() {
    let input = ListTablesRequest::default();
    let request = ListTablesMarshaller.marshall(&input).unwrap();
    assert_eq!(request.body().as_bytes(), Some(&b"{}"[..]));

    let empty = CreateTableRequest {
        key_schema: Some(vec![]),
        ..Default::default()
    };
    let request = CreateTableMarshaller.marshall(&empty).unwrap();
    assert_eq!(request.body().as_bytes(), Some(&br#"{"KeySchema":[]}"#[..]));
}

#[test]
fn explicit_null_sub_object_stays_absent() {
    let mut ctx = ParseContext::from_body(br#"{"Table":null}"#).unwrap();
    let result = DescribeTableResultUnmarshaller
        .unmarshall(&mut ctx)
        .unwrap()
        .unwrap();
    assert!(result.table.is_none());
}

#[test]
fn unrecognized_fields_are_ignored() {
    init_tracing();

    let body = br#"{
        "Brand": {"New": [1, {"Table": {"TableName": "decoy"}}]},
        "Table": {"TableName": "real", "Extra": {"TableName": "nested decoy"}, "ItemCount": 1},
        "Trailer": true
    }"#;
    let result = dynamodb::handle(&DescribeTableResultUnmarshaller, ok_response(body.to_vec()))
        .unwrap();
    let table = result.table.unwrap();
    assert_eq!(table.table_name.as_deref(), Some("real"));
    assert_eq!(table.item_count, Some(1));
}

#[test]
fn absent_path_segment_collapses() {
    let resolved = UriTemplate::parse("/{a}/{b}").resolve(&[("a", None), ("b", Some("x".into()))]);
    assert_eq!(resolved.path, "/x");
}

#[test]
fn pipeline_path_is_substituted() {
    let input = ReadPipelineRequest {
        id: Some("abc".into()),
    };
    let request = ReadPipelineMarshaller.marshall(&input).unwrap();
    assert_eq!(request.resource_path(), "2012-09-25/pipelines/abc");
    assert!(request.parameters().is_empty());

    let http_request = request
        .into_http_request("https://elastictranscoder.us-east-1.amazonaws.com")
        .unwrap();
    assert_eq!(
        http_request.uri(),
        "https://elastictranscoder.us-east-1.amazonaws.com/2012-09-25/pipelines/abc"
    );
}

#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct Named {
    name: Option<String>,
}

struct NamedMarshaller;

impl Marshaller<Named> for NamedMarshaller {
    fn marshall<'a>(
        &self,
        input: &'a Named,
    ) -> Result<cloudwire_core::SdkRequest<'a, Named>, cloudwire_core::MarshallError> {
        let operation = cloudwire_core::Operation::json_rpc(
            "Sample",
            "Create",
            "Sample_20200101.Create",
            cloudwire_core::ContentType::AmzJson11,
        );
        let mut request = operation.new_request(input)?;
        request.set_json_content(input)?;
        Ok(request)
    }
}

#[test]
fn single_field_body_has_exact_length() {
    let input = Named {
        name: Some("foo".into()),
    };
    let request = NamedMarshaller.marshall(&input).unwrap();
    assert_eq!(request.body().as_bytes(), Some(&br#"{"Name":"foo"}"#[..]));
    assert_eq!(request.header("content-length"), Some("14"));
}

#[tokio::test]
async fn throttled_calls_are_retried_until_success() {
    init_tracing();

    let attempts = std::sync::atomic::AtomicU32::new(0);
    let policy = RetryPolicy::dynamodb().throttled_base_delay(std::time::Duration::from_millis(1));

    let result = retry_with_policy(&policy, || {
        let attempt = attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        async move {
            let response = if attempt < 2 {
                http::Response::builder()
                    .status(StatusCode::BAD_REQUEST)
                    .body(Bytes::from_static(
                        br#"{"__type":"com.amazonaws.dynamodb.v20120810#ProvisionedThroughputExceededException"}"#,
                    ))
                    .unwrap()
            } else {
                ok_response(br#"{"Table":{"TableName":"users"}}"#.to_vec())
            };
            dynamodb::handle(&DescribeTableResultUnmarshaller, response)
        }
    })
    .await;

    let table = result.unwrap().table.unwrap();
    assert_eq!(table.table_name.as_deref(), Some("users"));
    assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 3);
}

#[tokio::test]
async fn validation_errors_are_not_retried() {
    let attempts = std::sync::atomic::AtomicU32::new(0);

    let result = retry_with_policy(&RetryPolicy::dynamodb(), || {
        attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        async {
            let response = http::Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .body(Bytes::from_static(
                    br#"{"__type":"com.amazon.coral.validate#ValidationException","message":"bad"}"#,
                ))
                .unwrap();
            dynamodb::handle(&DescribeTableResultUnmarshaller, response)
        }
    })
    .await;

    assert!(matches!(result, Err(ClientError::Service(_))));
    assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
}
