//! Amazon Elastic Transcoder (API version 2012-09-25).
//!
//! REST-style service: operations are routed by method and a URI template,
//! path and query values come from request fields, and only create calls
//! carry a JSON body.

use std::sync::LazyLock;

use bytes::Bytes;
use cloudwire_core::{
    ContentType, ListUnmarshaller, MarshallError, Marshaller, Operation,
    ParseContext, ParseError, SdkRequest, StringUnmarshaller, Unmarshaller, UriTemplate,
};
use http::Method;
use serde::Serialize;

use super::handle_response;
use crate::ClientError;
use crate::error_parser::{ErrorMatcher, ErrorShape};

/// Service namespace.
pub const SERVICE_NAME: &str = "AmazonElasticTranscoder";

const CREATE_PIPELINE: Operation = Operation::rest(
    SERVICE_NAME,
    "CreatePipeline",
    Method::POST,
    ContentType::AmzJson10,
);
const READ_PIPELINE: Operation =
    Operation::rest(SERVICE_NAME, "ReadPipeline", Method::GET, ContentType::AmzJson10);
const LIST_JOBS_BY_PIPELINE: Operation = Operation::rest(
    SERVICE_NAME,
    "ListJobsByPipeline",
    Method::GET,
    ContentType::AmzJson10,
);
const CANCEL_JOB: Operation =
    Operation::rest(SERVICE_NAME, "CancelJob", Method::DELETE, ContentType::AmzJson10);

static CREATE_PIPELINE_URI: LazyLock<UriTemplate> =
    LazyLock::new(|| UriTemplate::parse("2012-09-25/pipelines"));
static READ_PIPELINE_URI: LazyLock<UriTemplate> =
    LazyLock::new(|| UriTemplate::parse("2012-09-25/pipelines/{Id}"));
static LIST_JOBS_BY_PIPELINE_URI: LazyLock<UriTemplate> = LazyLock::new(|| {
    UriTemplate::parse(
        "2012-09-25/jobsByPipeline/{PipelineId}?Ascending={Ascending};PageToken={PageToken}",
    )
});
static CANCEL_JOB_URI: LazyLock<UriTemplate> =
    LazyLock::new(|| UriTemplate::parse("2012-09-25/jobs/{Id}"));

pub const ACCESS_DENIED: ErrorShape = ErrorShape::new("AccessDeniedException");
pub const INCOMPATIBLE_VERSION: ErrorShape = ErrorShape::new("IncompatibleVersionException");
pub const INTERNAL_SERVICE: ErrorShape = ErrorShape::new("InternalServiceException");
pub const LIMIT_EXCEEDED: ErrorShape = ErrorShape::new("LimitExceededException");
pub const RESOURCE_IN_USE: ErrorShape = ErrorShape::new("ResourceInUseException");
pub const RESOURCE_NOT_FOUND: ErrorShape = ErrorShape::new("ResourceNotFoundException");
pub const VALIDATION: ErrorShape = ErrorShape::new("ValidationException");

/// Error shapes Elastic Transcoder documents.
pub static ERRORS: &[&dyn ErrorMatcher] = &[
    &ACCESS_DENIED,
    &INCOMPATIBLE_VERSION,
    &INTERNAL_SERVICE,
    &LIMIT_EXCEEDED,
    &RESOURCE_IN_USE,
    &RESOURCE_NOT_FOUND,
    &VALIDATION,
];

/// Unmarshall an Elastic Transcoder response, classifying error responses.
pub fn handle<U>(unmarshaller: &U, response: http::Response<Bytes>) -> Result<U::Output, ClientError>
where
    U: Unmarshaller,
    U::Output: Default,
{
    handle_response(unmarshaller, response, ERRORS, SERVICE_NAME)
}

/// SNS topics notified on job state changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notifications {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progressing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pipeline {
    pub id: Option<String>,
    pub arn: Option<String>,
    pub name: Option<String>,
    /// `Active` or `Paused`.
    pub status: Option<String>,
    pub input_bucket: Option<String>,
    pub output_bucket: Option<String>,
    pub role: Option<String>,
    pub notifications: Option<Notifications>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobInput {
    pub key: Option<String>,
    pub container: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Job {
    pub id: Option<String>,
    pub arn: Option<String>,
    pub pipeline_id: Option<String>,
    pub input: Option<JobInput>,
    pub output_key_prefix: Option<String>,
    /// `Submitted`, `Progressing`, `Complete`, `Canceled` or `Error`.
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePipelineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Notifications>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreatePipelineResult {
    pub pipeline: Option<Pipeline>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadPipelineRequest {
    pub id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadPipelineResult {
    pub pipeline: Option<Pipeline>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListJobsByPipelineRequest {
    pub pipeline_id: Option<String>,
    /// `true` lists oldest jobs first.
    pub ascending: Option<bool>,
    pub page_token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListJobsByPipelineResult {
    pub jobs: Option<Vec<Job>>,
    pub next_page_token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CancelJobRequest {
    pub id: Option<String>,
}

/// Cancelling a job returns no fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CancelJobResult {}

pub struct CreatePipelineMarshaller;

impl Marshaller<CreatePipelineRequest> for CreatePipelineMarshaller {
    fn marshall<'a>(
        &self,
        input: &'a CreatePipelineRequest,
    ) -> Result<SdkRequest<'a, CreatePipelineRequest>, MarshallError> {
        let mut request = CREATE_PIPELINE.new_request(input)?;
        request.apply_uri(CREATE_PIPELINE_URI.resolve(&[]));
        request.set_json_content(input)?;
        Ok(request)
    }
}

pub struct ReadPipelineMarshaller;

impl Marshaller<ReadPipelineRequest> for ReadPipelineMarshaller {
    fn marshall<'a>(
        &self,
        input: &'a ReadPipelineRequest,
    ) -> Result<SdkRequest<'a, ReadPipelineRequest>, MarshallError> {
        let mut request = READ_PIPELINE.new_request(input)?;
        request.apply_uri(READ_PIPELINE_URI.resolve(&[("Id", input.id.clone())]));
        Ok(request)
    }
}

pub struct ListJobsByPipelineMarshaller;

impl Marshaller<ListJobsByPipelineRequest> for ListJobsByPipelineMarshaller {
    fn marshall<'a>(
        &self,
        input: &'a ListJobsByPipelineRequest,
    ) -> Result<SdkRequest<'a, ListJobsByPipelineRequest>, MarshallError> {
        let mut request = LIST_JOBS_BY_PIPELINE.new_request(input)?;
        request.apply_uri(LIST_JOBS_BY_PIPELINE_URI.resolve(&[
            ("PipelineId", input.pipeline_id.clone()),
            ("Ascending", input.ascending.map(|v| v.to_string())),
            ("PageToken", input.page_token.clone()),
        ]));
        Ok(request)
    }
}

pub struct CancelJobMarshaller;

impl Marshaller<CancelJobRequest> for CancelJobMarshaller {
    fn marshall<'a>(
        &self,
        input: &'a CancelJobRequest,
    ) -> Result<SdkRequest<'a, CancelJobRequest>, MarshallError> {
        let mut request = CANCEL_JOB.new_request(input)?;
        request.apply_uri(CANCEL_JOB_URI.resolve(&[("Id", input.id.clone())]));
        Ok(request)
    }
}

pub struct NotificationsUnmarshaller;

impl Unmarshaller for NotificationsUnmarshaller {
    type Output = Notifications;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<Notifications>, ParseError> {
        ctx.read_object::<Notifications, _>(|out, field, ctx| {
            match field {
                "Progressing" => out.progressing = StringUnmarshaller.unmarshall(ctx)?,
                "Completed" => out.completed = StringUnmarshaller.unmarshall(ctx)?,
                "Warning" => out.warning = StringUnmarshaller.unmarshall(ctx)?,
                "Error" => out.error = StringUnmarshaller.unmarshall(ctx)?,
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct PipelineUnmarshaller;

impl Unmarshaller for PipelineUnmarshaller {
    type Output = Pipeline;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<Pipeline>, ParseError> {
        ctx.read_object::<Pipeline, _>(|out, field, ctx| {
            match field {
                "Id" => out.id = StringUnmarshaller.unmarshall(ctx)?,
                "Arn" => out.arn = StringUnmarshaller.unmarshall(ctx)?,
                "Name" => out.name = StringUnmarshaller.unmarshall(ctx)?,
                "Status" => out.status = StringUnmarshaller.unmarshall(ctx)?,
                "InputBucket" => out.input_bucket = StringUnmarshaller.unmarshall(ctx)?,
                "OutputBucket" => out.output_bucket = StringUnmarshaller.unmarshall(ctx)?,
                "Role" => out.role = StringUnmarshaller.unmarshall(ctx)?,
                "Notifications" => out.notifications = NotificationsUnmarshaller.unmarshall(ctx)?,
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct JobInputUnmarshaller;

impl Unmarshaller for JobInputUnmarshaller {
    type Output = JobInput;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<JobInput>, ParseError> {
        ctx.read_object::<JobInput, _>(|out, field, ctx| {
            match field {
                "Key" => out.key = StringUnmarshaller.unmarshall(ctx)?,
                "Container" => out.container = StringUnmarshaller.unmarshall(ctx)?,
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct JobUnmarshaller;

impl Unmarshaller for JobUnmarshaller {
    type Output = Job;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<Job>, ParseError> {
        ctx.read_object::<Job, _>(|out, field, ctx| {
            match field {
                "Id" => out.id = StringUnmarshaller.unmarshall(ctx)?,
                "Arn" => out.arn = StringUnmarshaller.unmarshall(ctx)?,
                "PipelineId" => out.pipeline_id = StringUnmarshaller.unmarshall(ctx)?,
                "Input" => out.input = JobInputUnmarshaller.unmarshall(ctx)?,
                "OutputKeyPrefix" => out.output_key_prefix = StringUnmarshaller.unmarshall(ctx)?,
                "Status" => out.status = StringUnmarshaller.unmarshall(ctx)?,
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct CreatePipelineResultUnmarshaller;

impl Unmarshaller for CreatePipelineResultUnmarshaller {
    type Output = CreatePipelineResult;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<CreatePipelineResult>, ParseError> {
        ctx.read_object::<CreatePipelineResult, _>(|out, field, ctx| {
            if field == "Pipeline" {
                out.pipeline = PipelineUnmarshaller.unmarshall(ctx)?;
            }
            Ok(())
        })
    }
}

pub struct ReadPipelineResultUnmarshaller;

impl Unmarshaller for ReadPipelineResultUnmarshaller {
    type Output = ReadPipelineResult;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<ReadPipelineResult>, ParseError> {
        ctx.read_object::<ReadPipelineResult, _>(|out, field, ctx| {
            if field == "Pipeline" {
                out.pipeline = PipelineUnmarshaller.unmarshall(ctx)?;
            }
            Ok(())
        })
    }
}

pub struct ListJobsByPipelineResultUnmarshaller;

impl Unmarshaller for ListJobsByPipelineResultUnmarshaller {
    type Output = ListJobsByPipelineResult;

    fn unmarshall(
        &self,
        ctx: &mut ParseContext,
    ) -> Result<Option<ListJobsByPipelineResult>, ParseError> {
        ctx.read_object::<ListJobsByPipelineResult, _>(|out, field, ctx| {
            match field {
                "Jobs" => out.jobs = ListUnmarshaller(JobUnmarshaller).unmarshall(ctx)?,
                "NextPageToken" => out.next_page_token = StringUnmarshaller.unmarshall(ctx)?,
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct CancelJobResultUnmarshaller;

impl Unmarshaller for CancelJobResultUnmarshaller {
    type Output = CancelJobResult;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<CancelJobResult>, ParseError> {
        ctx.read_object::<CancelJobResult, _>(|_, _, _| Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_read_pipeline_path() {
        let input = ReadPipelineRequest {
            id: Some("abc".into()),
        };
        let request = ReadPipelineMarshaller.marshall(&input).unwrap();
        assert_eq!(*request.method(), Method::GET);
        assert_eq!(request.resource_path(), "2012-09-25/pipelines/abc");
        assert!(request.parameters().is_empty());
        assert_eq!(request.header("content-length"), Some("0"));
        assert_eq!(request.content_type(), Some("application/x-amz-json-1.0"));
        assert!(request.header("x-amz-target").is_none());
    }

    #[test]
    fn test_list_jobs_query_parameters() {
        let input = ListJobsByPipelineRequest {
            pipeline_id: Some("p-1".into()),
            ascending: Some(true),
            page_token: None,
        };
        let request = ListJobsByPipelineMarshaller.marshall(&input).unwrap();
        assert_eq!(request.resource_path(), "2012-09-25/jobsByPipeline/p-1");
        assert_eq!(request.parameters()["Ascending"], vec!["true"]);
        assert!(!request.parameters().contains_key("PageToken"));
        assert_eq!(request.query_string(), "Ascending=true");
    }

    #[test]
    fn test_cancel_job_absent_id_collapses() {
        let input = CancelJobRequest::default();
        let request = CancelJobMarshaller.marshall(&input).unwrap();
        assert_eq!(*request.method(), Method::DELETE);
        assert_eq!(request.resource_path(), "2012-09-25/jobs/");
    }

    #[test]
    fn test_create_pipeline_body() {
        let input = CreatePipelineRequest {
            name: Some("web".into()),
            input_bucket: Some("in".into()),
            notifications: Some(Notifications {
                error: Some("arn:aws:sns:us-east-1:1:errors".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let request = CreatePipelineMarshaller.marshall(&input).unwrap();
        assert_eq!(*request.method(), Method::POST);
        assert_eq!(request.resource_path(), "2012-09-25/pipelines");
        assert_eq!(
            request.body().as_bytes(),
            Some(
                &br#"{"Name":"web","InputBucket":"in","Notifications":{"Error":"arn:aws:sns:us-east-1:1:errors"}}"#[..]
            )
        );
    }

    #[test]
    fn test_list_jobs_result() {
        let body = r#"{
            "Jobs": [
                {"Id": "j1", "PipelineId": "p-1", "Input": {"Key": "a.mp4", "Container": "auto"}, "Status": "Complete"},
                null,
                {"Id": "j2", "Input": null, "Status": "Submitted"}
            ],
            "NextPageToken": "t2"
        }"#;
        let mut ctx = ParseContext::from_body(body.as_bytes()).unwrap();
        let result = ListJobsByPipelineResultUnmarshaller
            .unmarshall(&mut ctx)
            .unwrap()
            .unwrap();
        let jobs = result.jobs.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].input.as_ref().unwrap().key.as_deref(), Some("a.mp4"));
        assert_eq!(jobs[0].status.as_deref(), Some("Complete"));
        assert_eq!(jobs[1].id.as_deref(), Some("j2"));
        assert!(jobs[1].input.is_none());
        assert_eq!(result.next_page_token.as_deref(), Some("t2"));
    }

    #[test]
    fn test_read_pipeline_result() {
        let response = http::Response::builder()
            .status(StatusCode::OK)
            .body(Bytes::from_static(
                br#"{"Pipeline":{"Id":"abc","Name":"web","Notifications":{"Completed":"arn:done"},"Status":"Active"}}"#,
            ))
            .unwrap();
        let result = handle(&ReadPipelineResultUnmarshaller, response).unwrap();
        let pipeline = result.pipeline.unwrap();
        assert_eq!(pipeline.id.as_deref(), Some("abc"));
        assert_eq!(pipeline.status.as_deref(), Some("Active"));
        assert_eq!(
            pipeline.notifications.unwrap().completed.as_deref(),
            Some("arn:done")
        );
    }

    #[test]
    fn test_cancel_job_result() {
        let response = http::Response::builder()
            .status(StatusCode::ACCEPTED)
            .body(Bytes::from_static(b"{}"))
            .unwrap();
        assert_eq!(
            handle(&CancelJobResultUnmarshaller, response).unwrap(),
            CancelJobResult {}
        );
    }

    #[test]
    fn test_error_from_header() {
        let response = http::Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("x-amzn-ErrorType", "ResourceNotFoundException:")
            .body(Bytes::from_static(br#"{"message":"The specified pipeline was not found"}"#))
            .unwrap();
        let err = handle(&ReadPipelineResultUnmarshaller, response).unwrap_err();
        let service = err.service_error().unwrap();
        assert_eq!(service.code, "ResourceNotFoundException");
        assert_eq!(service.error_type, crate::ErrorType::Client);
        assert_eq!(
            service.message.as_deref(),
            Some("The specified pipeline was not found")
        );
    }
}
