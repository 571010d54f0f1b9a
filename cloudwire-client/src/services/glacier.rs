//! Amazon Glacier (API version 2012-06-01).
//!
//! Only archive upload is bound here. The archive travels as the raw request
//! body; its description and tree hash travel as headers, and the result is
//! read back from response headers.

use std::sync::LazyLock;

use bytes::Bytes;
use cloudwire_core::{
    ContentType, MarshallError, Marshaller, Operation, ParseContext, ParseError, SdkRequest,
    Unmarshaller, UriTemplate,
};
use http::Method;

use super::handle_response;
use crate::ClientError;
use crate::error_parser::{ErrorMatcher, ErrorShape};

/// Service namespace.
pub const SERVICE_NAME: &str = "AmazonGlacier";

pub const ARCHIVE_DESCRIPTION_HEADER: &str = "x-amz-archive-description";
pub const TREE_HASH_HEADER: &str = "x-amz-sha256-tree-hash";
pub const ARCHIVE_ID_HEADER: &str = "x-amz-archive-id";

const UPLOAD_ARCHIVE: Operation = Operation::rest(
    SERVICE_NAME,
    "UploadArchive",
    Method::POST,
    ContentType::OctetStream,
);

static UPLOAD_ARCHIVE_URI: LazyLock<UriTemplate> =
    LazyLock::new(|| UriTemplate::parse("/{accountId}/vaults/{vaultName}/archives"));

pub const INVALID_PARAMETER_VALUE: ErrorShape = ErrorShape::new("InvalidParameterValueException");
pub const MISSING_PARAMETER_VALUE: ErrorShape = ErrorShape::new("MissingParameterValueException");
pub const REQUEST_TIMEOUT: ErrorShape = ErrorShape::new("RequestTimeoutException");
pub const RESOURCE_NOT_FOUND: ErrorShape = ErrorShape::new("ResourceNotFoundException");
pub const SERVICE_UNAVAILABLE: ErrorShape = ErrorShape::new("ServiceUnavailableException");

/// Error shapes Glacier documents.
pub static ERRORS: &[&dyn ErrorMatcher] = &[
    &INVALID_PARAMETER_VALUE,
    &MISSING_PARAMETER_VALUE,
    &REQUEST_TIMEOUT,
    &RESOURCE_NOT_FOUND,
    &SERVICE_UNAVAILABLE,
];

/// Unmarshall a Glacier response, classifying error responses.
pub fn handle<U>(unmarshaller: &U, response: http::Response<Bytes>) -> Result<U::Output, ClientError>
where
    U: Unmarshaller,
    U::Output: Default,
{
    handle_response(unmarshaller, response, ERRORS, SERVICE_NAME)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadArchiveRequest {
    pub vault_name: Option<String>,
    /// Owning account id, or `-` for the credentials' own account.
    pub account_id: Option<String>,
    pub archive_description: Option<String>,
    /// SHA-256 tree hash of the archive, hex encoded.
    pub checksum: Option<String>,
    pub body: Option<Bytes>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchiveCreationOutput {
    /// Relative URI of the new archive.
    pub location: Option<String>,
    pub checksum: Option<String>,
    pub archive_id: Option<String>,
}

pub struct UploadArchiveMarshaller;

impl Marshaller<UploadArchiveRequest> for UploadArchiveMarshaller {
    fn marshall<'a>(
        &self,
        input: &'a UploadArchiveRequest,
    ) -> Result<SdkRequest<'a, UploadArchiveRequest>, MarshallError> {
        let mut request = UPLOAD_ARCHIVE.new_request(input)?;
        request.add_optional_header(
            ARCHIVE_DESCRIPTION_HEADER,
            input.archive_description.as_deref(),
        )?;
        request.add_optional_header(TREE_HASH_HEADER, input.checksum.as_deref())?;
        request.apply_uri(UPLOAD_ARCHIVE_URI.resolve(&[
            ("accountId", input.account_id.clone()),
            ("vaultName", input.vault_name.clone()),
        ]));
        if let Some(body) = &input.body {
            request.set_content(body.clone());
        }
        Ok(request)
    }
}

/// Reads [`ArchiveCreationOutput`] from the response headers; the body is ignored.
pub struct ArchiveCreationOutputUnmarshaller;

impl Unmarshaller for ArchiveCreationOutputUnmarshaller {
    type Output = ArchiveCreationOutput;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<ArchiveCreationOutput>, ParseError> {
        Ok(Some(ArchiveCreationOutput {
            location: ctx.header("location").map(str::to_owned),
            checksum: ctx.header(TREE_HASH_HEADER).map(str::to_owned),
            archive_id: ctx.header(ARCHIVE_ID_HEADER).map(str::to_owned),
        }))
    }
}
