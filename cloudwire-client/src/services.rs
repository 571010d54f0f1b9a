//! Sample service bindings.
//!
//! Each service module holds its request and result shapes, one marshaller
//! per operation, one unmarshaller per result shape, and the error shapes the
//! service documents.

pub mod dynamodb;
pub mod elastictranscoder;
pub mod glacier;

use bytes::Bytes;
use cloudwire_core::{MarshallError, Operation, SdkRequest, Unmarshaller, unmarshall_response};
use serde::Serialize;

use crate::error_parser::{ErrorMatcher, JsonErrorResponse, classify};
use crate::ClientError;

/// Start a request for `operation` with `input` serialized as the JSON body.
pub(crate) fn json_request<'a, I: Serialize>(
    operation: &Operation,
    input: &'a I,
) -> Result<SdkRequest<'a, I>, MarshallError> {
    let mut request = operation.new_request(input)?;
    request.set_json_content(input)?;
    Ok(request)
}

/// Turn a buffered response into a result or a classified error.
///
/// 2xx responses go through `unmarshaller`; an empty or `null` body yields
/// the default result. Anything else is classified against `errors`.
pub fn handle_response<U>(
    unmarshaller: &U,
    response: http::Response<Bytes>,
    errors: &[&dyn ErrorMatcher],
    service_name: &str,
) -> Result<U::Output, ClientError>
where
    U: Unmarshaller,
    U::Output: Default,
{
    if !response.status().is_success() {
        let error = JsonErrorResponse::from_http_response(&response);
        return Err(classify(&error, errors, service_name));
    }
    Ok(unmarshall_response(unmarshaller, response)?.unwrap_or_default())
}
