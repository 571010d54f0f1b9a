//! Request marshallers.
//!
//! A marshaller is a stateless unit implementing [`Marshaller`] for one
//! request type. The fixed, per-operation facts (service, operation name,
//! method, routing header, content type) live in an [`Operation`] constant;
//! URI templates live in a `LazyLock<UriTemplate>` so they are split once.
//!
//! # Example
//!
//! ```
//! use cloudwire_core::{ContentType, MarshallError, Marshaller, Operation, SdkRequest};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct CreateThing {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     name: Option<String>,
//! }
//!
//! const CREATE_THING: Operation = Operation::json_rpc(
//!     "Things",
//!     "CreateThing",
//!     "Things_20200101.CreateThing",
//!     ContentType::AmzJson11,
//! );
//!
//! struct CreateThingMarshaller;
//!
//! impl Marshaller<CreateThing> for CreateThingMarshaller {
//!     fn marshall<'a>(&self, input: &'a CreateThing) -> Result<SdkRequest<'a, CreateThing>, MarshallError> {
//!         let mut request = CREATE_THING.new_request(input)?;
//!         request.set_json_content(input)?;
//!         Ok(request)
//!     }
//! }
//!
//! let input = CreateThing { name: Some("foo".into()) };
//! let request = CreateThingMarshaller.marshall(&input)?;
//! assert_eq!(request.body().as_bytes(), Some(&br#"{"Name":"foo"}"#[..]));
//! # Ok::<(), MarshallError>(())
//! ```

use bytes::Bytes;
use http::Method;
use serde::Serialize;

use crate::{MarshallError, ResolvedUri, SdkRequest};

/// Header carrying the operation identifier of RPC-style JSON services.
pub const TARGET_HEADER: &str = "x-amz-target";

/// Capability of turning a typed request `I` into an [`SdkRequest`].
///
/// Implementations never mutate the input and return a fully populated
/// descriptor (method, path, headers and body all set).
pub trait Marshaller<I>: Send + Sync {
    /// Build the descriptor for `input`.
    fn marshall<'a>(&self, input: &'a I) -> Result<SdkRequest<'a, I>, MarshallError>;

    /// Build the descriptor for a request that may be absent.
    ///
    /// An absent request fails immediately with
    /// [`MarshallError::InvalidArgument`]; no partial descriptor is built.
    fn marshall_opt<'a>(&self, input: Option<&'a I>) -> Result<SdkRequest<'a, I>, MarshallError> {
        let input =
            input.ok_or_else(|| MarshallError::null_request(std::any::type_name::<I>()))?;
        self.marshall(input)
    }
}

/// Body encoding of an operation, sent as `Content-Type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentType {
    /// `application/x-amz-json-1.0`
    AmzJson10,
    /// `application/x-amz-json-1.1`
    AmzJson11,
    /// `binary/octet-stream`
    OctetStream,
}

impl ContentType {
    /// The `Content-Type` header value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ContentType::AmzJson10 => "application/x-amz-json-1.0",
            ContentType::AmzJson11 => "application/x-amz-json-1.1",
            ContentType::OctetStream => "binary/octet-stream",
        }
    }
}

/// Fixed facts about one API operation.
#[derive(Clone, Debug)]
pub struct Operation {
    /// Service namespace.
    pub service_name: &'static str,
    /// Operation name.
    pub name: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Value of the routing header, for RPC-style services.
    pub target: Option<&'static str>,
    /// Body encoding.
    pub content_type: ContentType,
}

impl Operation {
    /// An RPC-style operation: `POST /` routed by `X-Amz-Target`.
    pub const fn json_rpc(
        service_name: &'static str,
        name: &'static str,
        target: &'static str,
        content_type: ContentType,
    ) -> Self {
        Self {
            service_name,
            name,
            method: Method::POST,
            target: Some(target),
            content_type,
        }
    }

    /// A REST-style operation routed by method and path.
    pub const fn rest(
        service_name: &'static str,
        name: &'static str,
        method: Method,
        content_type: ContentType,
    ) -> Self {
        Self {
            service_name,
            name,
            method,
            target: None,
            content_type,
        }
    }

    /// Start a descriptor for `input` with this operation's method, path `/`,
    /// routing header and content type, and an explicit empty body.
    pub fn new_request<'a, I>(&self, input: &'a I) -> Result<SdkRequest<'a, I>, MarshallError> {
        let mut request = SdkRequest::new(self.service_name, self.name, input);
        request.set_method(self.method.clone());
        request.set_resource_path("/");
        if let Some(target) = self.target {
            request.add_header(TARGET_HEADER, target)?;
        }
        request.add_header("content-type", self.content_type.as_str())?;
        request.set_empty_content();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            service = self.service_name,
            operation = self.name,
            method = %self.method,
            "marshalling request"
        );

        Ok(request)
    }
}

impl<I> SdkRequest<'_, I> {
    /// Apply a resolved URI template: set the path and append its query
    /// parameters.
    pub fn apply_uri(&mut self, uri: ResolvedUri) {
        self.set_resource_path(uri.path);
        for (name, value) in uri.query {
            self.add_parameter(name, value);
        }
    }

    /// Serialize `body` as JSON and set it as the content.
    ///
    /// Serializer failures are wrapped in [`MarshallError::Serialization`].
    pub fn set_json_content<T: Serialize + ?Sized>(&mut self, body: &T) -> Result<(), MarshallError> {
        let content = serde_json::to_vec(body).map_err(MarshallError::Serialization)?;
        self.set_content(Bytes::from(content));
        Ok(())
    }

    /// Set a header only when `value` is present.
    pub fn add_optional_header(
        &mut self,
        name: &'static str,
        value: Option<&str>,
    ) -> Result<(), MarshallError> {
        match value {
            Some(value) => self.add_header(name, value),
            None => Ok(()),
        }
    }
}
