//! Marshalling contract for cloud service clients.
//!
//! This crate holds the protocol-neutral pieces shared by every service
//! binding in `cloudwire-client`: the outbound request descriptor, the
//! streaming JSON parse context, URI template substitution, and the
//! [`Marshaller`] / [`Unmarshaller`] capabilities with their generic list,
//! map and scalar implementations.
//!
//! ## Modules
//!
//! - [`SdkRequest`]: method, path, headers, query multimap and body of one call
//! - [`ParseContext`]: pull cursor over a response body with depth and parent tracking
//! - [`UriTemplate`]: pre-split URI templates with path and query placeholders
//! - [`Marshaller`] / [`Operation`]: request construction
//! - [`Unmarshaller`]: response decoding, including [`ListUnmarshaller`] and [`MapUnmarshaller`]
//! - [`serde_helpers`]: `serialize_with` helpers for blobs and timestamps

mod error;
mod json;
mod marshall;
mod request;
pub mod serde_helpers;
mod unmarshall;
mod uri;

pub use error::*;
pub use json::{JsonToken, ParseContext, tokenize};
pub use marshall::{ContentType, Marshaller, Operation, TARGET_HEADER};
pub use request::{RequestBody, SdkRequest};
pub use unmarshall::*;
pub use uri::{ResolvedUri, UriTemplate};
