//! JSON token model and the streaming parse context.
//!
//! This module contains the response-side cursor:
//! - [`JsonToken`] and [`tokenize`]: Source-ordered tokens of a body
//! - [`ParseContext`]: Depth-aware cursor threaded through unmarshallers

mod context;
mod token;

pub use context::ParseContext;
pub use token::{JsonToken, tokenize};
