//! Response unmarshallers.
//!
//! Every unmarshaller is a stateless unit (or composition of units)
//! implementing [`Unmarshaller`]. Scalars read the current token; structured
//! shapes drive [`ParseContext::read_object`]; collections compose an element
//! unmarshaller with [`ListUnmarshaller`] or [`MapUnmarshaller`].
//!
//! # Example
//!
//! ```
//! use cloudwire_core::{LongUnmarshaller, ParseContext, ParseError, StringUnmarshaller, Unmarshaller};
//!
//! #[derive(Default, Debug)]
//! struct Table {
//!     name: Option<String>,
//!     item_count: Option<i64>,
//! }
//!
//! struct TableUnmarshaller;
//!
//! impl Unmarshaller for TableUnmarshaller {
//!     type Output = Table;
//!
//!     fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<Table>, ParseError> {
//!         ctx.read_object::<Table, _>(|out, field, ctx| {
//!             match field {
//!                 "TableName" => out.name = StringUnmarshaller.unmarshall(ctx)?,
//!                 "ItemCount" => out.item_count = LongUnmarshaller.unmarshall(ctx)?,
//!                 _ => {}
//!             }
//!             Ok(())
//!         })
//!     }
//! }
//!
//! let mut ctx = ParseContext::from_body(br#"{"TableName":"t","ItemCount":3,"New":1}"#)?;
//! let table = TableUnmarshaller.unmarshall(&mut ctx)?.unwrap();
//! assert_eq!(table.name.as_deref(), Some("t"));
//! assert_eq!(table.item_count, Some(3));
//! # Ok::<(), ParseError>(())
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, SystemTime};

use base64::Engine;
use bytes::Bytes;

use crate::{JsonToken, ParseContext, ParseError};

/// Capability of turning the value under a [`ParseContext`] cursor into `Output`.
///
/// The cursor may be unpositioned (the unmarshaller advances once) or already
/// on the value's first token. `Ok(None)` means the value was an explicit
/// `null`; callers treat it the same as a field that never appeared.
pub trait Unmarshaller: Send + Sync {
    /// The value produced.
    type Output;

    /// Read one value, leaving the cursor on its last token.
    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<Self::Output>, ParseError>;
}

impl<U: Unmarshaller + ?Sized> Unmarshaller for &U {
    type Output = U::Output;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<Self::Output>, ParseError> {
        (**self).unmarshall(ctx)
    }
}

/// Read a complete response body with `unmarshaller`.
pub fn unmarshall_response<U: Unmarshaller>(
    unmarshaller: &U,
    response: http::Response<Bytes>,
) -> Result<Option<U::Output>, ParseError> {
    let mut ctx = ParseContext::from_http_response(response)?;
    let value = unmarshaller.unmarshall(&mut ctx)?;
    #[cfg(feature = "tracing")]
    tracing::trace!(
        status = ctx.status().as_u16(),
        present = value.is_some(),
        "unmarshalled response body"
    );
    Ok(value)
}

/// Reads text from string tokens, field names (map keys) and the textual form
/// of numbers and booleans.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringUnmarshaller;

impl Unmarshaller for StringUnmarshaller {
    type Output = String;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<String>, ParseError> {
        match ctx.ensure_positioned() {
            None | Some(JsonToken::Null) => Ok(None),
            Some(JsonToken::String(s) | JsonToken::FieldName(s)) => Ok(Some(s.clone())),
            Some(JsonToken::Number(n)) => Ok(Some(n.to_string())),
            Some(JsonToken::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(ParseError::unexpected("string", other)),
        }
    }
}

/// Reads `true` / `false`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolUnmarshaller;

impl Unmarshaller for BoolUnmarshaller {
    type Output = bool;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<bool>, ParseError> {
        match ctx.ensure_positioned() {
            None | Some(JsonToken::Null) => Ok(None),
            Some(JsonToken::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(ParseError::unexpected("boolean", other)),
        }
    }
}

/// Reads a 32-bit integer.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntUnmarshaller;

impl Unmarshaller for IntUnmarshaller {
    type Output = i32;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<i32>, ParseError> {
        match ctx.ensure_positioned() {
            None | Some(JsonToken::Null) => Ok(None),
            Some(JsonToken::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| ParseError::invalid("integer", n.to_string())),
            Some(other) => Err(ParseError::unexpected("integer", other)),
        }
    }
}

/// Reads a 64-bit integer.
#[derive(Clone, Copy, Debug, Default)]
pub struct LongUnmarshaller;

impl Unmarshaller for LongUnmarshaller {
    type Output = i64;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<i64>, ParseError> {
        match ctx.ensure_positioned() {
            None | Some(JsonToken::Null) => Ok(None),
            Some(JsonToken::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| ParseError::invalid("long", n.to_string())),
            Some(other) => Err(ParseError::unexpected("long", other)),
        }
    }
}

/// Reads a double-precision number.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoubleUnmarshaller;

impl Unmarshaller for DoubleUnmarshaller {
    type Output = f64;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<f64>, ParseError> {
        match ctx.ensure_positioned() {
            None | Some(JsonToken::Null) => Ok(None),
            Some(JsonToken::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| ParseError::invalid("double", n.to_string())),
            Some(other) => Err(ParseError::unexpected("double", other)),
        }
    }
}

/// Reads base64 text into raw bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlobUnmarshaller;

impl Unmarshaller for BlobUnmarshaller {
    type Output = Bytes;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<Bytes>, ParseError> {
        match ctx.ensure_positioned() {
            None | Some(JsonToken::Null) => Ok(None),
            Some(JsonToken::String(s)) => base64::engine::general_purpose::STANDARD
                .decode(s)
                .map(|v| Some(Bytes::from(v)))
                .map_err(|e| ParseError::invalid("base64 blob", e.to_string())),
            Some(other) => Err(ParseError::unexpected("blob", other)),
        }
    }
}

/// Reads epoch seconds (fractional allowed) into a [`SystemTime`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DateUnmarshaller;

impl Unmarshaller for DateUnmarshaller {
    type Output = SystemTime;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<SystemTime>, ParseError> {
        match ctx.ensure_positioned() {
            None | Some(JsonToken::Null) => Ok(None),
            Some(JsonToken::Number(n)) => {
                let secs = n
                    .as_f64()
                    .filter(|s| s.is_finite())
                    .ok_or_else(|| ParseError::invalid("timestamp", n.to_string()))?;
                let offset = Duration::try_from_secs_f64(secs.abs())
                    .map_err(|_| ParseError::invalid("timestamp", n.to_string()))?;
                let time = if secs >= 0.0 {
                    SystemTime::UNIX_EPOCH.checked_add(offset)
                } else {
                    SystemTime::UNIX_EPOCH.checked_sub(offset)
                };
                time.map(Some)
                    .ok_or_else(|| ParseError::invalid("timestamp", n.to_string()))
            }
            Some(other) => Err(ParseError::unexpected("timestamp", other)),
        }
    }
}

/// Reads an array, delegating each element to the wrapped unmarshaller.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListUnmarshaller<U>(pub U);

impl<U: Unmarshaller> Unmarshaller for ListUnmarshaller<U> {
    type Output = Vec<U::Output>;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<Self::Output>, ParseError> {
        ctx.read_array(|ctx| self.0.unmarshall(ctx))
    }
}

/// Reads an object as a map, using `key` on each field name and `value` on
/// each field value.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapUnmarshaller<K, V> {
    key: K,
    value: V,
}

impl<K, V> MapUnmarshaller<K, V> {
    /// Compose a map unmarshaller from key and value unmarshallers.
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<V> MapUnmarshaller<StringUnmarshaller, V> {
    /// Map with text keys, the shape used by every JSON service.
    pub const fn with_string_keys(value: V) -> Self {
        Self::new(StringUnmarshaller, value)
    }
}

impl<K, V> Unmarshaller for MapUnmarshaller<K, V>
where
    K: Unmarshaller,
    K::Output: Eq + Hash,
    V: Unmarshaller,
{
    type Output = HashMap<K::Output, V::Output>;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<Self::Output>, ParseError> {
        ctx.read_map(|ctx| self.key.unmarshall(ctx), |ctx| self.value.unmarshall(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(body: &str) -> ParseContext {
        ParseContext::from_body(body.as_bytes()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(
            StringUnmarshaller.unmarshall(&mut context(r#""hi""#)).unwrap(),
            Some("hi".to_string())
        );
        assert_eq!(
            BoolUnmarshaller.unmarshall(&mut context("false")).unwrap(),
            Some(false)
        );
        assert_eq!(
            IntUnmarshaller.unmarshall(&mut context("-42")).unwrap(),
            Some(-42)
        );
        assert_eq!(
            LongUnmarshaller.unmarshall(&mut context("9007199254740993")).unwrap(),
            Some(9_007_199_254_740_993)
        );
        assert_eq!(
            DoubleUnmarshaller.unmarshall(&mut context("2.5")).unwrap(),
            Some(2.5)
        );
    }

    #[test]
    fn test_scalar_null_propagates() {
        assert_eq!(StringUnmarshaller.unmarshall(&mut context("null")).unwrap(), None);
        assert_eq!(IntUnmarshaller.unmarshall(&mut context("null")).unwrap(), None);
        assert_eq!(BlobUnmarshaller.unmarshall(&mut context("null")).unwrap(), None);
    }

    #[test]
    fn test_int_out_of_range() {
        let err = IntUnmarshaller
            .unmarshall(&mut context("4294967296"))
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { expected: "integer", .. }));
    }

    #[test]
    fn test_type_mismatch() {
        let err = BoolUnmarshaller.unmarshall(&mut context(r#""yes""#)).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { expected: "boolean", .. }));
    }

    #[test]
    fn test_blob_decodes_base64() {
        let blob = BlobUnmarshaller
            .unmarshall(&mut context(r#""AQID""#))
            .unwrap()
            .unwrap();
        assert_eq!(&blob[..], &[1, 2, 3]);

        let err = BlobUnmarshaller.unmarshall(&mut context(r#""!!""#)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }

    #[test]
    fn test_date_from_epoch_seconds() {
        let date = DateUnmarshaller
            .unmarshall(&mut context("1500000000.5"))
            .unwrap()
            .unwrap();
        assert_eq!(
            date.duration_since(SystemTime::UNIX_EPOCH).unwrap(),
            Duration::from_millis(1_500_000_000_500)
        );
    }

    #[test]
    fn test_list_preserves_order() {
        let list = ListUnmarshaller(StringUnmarshaller)
            .unmarshall(&mut context(r#"["c","a","b"]"#))
            .unwrap()
            .unwrap();
        assert_eq!(list, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_nested_lists() {
        let list = ListUnmarshaller(ListUnmarshaller(IntUnmarshaller))
            .unmarshall(&mut context("[[1,2],[],[3]]"))
            .unwrap()
            .unwrap();
        assert_eq!(list, vec![vec![1, 2], vec![], vec![3]]);
    }

    #[test]
    fn test_empty_list_is_present() {
        let list = ListUnmarshaller(StringUnmarshaller)
            .unmarshall(&mut context("[]"))
            .unwrap();
        assert_eq!(list, Some(vec![]));
    }

    #[test]
    fn test_map_of_lists() {
        let map = MapUnmarshaller::with_string_keys(ListUnmarshaller(LongUnmarshaller))
            .unmarshall(&mut context(r#"{"a":[1,2],"b":[],"c":null}"#))
            .unwrap()
            .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], vec![1, 2]);
        assert!(map["b"].is_empty());
    }

    #[test]
    fn test_map_duplicate_key_last_write_wins() {
        let map = MapUnmarshaller::with_string_keys(IntUnmarshaller)
            .unmarshall(&mut context(r#"{"k":1,"k":2}"#))
            .unwrap()
            .unwrap();
        assert_eq!(map["k"], 2);
    }

    #[test]
    fn test_unmarshall_response() {
        let response = http::Response::builder()
            .status(200)
            .body(Bytes::from_static(br#"["x"]"#))
            .unwrap();
        let list = unmarshall_response(&ListUnmarshaller(StringUnmarshaller), response)
            .unwrap()
            .unwrap();
        assert_eq!(list, vec!["x"]);
    }
}
