//! Structured JSON tokens.
//!
//! This module provides [`JsonToken`] and [`tokenize`], which turns a JSON
//! body into the flat, source-ordered token sequence walked by
//! [`ParseContext`](super::ParseContext).

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Number;

use crate::ParseError;

/// A single structural or scalar token of a JSON document.
#[derive(Clone, Debug, PartialEq)]
pub enum JsonToken {
    /// `{`
    StartObject,
    /// `}`
    EndObject,
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// An object key.
    FieldName(String),
    /// A string value.
    String(String),
    /// A numeric value.
    Number(Number),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
}

impl JsonToken {
    /// Whether this token closes an object or an array.
    pub fn is_end(&self) -> bool {
        matches!(self, JsonToken::EndObject | JsonToken::EndArray)
    }

    /// Whether this token opens an object or an array.
    pub fn is_start(&self) -> bool {
        matches!(self, JsonToken::StartObject | JsonToken::StartArray)
    }

    /// Short human-readable form used in error messages.
    pub fn describe(&self) -> String {
        match self {
            JsonToken::StartObject => "'{'".to_string(),
            JsonToken::EndObject => "'}'".to_string(),
            JsonToken::StartArray => "'['".to_string(),
            JsonToken::EndArray => "']'".to_string(),
            JsonToken::FieldName(name) => format!("field name {name:?}"),
            JsonToken::String(_) => "string".to_string(),
            JsonToken::Number(n) => format!("number {n}"),
            JsonToken::Bool(b) => format!("boolean {b}"),
            JsonToken::Null => "null".to_string(),
        }
    }
}

/// Split a JSON body into tokens.
///
/// Object keys keep their source order and duplicate keys are emitted as
/// separate field-name tokens, so readers observe exactly what the body
/// contains. An empty (or whitespace-only) body yields no tokens.
pub fn tokenize(body: &[u8]) -> Result<Vec<JsonToken>, ParseError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let mut tokens = Vec::new();
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    TokenSink(&mut tokens).deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(tokens)
}

/// Deserialization seed that appends every visited value as tokens.
struct TokenSink<'a>(&'a mut Vec<JsonToken>);

impl<'de> DeserializeSeed<'de> for TokenSink<'_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for TokenSink<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<(), E> {
        self.0.push(JsonToken::Bool(v));
        Ok(())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<(), E> {
        self.0.push(JsonToken::Number(Number::from(v)));
        Ok(())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<(), E> {
        self.0.push(JsonToken::Number(Number::from(v)));
        Ok(())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<(), E> {
        let number = Number::from_f64(v)
            .ok_or_else(|| E::custom(format!("non-finite number {v}")))?;
        self.0.push(JsonToken::Number(number));
        Ok(())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<(), E> {
        self.0.push(JsonToken::String(v.to_owned()));
        Ok(())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<(), E> {
        self.0.push(JsonToken::String(v));
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        self.0.push(JsonToken::Null);
        Ok(())
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        self.0.push(JsonToken::Null);
        Ok(())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        let tokens = self.0;
        tokens.push(JsonToken::StartArray);
        while seq.next_element_seed(TokenSink(&mut *tokens))?.is_some() {}
        tokens.push(JsonToken::EndArray);
        Ok(())
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        let tokens = self.0;
        tokens.push(JsonToken::StartObject);
        while let Some(key) = map.next_key::<String>()? {
            tokens.push(JsonToken::FieldName(key));
            map.next_value_seed(TokenSink(&mut *tokens))?;
        }
        tokens.push(JsonToken::EndObject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_nested_document() {
        let tokens = tokenize(br#"{"a":[1,true,null],"b":{"c":"x"}}"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                JsonToken::StartObject,
                JsonToken::FieldName("a".into()),
                JsonToken::StartArray,
                JsonToken::Number(1.into()),
                JsonToken::Bool(true),
                JsonToken::Null,
                JsonToken::EndArray,
                JsonToken::FieldName("b".into()),
                JsonToken::StartObject,
                JsonToken::FieldName("c".into()),
                JsonToken::String("x".into()),
                JsonToken::EndObject,
                JsonToken::EndObject,
            ]
        );
    }

    #[test]
    fn test_tokenize_keeps_source_order_and_duplicates() {
        let tokens = tokenize(br#"{"z":1,"a":2,"z":3}"#).unwrap();
        let names: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t {
                JsonToken::FieldName(n) => Some(n.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["z", "a", "z"]);
    }

    #[test]
    fn test_tokenize_empty_body() {
        assert!(tokenize(b"").unwrap().is_empty());
        assert!(tokenize(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_rejects_malformed_body() {
        assert!(matches!(tokenize(b"{\"a\":"), Err(ParseError::Json(_))));
        assert!(matches!(tokenize(b"{} trailing"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_tokenize_floats() {
        let tokens = tokenize(b"1.5").unwrap();
        assert_eq!(tokens, vec![JsonToken::Number(Number::from_f64(1.5).unwrap())]);
    }
}
