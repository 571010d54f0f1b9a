//! Streaming parse context.
//!
//! [`ParseContext`] is the cursor threaded through every unmarshaller of a
//! single response. It owns the token stream, the response status and
//! headers, and the structural bookkeeping (open containers, active field
//! name, last closed container) that lets a nested unmarshaller tell its own
//! fields and closing marker apart from those of values it delegated.

use std::collections::HashMap;
use std::hash::Hash;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use super::token::{JsonToken, tokenize};
use crate::ParseError;

/// Cursor over the tokens of one response body.
///
/// Depth is the number of open containers plus one while a field name is
/// active. A value opened under field `X` remembers `X` as its parent
/// element; when it closes, `X` becomes the last parsed parent element for
/// exactly one token.
#[derive(Debug)]
pub struct ParseContext {
    tokens: std::vec::IntoIter<JsonToken>,
    current: Option<JsonToken>,
    /// One entry per open container: the field name it was opened under.
    stack: Vec<Option<String>>,
    current_field: Option<String>,
    /// Set only while the current token is a closing marker.
    last_parsed_parent: Option<Option<String>>,
    status: StatusCode,
    headers: HeaderMap,
}

impl ParseContext {
    /// Create a context over already-collected tokens.
    pub fn new(status: StatusCode, headers: HeaderMap, tokens: Vec<JsonToken>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            current: None,
            stack: Vec::new(),
            current_field: None,
            last_parsed_parent: None,
            status,
            headers,
        }
    }

    /// Create a context from raw response parts.
    pub fn from_slice(
        status: StatusCode,
        headers: HeaderMap,
        body: &[u8],
    ) -> Result<Self, ParseError> {
        Ok(Self::new(status, headers, tokenize(body)?))
    }

    /// Create a context from a buffered HTTP response.
    pub fn from_http_response(response: http::Response<Bytes>) -> Result<Self, ParseError> {
        let (parts, body) = response.into_parts();
        Self::from_slice(parts.status, parts.headers, &body)
    }

    /// Create a context over a bare JSON body with a `200 OK` status and no headers.
    pub fn from_body(body: &[u8]) -> Result<Self, ParseError> {
        Self::from_slice(StatusCode::OK, HeaderMap::new(), body)
    }

    /// Advance to the next token and update the structural bookkeeping.
    ///
    /// Returns `None` once the stream is exhausted.
    pub fn next_token(&mut self) -> Option<&JsonToken> {
        self.last_parsed_parent = None;
        self.current = self.tokens.next();

        match &self.current {
            Some(JsonToken::StartObject | JsonToken::StartArray) => {
                self.stack.push(self.current_field.take());
            }
            Some(JsonToken::EndObject | JsonToken::EndArray) => {
                self.last_parsed_parent = Some(self.stack.pop().flatten());
                self.current_field = None;
            }
            Some(JsonToken::FieldName(name)) => {
                self.current_field = Some(name.clone());
            }
            _ => {}
        }

        self.current.as_ref()
    }

    /// The token the cursor is sitting on, if any.
    pub fn current_token(&self) -> Option<&JsonToken> {
        self.current.as_ref()
    }

    /// Advance once if the cursor has not been positioned yet.
    ///
    /// Unmarshallers call this on entry so that they work both at the start of
    /// a body and when a caller has already moved onto the value.
    pub fn ensure_positioned(&mut self) -> Option<&JsonToken> {
        if self.current.is_none() {
            self.next_token();
        }
        self.current.as_ref()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len() + usize::from(self.current_field.is_some())
    }

    /// Field name the innermost open container was opened under.
    pub fn parent_element(&self) -> Option<&str> {
        self.stack.last().and_then(|field| field.as_deref())
    }

    /// Parent element of the container closed by the current token.
    ///
    /// `None` when the current token is not a closing marker; `Some(None)`
    /// when the closed container had no parent field (top level or array
    /// element).
    pub fn last_parsed_parent_element(&self) -> Option<Option<&str>> {
        self.last_parsed_parent
            .as_ref()
            .map(|parent| parent.as_deref())
    }

    /// Whether the cursor sits on field `name` at exactly `target_depth`.
    pub fn test_expression(&self, name: &str, target_depth: usize) -> bool {
        matches!(&self.current, Some(JsonToken::FieldName(field)) if field == name)
            && self.depth() == target_depth
    }

    /// Whether the current token closes the value entered at `entry_depth`.
    ///
    /// Closing markers of children that were already consumed leave the depth
    /// at `entry_depth` and never match.
    pub fn closes_scope(&self, entry_depth: usize, entry_parent: Option<&str>) -> bool {
        if !self.current.as_ref().is_some_and(JsonToken::is_end) {
            return false;
        }
        let parent_matches = match self.last_parsed_parent_element() {
            None => true,
            Some(parent) => parent == entry_parent,
        };
        parent_matches && self.depth() < entry_depth
    }

    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// All response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A response header as text, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Walk one JSON object, handing every field at the object's own level to
    /// `visit`.
    ///
    /// `visit` is called with the cursor on the field's value. It either
    /// consumes the whole value (ending on its last token) or ignores it, in
    /// which case the value's tokens are stepped over; names nested inside an
    /// ignored value are never reported because they sit deeper than the
    /// object's target depth.
    ///
    /// Returns `Ok(None)` for an explicit `null` and a default value for an
    /// empty body.
    pub fn read_object<T, F>(&mut self, mut visit: F) -> Result<Option<T>, ParseError>
    where
        T: Default,
        F: FnMut(&mut T, &str, &mut ParseContext) -> Result<(), ParseError>,
    {
        match self.ensure_positioned() {
            None => return Ok(Some(T::default())),
            Some(JsonToken::Null) => return Ok(None),
            Some(JsonToken::StartObject) => {}
            Some(other) => return Err(ParseError::unexpected("object", other)),
        }

        let entry_depth = self.depth();
        let entry_parent = self.parent_element().map(str::to_owned);
        let target_depth = entry_depth + 1;
        let mut value = T::default();

        loop {
            if self.next_token().is_none() {
                return Err(ParseError::UnexpectedEnd("object"));
            }
            if self.closes_scope(entry_depth, entry_parent.as_deref()) {
                break;
            }
            let field = match &self.current {
                Some(JsonToken::FieldName(name)) if self.depth() == target_depth => name.clone(),
                _ => continue,
            };
            if self.next_token().is_none() {
                return Err(ParseError::UnexpectedEnd("object"));
            }
            visit(&mut value, &field, self)?;
        }

        Ok(Some(value))
    }

    /// Walk one JSON array, reading each element with `element`.
    ///
    /// Elements keep their source order; `null` elements are dropped.
    pub fn read_array<T, F>(&mut self, mut element: F) -> Result<Option<Vec<T>>, ParseError>
    where
        F: FnMut(&mut ParseContext) -> Result<Option<T>, ParseError>,
    {
        match self.ensure_positioned() {
            None | Some(JsonToken::Null) => return Ok(None),
            Some(JsonToken::StartArray) => {}
            Some(other) => return Err(ParseError::unexpected("array", other)),
        }

        let entry_depth = self.depth();
        let entry_parent = self.parent_element().map(str::to_owned);
        let mut items = Vec::new();

        loop {
            if self.next_token().is_none() {
                return Err(ParseError::UnexpectedEnd("array"));
            }
            if self.closes_scope(entry_depth, entry_parent.as_deref()) {
                break;
            }
            if let Some(token) = self.current.as_ref().filter(|t| t.is_end()) {
                return Err(ParseError::unexpected("array element", token));
            }
            if let Some(item) = element(self)? {
                items.push(item);
            }
        }

        Ok(Some(items))
    }

    /// Walk one JSON object as a map, reading keys with `key` (positioned on
    /// the field name) and values with `value`.
    ///
    /// Duplicate keys keep the last value; `null` values are dropped.
    pub fn read_map<K, V, FK, FV>(
        &mut self,
        mut key: FK,
        mut value: FV,
    ) -> Result<Option<HashMap<K, V>>, ParseError>
    where
        K: Eq + Hash,
        FK: FnMut(&mut ParseContext) -> Result<Option<K>, ParseError>,
        FV: FnMut(&mut ParseContext) -> Result<Option<V>, ParseError>,
    {
        match self.ensure_positioned() {
            None | Some(JsonToken::Null) => return Ok(None),
            Some(JsonToken::StartObject) => {}
            Some(other) => return Err(ParseError::unexpected("map", other)),
        }

        let entry_depth = self.depth();
        let entry_parent = self.parent_element().map(str::to_owned);
        let target_depth = entry_depth + 1;
        let mut map = HashMap::new();

        loop {
            if self.next_token().is_none() {
                return Err(ParseError::UnexpectedEnd("map"));
            }
            if self.closes_scope(entry_depth, entry_parent.as_deref()) {
                break;
            }
            let at_key = matches!(self.current, Some(JsonToken::FieldName(_)))
                && self.depth() == target_depth;
            if !at_key {
                continue;
            }
            let k = key(self)?;
            if self.next_token().is_none() {
                return Err(ParseError::UnexpectedEnd("map"));
            }
            let v = value(self)?;
            if let (Some(k), Some(v)) = (k, v) {
                map.insert(k, v);
            }
        }

        Ok(Some(map))
    }
}
