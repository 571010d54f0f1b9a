//! URI templates.
//!
//! An operation's URI template looks like
//! `2012-09-25/jobsByPipeline/{PipelineId}?Ascending={Ascending};PageToken={PageToken}`.
//! [`UriTemplate::parse`] splits it once into the literal path template, the
//! static query parameters (`name=literal`) and the dynamic ones
//! (`name={placeholder}`). [`UriTemplate::resolve`] then binds one request's
//! values.

use std::collections::HashMap;

/// A pre-split URI template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriTemplate {
    path: String,
    segments: Vec<PathSegment>,
    static_params: Vec<(String, String)>,
    /// Placeholder name -> query parameter name.
    dynamic_params: HashMap<String, String>,
}

/// The path and query parameters produced for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedUri {
    /// Resource path with every placeholder substituted.
    pub path: String,
    /// Query parameters in insertion order: dynamic first, then static.
    pub query: Vec<(String, String)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Placeholder(String),
}

impl UriTemplate {
    /// Split a template string.
    ///
    /// Query pairs are separated by `;` or `&`. A pair without `=` is a
    /// static parameter with an empty value.
    pub fn parse(template: &str) -> Self {
        let (path, query) = match template.split_once('?') {
            Some((path, query)) => (path, query),
            None => (template, ""),
        };

        let mut static_params = Vec::new();
        let mut dynamic_params = HashMap::new();

        for pair in query.split([';', '&']).filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            match placeholder_name(value) {
                Some(placeholder) => {
                    dynamic_params.insert(placeholder.to_string(), name.to_string());
                }
                None => static_params.push((name.to_string(), value.to_string())),
            }
        }

        Self {
            path: path.to_string(),
            segments: split_path(path),
            static_params,
            dynamic_params,
        }
    }

    /// The literal path template, placeholders included.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Constant query parameters added to every request.
    pub fn static_params(&self) -> &[(String, String)] {
        &self.static_params
    }

    /// Query parameter name bound to `placeholder`, if it is query-bound.
    pub fn query_param_for(&self, placeholder: &str) -> Option<&str> {
        self.dynamic_params.get(placeholder).map(String::as_str)
    }

    /// Bind request values to placeholders.
    ///
    /// Query-bound placeholders become query parameters, omitted when the
    /// value is absent or empty. Path placeholders are substituted, absent
    /// values (and placeholders with no binding) resolve to the empty string,
    /// and runs of `/` left behind are collapsed to one.
    pub fn resolve(&self, bindings: &[(&str, Option<String>)]) -> ResolvedUri {
        let bound = |name: &str| {
            bindings
                .iter()
                .rev()
                .find(|(placeholder, _)| *placeholder == name)
                .and_then(|(_, value)| value.as_deref())
        };

        let mut path = String::with_capacity(self.path.len());
        for segment in &self.segments {
            match segment {
                PathSegment::Literal(text) => path.push_str(text),
                PathSegment::Placeholder(name) => path.push_str(bound(name).unwrap_or("")),
            }
        }

        let mut query: Vec<(String, String)> = bindings
            .iter()
            .filter_map(|(placeholder, value)| {
                let name = self.query_param_for(placeholder)?;
                let value = value.as_deref().filter(|v| !v.is_empty())?;
                Some((name.to_string(), value.to_string()))
            })
            .collect();
        query.extend(self.static_params.iter().cloned());

        ResolvedUri {
            path: collapse_slashes(&path),
            query,
        }
    }
}

/// `{name}` -> `name`.
fn placeholder_name(value: &str) -> Option<&str> {
    value
        .strip_prefix('{')
        .and_then(|v| v.strip_suffix('}'))
        .filter(|v| !v.is_empty())
}

/// Split a path template into literal text and `{name}` placeholders.
///
/// An unterminated `{` stays literal.
fn split_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        if start > 0 {
            segments.push(PathSegment::Literal(rest[..start].to_string()));
        }
        segments.push(PathSegment::Placeholder(rest[start + 1..start + len].to_string()));
        rest = &rest[start + len + 1..];
    }
    if !rest.is_empty() {
        segments.push(PathSegment::Literal(rest.to_string()));
    }
    segments
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}
