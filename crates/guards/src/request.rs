//! Framework-neutral view of an inbound HTTP request.
//!
//! The web layer builds a [`RequestDescriptor`] from whatever request type it
//! has and hands it to a verifier. Nothing here is mutated by verification.

use std::borrow::Cow;
use std::collections::HashMap;
use url::form_urlencoded;

/// A query parameter value; repeated keys collapse into [`QueryValue::Multi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// The value when the key appeared exactly once
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(v) => Some(v),
            Self::Multi(_) => None,
        }
    }

    /// All values comma-joined, the form a multi-valued key is signed in
    pub fn joined(&self) -> Cow<'_, str> {
        match self {
            Self::Single(v) => Cow::Borrowed(v),
            Self::Multi(vs) => Cow::Owned(vs.join(",")),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(first) => {
                let first = std::mem::take(first);
                *self = Self::Multi(vec![first, value]);
            }
            Self::Multi(vs) => vs.push(value),
        }
    }
}

/// Decoded query parameters in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    /// An empty parameter list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw `application/x-www-form-urlencoded` query string.
    /// A leading `?` is ignored.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Add a value; a repeated key becomes multi-valued
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.push(value),
            None => self.entries.push((key, QueryValue::Single(value))),
        }
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value of `key`, single or repeated
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Value of a key that appeared exactly once
    pub fn get_single(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(QueryValue::as_single)
    }

    /// True when `key` appeared at least once
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Parameters in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no parameters
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Header map with case-insensitive names
#[derive(Debug, Clone, Default)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    /// An empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header; a later value for the same name replaces the earlier one
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.inner
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Value of `name`, matched case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Number of distinct header names
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when no headers are set
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

/// Everything a verifier needs from one request
///
/// `raw_body` must be the bytes as received, captured before any body
/// parsing; a re-serialized body will not verify.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: String,
    query: QueryParams,
    headers: Headers,
    raw_body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    /// A request with `method` and nothing else
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            query: QueryParams::new(),
            headers: Headers::new(),
            raw_body: None,
        }
    }

    /// A bare `GET` request
    pub fn get() -> Self {
        Self::new("GET")
    }

    /// A bare `POST` request
    pub fn post() -> Self {
        Self::new("POST")
    }

    /// Replace the query parameters
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Parse and attach a raw query string
    pub fn with_raw_query(self, raw: &str) -> Self {
        self.with_query(QueryParams::parse(raw))
    }

    /// Replace all headers
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Add one header
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach the body bytes exactly as received
    pub fn with_raw_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.raw_body = Some(body.into());
        self
    }

    /// HTTP method, as received
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Decoded query parameters
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Request headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Raw body, if the framework captured it
    pub fn raw_body(&self) -> Option<&[u8]> {
        self.raw_body.as_deref()
    }
}
