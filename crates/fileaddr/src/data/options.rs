use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncWrite};

/// Owned, sendable byte source.
pub type BoxReader = Pin<Box<dyn AsyncRead + Send>>;

/// Borrowed byte sink supplied by the caller.
pub type DynWriter<'a> = &'a mut (dyn AsyncWrite + Send + Unpin);

pub const DEFAULT_READ_METHOD: &str = "GET";
pub const DEFAULT_WRITE_METHOD: &str = "POST";
pub const DEFAULT_FIELD_NAME: &str = "file";

/// Request shape used when the source is an HTTP(S) URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HttpReadOptions {
    /// Empty means GET.
    pub method:   String,
    pub headers:  HashMap<String, Vec<String>>,
    /// Appended to the query string.
    pub form:     HashMap<String, Vec<String>>,
    /// Sent as the request body when non-empty.
    pub req_body: String,
}

impl HttpReadOptions {
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }

    #[must_use]
    pub fn form_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.entry(name.into()).or_default().push(value.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.req_body = body.into();
        self
    }

    /// Upper-cased method, GET when unset.
    pub fn effective_method(&self) -> String { effective_method(&self.method, DEFAULT_READ_METHOD) }
}

/// Request shape used when the target is an HTTP(S) URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HttpWriteOptions {
    /// Empty means POST.
    pub method:     String,
    /// Multipart field of the file part; empty means `file`.
    pub field_name: String,
    /// Empty means the last path segment of the target URI.
    pub filename:   String,
    pub headers:    HashMap<String, Vec<String>>,
    /// Extra form fields written before the file part.
    pub form:       BTreeMap<String, String>,
}

impl HttpWriteOptions {
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    #[must_use]
    pub fn field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }

    #[must_use]
    pub fn form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), value.into());
        self
    }

    pub fn effective_method(&self) -> String { effective_method(&self.method, DEFAULT_WRITE_METHOD) }

    pub fn effective_field_name(&self) -> &str {
        if self.field_name.is_empty() {
            DEFAULT_FIELD_NAME
        } else {
            &self.field_name
        }
    }

    /// Filename sent with the file part, falling back to the text after the
    /// last `/` of `uri`.
    pub fn effective_filename(&self, uri: &str) -> String {
        if !self.filename.is_empty() {
            return self.filename.clone();
        }
        match uri.rfind('/') {
            Some(i) => uri[i + 1..].to_string(),
            None => uri.to_string(),
        }
    }
}

fn effective_method(method: &str, default: &str) -> String {
    if method.is_empty() {
        default.to_string()
    } else {
        method.to_ascii_uppercase()
    }
}

/// Protocol-specific payload attached to source or target options.
///
/// Typed shapes are used as-is; JSON representations are deserialized into
/// whichever shape the resolved protocol expects.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionPayload {
    HttpRead(HttpReadOptions),
    HttpWrite(HttpWriteOptions),
    Json(String),
    JsonBytes(Vec<u8>),
    Value(serde_json::Value),
}

impl From<HttpReadOptions> for OptionPayload {
    fn from(value: HttpReadOptions) -> Self { Self::HttpRead(value) }
}

impl From<HttpWriteOptions> for OptionPayload {
    fn from(value: HttpWriteOptions) -> Self { Self::HttpWrite(value) }
}

impl From<String> for OptionPayload {
    fn from(value: String) -> Self { Self::Json(value) }
}

impl From<&str> for OptionPayload {
    fn from(value: &str) -> Self { Self::Json(value.to_string()) }
}

impl From<Vec<u8>> for OptionPayload {
    fn from(value: Vec<u8>) -> Self { Self::JsonBytes(value) }
}

impl From<serde_json::Value> for OptionPayload {
    fn from(value: serde_json::Value) -> Self { Self::Value(value) }
}

/// Where a copy reads from. A direct reader takes precedence over the URI.
///
/// # Examples
///
/// ```
/// use fileaddr::{HttpReadOptions, SourceOptions};
///
/// let source = SourceOptions::http(HttpReadOptions::default().header("Authorization", "Bearer token"))
///     .uri("https://example.com/report.pdf");
/// assert_eq!(source.get_uri(), Some("https://example.com/report.pdf"));
/// ```
#[derive(Default)]
pub struct SourceOptions {
    pub(crate) uri:     Option<String>,
    pub(crate) reader:  Option<BoxReader>,
    pub(crate) payload: Option<OptionPayload>,
}

impl SourceOptions {
    pub fn new() -> Self { Self::default() }

    pub fn from_uri(uri: impl Into<String>) -> Self { Self::new().uri(uri) }

    pub fn http(options: HttpReadOptions) -> Self { Self::with_payload(options) }

    pub fn with_payload(payload: impl Into<OptionPayload>) -> Self {
        Self {
            payload: Some(payload.into()),
            ..Self::default()
        }
    }

    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        Self::new().reader(reader)
    }

    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    #[must_use]
    pub fn reader<R>(mut self, reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        self.reader = Some(Box::pin(reader));
        self
    }

    #[must_use]
    pub fn payload(mut self, payload: impl Into<OptionPayload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn get_uri(&self) -> Option<&str> { self.uri.as_deref() }
}

impl fmt::Debug for SourceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceOptions")
            .field("uri", &self.uri)
            .field("reader", &self.reader.as_ref().map(|_| "{ ... }"))
            .field("payload", &self.payload)
            .finish()
    }
}

/// Where a copy writes to. A direct writer takes precedence over the URI.
#[derive(Default)]
pub struct TargetOptions<'a> {
    pub(crate) uri:     Option<String>,
    pub(crate) writer:  Option<DynWriter<'a>>,
    pub(crate) payload: Option<OptionPayload>,
}

impl<'a> TargetOptions<'a> {
    pub fn new() -> Self { Self::default() }

    pub fn from_uri(uri: impl Into<String>) -> Self { Self::new().uri(uri) }

    pub fn http(options: HttpWriteOptions) -> Self { Self::with_payload(options) }

    pub fn with_payload(payload: impl Into<OptionPayload>) -> Self {
        Self {
            payload: Some(payload.into()),
            ..Self::default()
        }
    }

    pub fn from_writer(writer: DynWriter<'a>) -> Self { Self::new().writer(writer) }

    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    #[must_use]
    pub fn writer(mut self, writer: DynWriter<'a>) -> Self {
        self.writer = Some(writer);
        self
    }

    #[must_use]
    pub fn payload(mut self, payload: impl Into<OptionPayload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn get_uri(&self) -> Option<&str> { self.uri.as_deref() }
}

impl fmt::Debug for TargetOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetOptions")
            .field("uri", &self.uri)
            .field("writer", &self.writer.as_ref().map(|_| "{ ... }"))
            .field("payload", &self.payload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_defaults() {
        let options = HttpReadOptions::default();
        assert_eq!(options.effective_method(), "GET");

        let options = options.method("post");
        assert_eq!(options.effective_method(), "POST");
    }

    #[test]
    fn test_write_defaults() {
        let options = HttpWriteOptions::default();
        assert_eq!(options.effective_method(), "POST");
        assert_eq!(options.effective_field_name(), "file");
        assert_eq!(options.effective_filename("http://host/upload/report.pdf"), "report.pdf");
    }

    #[test]
    fn test_explicit_filename_wins() {
        let options = HttpWriteOptions::default().filename("a.pdf");
        assert_eq!(options.effective_filename("http://host/upload/b.pdf"), "a.pdf");
    }

    #[test]
    fn test_json_wire_names() {
        let json = r#"{"Method":"put","FieldName":"doc","Filename":"x.pdf","Form":{"k":"v"}}"#;
        let options: HttpWriteOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.effective_method(), "PUT");
        assert_eq!(options.effective_field_name(), "doc");
        assert_eq!(options.form.get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_read_headers_accumulate() {
        let options = HttpReadOptions::default()
            .header("X-Token", "a")
            .header("X-Token", "b");
        assert_eq!(options.headers["X-Token"], vec!["a", "b"]);
    }

    #[test]
    fn test_source_debug_hides_reader() {
        let source = SourceOptions::from_reader(&b"abc"[..]).uri("file:///tmp/x");
        let debug = format!("{source:?}");
        assert!(debug.contains("{ ... }"));
        assert!(debug.contains("file:///tmp/x"));
    }
}
