use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of leading bytes inspected when sniffing a stream.
pub const PROBE_LEN: usize = 10;

/// Hex-encoded binary signature prefix identifying a file format.
///
/// A candidate matches when this value is a prefix of the candidate's hex
/// encoding. The empty value is a prefix of everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FileType(String);

impl FileType {
    pub const EMPTY: &'static str = "";
    pub const PDF: &'static str = "255044462d312e";
    pub const PNG: &'static str = "89504e470d0a1a0a";
    pub const JPEG: &'static str = "ffd8ff";
    pub const GIF: &'static str = "47494638";
    pub const ZIP: &'static str = "504b0304";
    pub const GZIP: &'static str = "1f8b";

    /// Build from a hex string; case is normalized to lowercase.
    pub fn new(hex: impl AsRef<str>) -> Self { Self(hex.as_ref().to_ascii_lowercase()) }

    /// Build from raw signature bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self { Self(hex::encode(bytes)) }

    pub fn pdf() -> Self { Self::new(Self::PDF) }

    pub fn png() -> Self { Self::new(Self::PNG) }

    pub fn jpeg() -> Self { Self::new(Self::JPEG) }

    pub fn gif() -> Self { Self::new(Self::GIF) }

    pub fn zip() -> Self { Self::new(Self::ZIP) }

    pub fn gzip() -> Self { Self::new(Self::GZIP) }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Prefix test against a lowercase hex candidate.
    pub fn is(&self, candidate_hex: &str) -> bool { candidate_hex.starts_with(&self.0) }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<String> for FileType {
    fn from(value: String) -> Self { Self::new(value) }
}

impl From<&str> for FileType {
    fn from(value: &str) -> Self { Self::new(value) }
}

impl From<FileType> for String {
    fn from(value: FileType) -> Self { value.0 }
}

/// Lowercase hex of at most the first [`PROBE_LEN`] bytes.
pub fn probe_hex(bytes: &[u8]) -> String {
    let end = bytes.len().min(PROBE_LEN);
    hex::encode(&bytes[..end])
}
