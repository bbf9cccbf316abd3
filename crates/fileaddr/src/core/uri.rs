//! URI classification.
//!
//! Inline data URIs are detected before any percent-decoding so that their
//! payload is never rewritten; everything else is decoded and parsed as a
//! generic URI.

use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

use crate::error::{ErrorCode, Result};

static DATA_URI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^data:(?<type>[A-Za-z0-9.+-]+)/(?<subtype>[A-Za-z0-9.+-]+)(?<params>(?:;[^;,]*)+),(?<payload>.*)$").unwrap()
});

/// Inline payload carried by a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime:     String,
    /// Lowercased encoding token, the last `;` parameter before the comma.
    pub encoding: String,
    pub payload:  String,
}

impl DataUri {
    pub fn parse(uri: &str) -> Option<Self> {
        let caps = DATA_URI_REGEX.captures(uri)?;
        let encoding = caps["params"]
            .rsplit(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        Some(Self {
            mime: format!("{}/{}", &caps["type"], &caps["subtype"]).to_ascii_lowercase(),
            encoding,
            payload: caps["payload"].to_string(),
        })
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        let decoded = match self.encoding.as_str() {
            "base64" => STANDARD.decode(self.payload.as_bytes()).map_err(|e| e.to_string()),
            "hex" => hex::decode(self.payload.as_bytes()).map_err(|e| e.to_string()),
            other => {
                return Err(ErrorCode::UnsupportedProtocol
                    .error(format!("unsupported data uri encoding: {other}")));
            }
        };

        decoded.map_err(|e| {
            ErrorCode::UnsupportedProtocol.error(format!(
                "failed to decode {} data uri content: {e}",
                self.encoding
            ))
        })
    }
}

/// A classified address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Data(DataUri),
    /// `uri` is the percent-decoded form used for the request.
    Http { uri: String, url: Url },
    File(PathBuf),
}

impl Location {
    pub fn scheme(&self) -> &str {
        match self {
            Location::Data(_) => "data",
            Location::Http { url, .. } => url.scheme(),
            Location::File(_) => "file",
        }
    }
}

pub fn classify(uri: &str) -> Result<Location> {
    if uri.is_empty() {
        return Err(ErrorCode::UnsupportedProtocol.error("empty address is not supported"));
    }

    if let Some(data) = DataUri::parse(uri) {
        return Ok(Location::Data(data));
    }

    // Escapes that do not decode to UTF-8 stay encoded.
    let decoded = match percent_decode_str(uri).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => uri.to_string(),
    };

    let url = Url::parse(&decoded).map_err(|e| {
        let message = format!("unsupported address [{decoded}]: {e}");
        ErrorCode::UnsupportedProtocol.with_source(e, message)
    })?;

    match url.scheme() {
        "http" | "https" => Ok(Location::Http { uri: decoded, url }),
        "file" => Ok(Location::File(file_path(&url))),
        other => Err(ErrorCode::UnsupportedProtocol.error(format!("unsupported protocol: {other}"))),
    }
}

fn file_path(url: &Url) -> PathBuf {
    let mut raw = url.host_str().unwrap_or_default().as_bytes().to_vec();
    raw.extend(percent_decode_str(url.path()));
    path_from_bytes(raw)
}

#[cfg(unix)]
fn path_from_bytes(raw: Vec<u8>) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    PathBuf::from(OsString::from_vec(raw))
}

#[cfg(not(unix))]
fn path_from_bytes(raw: Vec<u8>) -> PathBuf {
    let joined = String::from_utf8_lossy(&raw);
    PathBuf::from(joined.trim_start_matches(['/', '\\']))
}
