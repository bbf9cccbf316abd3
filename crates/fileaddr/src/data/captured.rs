use std::ops::Deref;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;

/// Bytes captured by an in-memory copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BytesResult(Vec<u8>);

impl BytesResult {
    pub fn new(bytes: Vec<u8>) -> Self { Self(bytes) }

    pub fn hex(&self) -> String { hex::encode(&self.0) }

    pub fn base64(&self) -> String { STANDARD.encode(&self.0) }

    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    pub fn into_inner(self) -> Vec<u8> { self.0 }
}

impl Deref for BytesResult {
    type Target = [u8];

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl AsRef<[u8]> for BytesResult {
    fn as_ref(&self) -> &[u8] { &self.0 }
}

impl From<Vec<u8>> for BytesResult {
    fn from(value: Vec<u8>) -> Self { Self(value) }
}

impl From<BytesResult> for Vec<u8> {
    fn from(value: BytesResult) -> Self { value.0 }
}

impl From<BytesResult> for Bytes {
    fn from(value: BytesResult) -> Self { Bytes::from(value.0) }
}
