//! Type-gated stream copy.
//!
//! The copy runs in two stages. [`probe`] reads the first bytes and matches
//! them against the registry without touching the destination; [`Probe::forward`]
//! writes the probed bytes and streams the remainder through unchanged. Callers
//! that open their destination lazily (files, uploads) probe first so that a
//! rejected stream never creates, truncates or sends anything.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use crate::core::SignatureRegistry;
use crate::data::{FileType, PROBE_LEN, probe_hex};
use crate::error::{Error, ErrorCode, Result};

const COPY_BUF_LEN: usize = 64 * 1024;

/// A stream head that matched a registered signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    file_type: FileType,
    head:      Vec<u8>,
}

impl Probe {
    pub fn file_type(&self) -> &FileType { &self.file_type }

    pub fn head(&self) -> &[u8] { &self.head }

    /// Write the probed head followed by the rest of `reader`, then flush.
    ///
    /// Past the probe every failure, read side included, is
    /// [`ErrorCode::TargetFileWrite`].
    pub async fn forward<R, W>(self, reader: &mut R, writer: &mut W) -> Result<FileType>
    where
        R: AsyncRead + Unpin + ?Sized,
        W: AsyncWrite + Unpin + ?Sized,
    {
        writer.write_all(&self.head).await.map_err(write_error)?;

        let mut buf = vec![0u8; COPY_BUF_LEN];
        let mut total = self.head.len() as u64;
        loop {
            let n = reader.read(&mut buf).await.map_err(transfer_error)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n]).await.map_err(write_error)?;
            total += n as u64;
        }
        writer.flush().await.map_err(write_error)?;

        trace!(file_type = %self.file_type, bytes = total, "stream forwarded");
        Ok(self.file_type)
    }
}

/// Read up to [`PROBE_LEN`] bytes and match them against `registry`.
///
/// Short reads are retried until the probe is full or the source reaches EOF;
/// a short stream is matched as-is.
pub async fn probe<R>(registry: &SignatureRegistry, reader: &mut R) -> Result<Probe>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut head = vec![0u8; PROBE_LEN];
    let mut filled = 0;
    while filled < PROBE_LEN {
        let n = reader.read(&mut head[filled..]).await.map_err(read_error)?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    head.truncate(filled);

    let hex = probe_hex(&head);
    let Some(file_type) = registry.match_hex(&hex) else {
        debug!(probe = %hex, "no registered signature matches");
        return Err(ErrorCode::UnsupportedFileType.error(format!("unsupported file type, header [{hex}]")));
    };

    debug!(probe = %hex, file_type = %file_type, "signature matched");
    Ok(Probe {
        file_type: file_type.clone(),
        head,
    })
}

/// Probe then forward in one call.
pub async fn copy<R, W>(registry: &SignatureRegistry, reader: &mut R, writer: &mut W) -> Result<FileType>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    probe(registry, reader).await?.forward(reader, writer).await
}

fn read_error(e: std::io::Error) -> Error {
    ErrorCode::ProtoFileRead.with_source(e, "failed to read source content")
}

fn write_error(e: std::io::Error) -> Error {
    ErrorCode::TargetFileWrite.with_source(e, "failed to write to target")
}

fn transfer_error(e: std::io::Error) -> Error {
    ErrorCode::TargetFileWrite.with_source(e, "failed to copy source content to target")
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use super::*;

    /// Hands out one byte per read to exercise short reads.
    struct Trickle<'a>(&'a [u8]);

    impl<'a> AsyncRead for Trickle<'a> {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let data: &'a [u8] = self.0;
            if let Some((first, rest)) = data.split_first() {
                buf.put_slice(&[*first]);
                self.0 = rest;
            }
            Poll::Ready(Ok(()))
        }
    }

    struct Failing;

    impl AsyncRead for Failing {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut tokio::io::ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::other("disk on fire")))
        }
    }

    fn pdf_registry() -> SignatureRegistry { SignatureRegistry::new([FileType::PDF]) }

    #[tokio::test]
    async fn test_copy_preserves_every_byte() {
        let source = b"%PDF-1.7\nthis is well past the probe window".to_vec();
        let mut out = Vec::new();

        let file_type = copy(&pdf_registry(), &mut source.as_slice(), &mut out)
            .await
            .unwrap();

        assert_eq!(file_type, FileType::pdf());
        assert_eq!(out, source);
    }

    #[tokio::test]
    async fn test_eleven_byte_pdf() {
        let source: [u8; 11] = [0x25, 0x50, 0x44, 0x46, 0x2D, 0x31, 0x2E, 0x35, 0x0A, 0x25, 0xFF];
        let mut out = Vec::new();

        let file_type = copy(&pdf_registry(), &mut &source[..], &mut out).await.unwrap();

        assert_eq!(file_type.as_str(), "255044462d312e");
        assert_eq!(out, source);
    }

    #[tokio::test]
    async fn test_short_reads_fill_probe() {
        let source = b"%PDF-1.4 trickled";
        let mut out = Vec::new();

        let file_type = copy(&pdf_registry(), &mut Trickle(source), &mut out).await.unwrap();

        assert_eq!(file_type, FileType::pdf());
        assert_eq!(out, source);
    }

    #[tokio::test]
    async fn test_mismatch_writes_nothing() {
        let mut out = Vec::new();

        let err = copy(&pdf_registry(), &mut &b"PK\x03\x04zipdata"[..], &mut out)
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::UnsupportedFileType);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_stream_shorter_than_probe() {
        let registry = SignatureRegistry::new([FileType::GZIP]);
        let mut out = Vec::new();

        let file_type = copy(&registry, &mut &b"\x1f\x8b\x08"[..], &mut out).await.unwrap();

        assert_eq!(file_type, FileType::gzip());
        assert_eq!(out, b"\x1f\x8b\x08");
    }

    #[tokio::test]
    async fn test_empty_signature_accepts_empty_stream() {
        let registry = SignatureRegistry::new([""]);
        let mut out = Vec::new();

        let file_type = copy(&registry, &mut &b""[..], &mut out).await.unwrap();

        assert!(file_type.is_empty());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_read_error_is_proto_file_read() {
        let mut out = Vec::new();
        let err = copy(&pdf_registry(), &mut Failing, &mut out).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProtoFileRead);
    }

    #[tokio::test]
    async fn test_read_error_after_probe_is_target_write() {
        let mut reader = (&b"%PDF-1.7 abcdef"[..]).chain(Failing);
        let mut out = Vec::new();

        let err = copy(&pdf_registry(), &mut reader, &mut out).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::TargetFileWrite);
        assert_eq!(out, b"%PDF-1.7 abcdef");
    }

    #[tokio::test]
    async fn test_probe_then_forward() {
        let mut reader = &b"%PDF-1.5 body"[..];

        let probe = probe(&pdf_registry(), &mut reader).await.unwrap();
        assert_eq!(probe.head(), b"%PDF-1.5 b");

        let mut out = Vec::new();
        probe.forward(&mut reader, &mut out).await.unwrap();
        assert_eq!(out, b"%PDF-1.5 body");
    }
}
