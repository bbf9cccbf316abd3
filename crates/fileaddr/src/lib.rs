//! URI-addressed streaming copies gated by magic-byte signatures.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - `data` - Immutable options, file types and results
//! - `core` - Pure classification, signature matching and option resolution
//! - `effects` - I/O: stream copier, sources, targets, multipart upload bridge
//!
//! # Key Features
//!
//! - **Probe-First**: the first 10 bytes are matched before any destination is
//!   opened, so rejected streams leave no trace
//! - **Streaming Upload**: HTTP targets receive the copy as a multipart body fed
//!   by a background task
//! - **Flat Errors**: every failure carries a stable [`ErrorCode`]
//!
//! # Example
//!
//! ```
//! use fileaddr::{FileType, Parser};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> fileaddr::Result<()> {
//! let parser = Parser::new([FileType::PDF]);
//! let (file_type, bytes) = parser
//!     .copy_to_bytes("data:application/pdf;base64,JVBERi0xLg==")
//!     .await?;
//!
//! assert_eq!(file_type, FileType::pdf());
//! assert_eq!(bytes.hex(), "255044462d312e");
//! # Ok(())
//! # }
//! ```

mod core;
mod data;
mod effects;
mod error;

pub use crate::core::{DataUri, FromPayload, Location, SignatureRegistry, classify, resolve};
pub use data::{
    BoxReader, BytesResult, DEFAULT_FIELD_NAME, DEFAULT_READ_METHOD, DEFAULT_WRITE_METHOD, DynWriter,
    FileType, HttpReadOptions, HttpWriteOptions, OptionPayload, PROBE_LEN, SourceOptions, TargetOptions,
    TransportConfig, probe_hex,
};
pub use effects::{Parser, Probe, copy, probe};
pub use error::{Error, ErrorCode, Result};
