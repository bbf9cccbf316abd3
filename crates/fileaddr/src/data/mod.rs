//! Data layer: immutable types for copy configuration and results.

mod captured;
mod config;
mod file_type;
mod options;

pub use captured::BytesResult;
pub use config::TransportConfig;
pub use file_type::{FileType, PROBE_LEN, probe_hex};
pub use options::{
    BoxReader, DEFAULT_FIELD_NAME, DEFAULT_READ_METHOD, DEFAULT_WRITE_METHOD, DynWriter,
    HttpReadOptions, HttpWriteOptions, OptionPayload, SourceOptions, TargetOptions,
};
