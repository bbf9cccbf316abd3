//! Error types for fileaddr.

use std::fmt;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Flat error taxonomy. Discriminants are stable and start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    /// Creating a directory failed.
    Mkdir = 1,
    /// Creating a file failed.
    MkFile,
    UnsupportedProtocol,
    /// The signature registry is empty.
    NoSupportedTypes,
    /// The addressed resource does not exist.
    ProtoFileNoExist,
    ProtoFileOpen,
    ProtoFileRead,
    /// The stream matched no registered signature.
    UnsupportedFileType,
    TargetFileWrite,
    HttpRequestCreate,
    HttpRequest,
    /// HTTP status outside 200..=299.
    StatusCode,
    EmptyStream,
    InvalidOption,
}

impl ErrorCode {
    pub fn code(self) -> u8 { self as u8 }

    pub fn error(self, message: impl Into<String>) -> Error {
        Error {
            code:    self,
            message: message.into(),
            source:  None,
        }
    }

    pub fn with_source<E>(self, source: E, message: impl Into<String>) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            code:    self,
            message: message.into(),
            source:  Some(source.into()),
        }
    }

    /// Whether `err` is an [`Error`] carrying this code.
    pub fn matches(self, err: &(dyn std::error::Error + 'static)) -> bool {
        err.downcast_ref::<Error>()
            .is_some_and(|e| e.code == self)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::Mkdir => "mkdir",
            ErrorCode::MkFile => "mkfile",
            ErrorCode::UnsupportedProtocol => "unsupported protocol",
            ErrorCode::NoSupportedTypes => "no supported file types",
            ErrorCode::ProtoFileNoExist => "resource does not exist",
            ErrorCode::ProtoFileOpen => "resource open failed",
            ErrorCode::ProtoFileRead => "resource read failed",
            ErrorCode::UnsupportedFileType => "unsupported file type",
            ErrorCode::TargetFileWrite => "target write failed",
            ErrorCode::HttpRequestCreate => "http request create failed",
            ErrorCode::HttpRequest => "http request failed",
            ErrorCode::StatusCode => "invalid status code",
            ErrorCode::EmptyStream => "empty stream",
            ErrorCode::InvalidOption => "invalid option",
        };
        write!(f, "{name} ({})", self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    code:    ErrorCode,
    message: String,
    #[source]
    source:  Option<BoxError>,
}

impl Error {
    pub fn code(&self) -> ErrorCode { self.code }

    pub fn message(&self) -> &str { &self.message }

    pub fn is(&self, code: ErrorCode) -> bool { self.code == code }
}

impl PartialEq<ErrorCode> for Error {
    fn eq(&self, other: &ErrorCode) -> bool { self.code == *other }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_matches_dyn_error() {
        let err: Box<dyn std::error::Error + Send + Sync> = ErrorCode::Mkdir.error("mkdir failed").into();

        assert!(ErrorCode::Mkdir.matches(err.as_ref()));
        assert!(!ErrorCode::MkFile.matches(err.as_ref()));
    }

    #[test]
    fn test_error_compares_with_code() {
        let err = ErrorCode::Mkdir.error("mkdir failed");

        assert!(err == ErrorCode::Mkdir);
        assert!(err.is(ErrorCode::Mkdir));
        assert!(!err.is(ErrorCode::MkFile));
        assert_eq!(err.to_string(), "mkdir failed");
    }

    #[test]
    fn test_foreign_error_never_matches() {
        let err = std::io::Error::other("boom");
        assert!(!ErrorCode::TargetFileWrite.matches(&err));
    }

    #[test]
    fn test_source_is_preserved() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ErrorCode::ProtoFileOpen.with_source(io, "open failed");

        assert_eq!(err.source().map(|s| s.to_string()), Some("gone".to_string()));
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::Mkdir.code(), 1);
        assert_eq!(ErrorCode::UnsupportedFileType.code(), 8);
        assert_eq!(ErrorCode::InvalidOption.code(), 14);
    }
}
