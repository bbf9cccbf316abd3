use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::{self, Location};
use crate::data::{DynWriter, OptionPayload, TargetOptions};
use crate::error::{ErrorCode, Result};

/// Resolved write destination. Nothing is opened until the source has been
/// accepted.
pub enum Destination<'a> {
    Writer(DynWriter<'a>),
    File(PathBuf),
    Http {
        uri:     String,
        payload: Option<OptionPayload>,
    },
}

impl<'a> Destination<'a> {
    pub fn resolve(target: TargetOptions<'a>) -> Result<Self> {
        let TargetOptions { uri, writer, payload } = target;
        if let Some(writer) = writer {
            return Ok(Destination::Writer(writer));
        }

        let uri = uri.unwrap_or_default();
        let location = core::classify(&uri)?;
        debug!(scheme = location.scheme(), "resolved target location");
        match location {
            Location::Data(_) => Err(ErrorCode::UnsupportedProtocol.error("writing to a data uri is not supported")),
            Location::Http { uri, .. } => Ok(Destination::Http { uri, payload }),
            Location::File(path) => Ok(Destination::File(path)),
        }
    }
}

/// Replace whatever lives at `path` with a fresh, empty file.
///
/// Removal of the previous entry is best effort; directory and file creation
/// failures are reported.
pub async fn create_file(path: &Path) -> Result<tokio::fs::File> {
    remove_stale(path).await;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            ErrorCode::Mkdir.with_source(e, format!("failed to create directory [{}]", parent.display()))
        })?;
    }

    debug!(path = %path.display(), "creating local target");
    tokio::fs::File::create(path).await.map_err(|e| {
        ErrorCode::MkFile.with_source(e, format!("failed to create target file [{}]", path.display()))
    })
}

async fn remove_stale(path: &Path) {
    let removed = match tokio::fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(path).await,
        Ok(_) => tokio::fs::remove_file(path).await,
        Err(_) => return,
    };
    match removed {
        Err(e) if e.kind() != ErrorKind::NotFound => {
            warn!(path = %path.display(), error = %e, "failed to remove existing target");
        }
        _ => {}
    }
}
