use std::io::Cursor;
use std::path::Path;

use futures_util::TryStreamExt;
use reqwest::Client;
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::core::{self, Location};
use crate::data::{BoxReader, HttpReadOptions, OptionPayload, SourceOptions};
use crate::effects::http;
use crate::error::{ErrorCode, Result};

/// Turn source options into an owned reader.
///
/// `client` is only invoked for HTTP(S) sources.
pub async fn open<'c, F>(source: SourceOptions, client: F) -> Result<BoxReader>
where
    F: FnOnce() -> Result<&'c Client>,
{
    let SourceOptions { uri, reader, payload } = source;
    if let Some(reader) = reader {
        return Ok(reader);
    }

    let uri = uri.unwrap_or_default();
    match core::classify(&uri)? {
        Location::Data(data) => {
            debug!(mime = %data.mime, encoding = %data.encoding, "reading inline data uri");
            let bytes = data.decode()?;
            Ok(Box::pin(Cursor::new(bytes)))
        }
        Location::Http { uri, .. } => open_http(client()?, &uri, payload).await,
        Location::File(path) => open_file(&path).await,
    }
}

async fn open_http(client: &Client, uri: &str, payload: Option<OptionPayload>) -> Result<BoxReader> {
    let options = core::resolve::<HttpReadOptions>(payload)?.unwrap_or_default();
    let response = http::fetch(client, uri, options).await?;

    let body = response.bytes_stream().map_err(std::io::Error::other);
    Ok(Box::pin(StreamReader::new(body)))
}

pub async fn open_file(path: &Path) -> Result<BoxReader> {
    let metadata = tokio::fs::metadata(path).await;
    match metadata {
        Ok(meta) if !meta.is_dir() => {}
        Ok(_) => {
            return Err(ErrorCode::ProtoFileNoExist.error(format!(
                "local file [{}] does not exist",
                path.display()
            )));
        }
        Err(e) => {
            return Err(ErrorCode::ProtoFileNoExist.with_source(
                e,
                format!("local file [{}] does not exist", path.display()),
            ));
        }
    }

    debug!(path = %path.display(), "opening local source");
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        ErrorCode::ProtoFileOpen.with_source(e, format!("failed to open local file [{}]", path.display()))
    })?;
    Ok(Box::pin(file))
}
