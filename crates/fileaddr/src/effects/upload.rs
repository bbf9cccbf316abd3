//! Multipart upload fed by a background copy.
//!
//! ```text
//!  source ──► copy task ──► duplex pipe ──► multipart body ──► HTTP request
//!                 │                                                │
//!                 └──────── oneshot Result<FileType> ◄── awaited after response
//! ```
//!
//! The request is sent before the result channel is awaited. The copy task
//! blocks on pipe writes until the transport drains them, so awaiting the
//! channel first would stall both sides.
//!
//! Once the response has arrived the body is closed: a copy task still
//! waiting on the pipe stops with [`ErrorCode::TargetFileWrite`] instead of
//! blocking on a server that no longer reads. Dropping the upload future
//! closes it the same way.

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tokio::sync::oneshot;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::core;
use crate::data::{BoxReader, FileType, HttpWriteOptions, OptionPayload};
use crate::effects::copier::Probe;
use crate::effects::http;
use crate::error::{ErrorCode, Result};

const PIPE_CAPACITY: usize = 64 * 1024;

/// Upload the probed stream as the file part of a multipart request.
pub async fn upload(
    client: &Client,
    uri: &str,
    payload: Option<OptionPayload>,
    probe: Probe,
    mut reader: BoxReader,
) -> Result<FileType> {
    let options = core::resolve::<HttpWriteOptions>(payload)?.unwrap_or_default();
    let method = http::parse_method(&options.effective_method())?;
    let headers = http::header_map(&options.headers)?;
    let field_name = options.effective_field_name().to_string();
    let filename = options.effective_filename(uri);

    let (pipe_reader, mut pipe_writer) = tokio::io::duplex(PIPE_CAPACITY);

    let mut form = Form::new();
    for (name, value) in options.form {
        form = form.text(name, value);
    }
    let file_part = Part::stream(reqwest::Body::wrap_stream(ReaderStream::new(pipe_reader))).file_name(filename.clone());
    form = form.part(field_name.clone(), file_part);

    let (result_tx, result_rx) = oneshot::channel::<Result<FileType>>();
    let (closed_tx, closed_rx) = oneshot::channel::<()>();
    let producer = tokio::spawn(async move {
        let result = tokio::select! {
            biased;
            result = probe.forward(&mut reader, &mut pipe_writer) => result,
            _ = closed_rx => Err(ErrorCode::TargetFileWrite.error("target closed the upload before the body was sent")),
        };
        // end of body
        drop(pipe_writer);
        let _ = result_tx.send(result);
    });

    debug!(%method, %uri, field = %field_name, %filename, "uploading to http target");
    let response = match client.request(method, uri).headers(headers).multipart(form).send().await {
        Ok(response) => response,
        Err(e) => {
            producer.abort();
            let message = format!("failed to send data to target: {e}");
            return Err(ErrorCode::TargetFileWrite.with_source(e, message));
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!(%uri, status = status.as_u16(), "upload rejected by target");
        producer.abort();
        return Err(ErrorCode::TargetFileWrite.error(format!(
            "target returned invalid status code: {}",
            status.as_u16()
        )));
    }

    drop(response);
    let _ = closed_tx.send(());

    match result_rx.await {
        Ok(result) => result,
        Err(_) => Err(ErrorCode::TargetFileWrite.error("upload copy task ended without a result")),
    }
}
