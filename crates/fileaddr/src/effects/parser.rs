use std::path::Path;

use once_cell::sync::OnceCell;
use reqwest::Client;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::core::SignatureRegistry;
use crate::data::{BytesResult, FileType, SourceOptions, TargetOptions, TransportConfig};
use crate::effects::target::{self, Destination};
use crate::effects::{copier, http, source, upload};
use crate::error::{ErrorCode, Result};

/// Copies between URI-addressed endpoints, admitting only streams whose
/// leading bytes match a registered signature.
///
/// # Examples
///
/// ```no_run
/// use fileaddr::{FileType, Parser};
///
/// # async fn run() -> fileaddr::Result<()> {
/// let parser = Parser::new([FileType::PDF]);
/// let file_type = parser
///     .copy_by_uri("https://example.com/report.pdf", "file:///tmp/report.pdf")
///     .await?;
/// assert_eq!(file_type, FileType::pdf());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Parser {
    registry:  SignatureRegistry,
    transport: TransportConfig,
    client:    OnceCell<Client>,
}

impl Parser {
    pub fn new<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FileType>,
    {
        Self::with_transport(types, TransportConfig::default())
    }

    pub fn with_transport<I, T>(types: I, transport: TransportConfig) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FileType>,
    {
        Self {
            registry: SignatureRegistry::new(types),
            transport,
            client: OnceCell::new(),
        }
    }

    pub fn add_types<I, T>(&mut self, types: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<FileType>,
    {
        self.registry.add(types);
    }

    pub fn remove_types<I, T>(&mut self, types: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<FileType>,
    {
        self.registry.remove(types);
    }

    /// Registered signatures, sorted for stable output.
    pub fn supported_types(&self) -> Vec<FileType> {
        let mut types: Vec<FileType> = self.registry.iter().cloned().collect();
        types.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        types
    }

    pub fn is_supported(&self, file_type: &FileType) -> bool { self.registry.contains(file_type) }

    pub fn registry(&self) -> &SignatureRegistry { &self.registry }

    pub fn transport(&self) -> &TransportConfig { &self.transport }

    fn client(&self) -> Result<&Client> { self.client.get_or_try_init(|| http::build_client(&self.transport)) }

    fn ensure_types(&self) -> Result<()> {
        if self.registry.is_empty() {
            return Err(ErrorCode::NoSupportedTypes.error("no supported file types registered"));
        }
        Ok(())
    }

    /// Copy between a caller-supplied reader and writer.
    ///
    /// A missing endpoint is [`ErrorCode::EmptyStream`]. An empty registry is
    /// not rejected here; it simply matches nothing.
    pub async fn copy<R, W>(&self, reader: Option<R>, writer: Option<W>) -> Result<FileType>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (Some(mut reader), Some(mut writer)) = (reader, writer) else {
            return Err(ErrorCode::EmptyStream.error("reader and writer are both required"));
        };
        copier::copy(&self.registry, &mut reader, &mut writer).await
    }

    pub async fn copy_by_uri(&self, src: &str, dst: &str) -> Result<FileType> {
        self.copy_with_option(SourceOptions::from_uri(src), TargetOptions::from_uri(dst))
            .await
    }

    /// Resolve both endpoints and copy.
    ///
    /// The source is probed before the destination is opened: a rejected
    /// stream never creates a file or sends an upload.
    pub async fn copy_with_option(&self, source: SourceOptions, target: TargetOptions<'_>) -> Result<FileType> {
        self.ensure_types()?;

        let destination = Destination::resolve(target)?;
        let mut reader = source::open(source, || self.client()).await?;
        let probe = copier::probe(&self.registry, &mut reader).await?;

        match destination {
            Destination::Writer(writer) => probe.forward(&mut reader, writer).await,
            Destination::File(path) => {
                let mut file = target::create_file(&path).await?;
                probe.forward(&mut reader, &mut file).await
            }
            Destination::Http { uri, payload } => upload::upload(self.client()?, &uri, payload, probe, reader).await,
        }
    }

    /// Copy `src` into a local path.
    pub async fn copy_to_path(&self, src: &str, path: impl AsRef<Path>) -> Result<FileType> {
        self.ensure_types()?;

        let path = path.as_ref();
        let mut reader = source::open(SourceOptions::from_uri(src), || self.client()).await?;
        let probe = copier::probe(&self.registry, &mut reader).await?;

        let mut file = target::create_file(path).await?;
        probe.forward(&mut reader, &mut file).await
    }

    pub async fn copy_to_bytes(&self, src: &str) -> Result<(FileType, BytesResult)> {
        self.copy_to_bytes_with_option(SourceOptions::from_uri(src)).await
    }

    /// Copy the source into memory.
    ///
    /// Failures of the copy itself are reported as
    /// [`ErrorCode::TargetFileWrite`] with the underlying error as source.
    pub async fn copy_to_bytes_with_option(&self, source: SourceOptions) -> Result<(FileType, BytesResult)> {
        self.ensure_types()?;

        let mut reader = source::open(source, || self.client()).await?;
        let mut buf = Vec::new();
        let file_type = copier::copy(&self.registry, &mut reader, &mut buf)
            .await
            .map_err(|e| ErrorCode::TargetFileWrite.with_source(e, "failed to copy source into memory"))?;

        debug!(file_type = %file_type, bytes = buf.len(), "captured source in memory");
        Ok((file_type, BytesResult::new(buf)))
    }
}
