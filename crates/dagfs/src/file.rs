use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

use crate::error::Result;
use crate::metadata::{FileInfo, MetadataNode};
use crate::node::ByteStream;

/// An open regular file: the reconstructed byte stream plus its metadata.
///
/// Reads go straight to the stream. There is no seeking and no buffering.
#[pin_project]
pub struct FileHandle {
    #[pin]
    stream: ByteStream,
    meta: MetadataNode,
}

impl FileHandle {
    pub fn new(stream: ByteStream, meta: MetadataNode) -> Self {
        Self { stream, meta }
    }

    /// Read into `buf`; `Ok(0)` marks the end of the file.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.stream.read(buf).await?)
    }

    pub async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        _ = self.stream.read_to_end(&mut content).await?;
        Ok(content)
    }

    pub async fn stat(&self) -> Result<FileInfo> {
        self.meta.stat().await
    }

    pub fn metadata(&self) -> &MetadataNode {
        &self.meta
    }

    /// Release the stream.
    pub async fn close(self) -> Result<()> {
        drop(self.stream);
        Ok(())
    }
}

impl AsyncRead for FileHandle {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<std::io::Result<()>> {
        self.project().stream.poll_read(cx, buf)
    }
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle").field("meta", &self.meta).finish()
    }
}
