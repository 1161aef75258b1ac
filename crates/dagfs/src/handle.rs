use crate::dir::{DirHandle, Listing};
use crate::error::{Error, Result};
use crate::file::FileHandle;
use crate::metadata::{FileInfo, MetadataNode};

/// What [`crate::DagFs::open`] returns. The variant is fixed at open time.
#[derive(Debug)]
pub enum Handle {
    File(FileHandle),
    Directory(DirHandle),
}

impl Handle {
    pub fn is_dir(&self) -> bool {
        matches!(self, Handle::Directory(_))
    }

    pub fn metadata(&self) -> &MetadataNode {
        match self {
            Handle::File(f) => f.metadata(),
            Handle::Directory(d) => d.metadata(),
        }
    }

    pub async fn stat(&self) -> Result<FileInfo> {
        match self {
            Handle::File(f) => f.stat().await,
            Handle::Directory(d) => d.stat().await,
        }
    }

    /// Read bytes from a file. Fails with `InvalidOperation` on a directory.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self {
            Handle::File(f) => f.read(buf).await,
            Handle::Directory(d) => d.read(buf).await,
        }
    }

    /// List a directory. Fails with `InvalidOperation` on a file.
    pub async fn read_dir(&mut self, n: isize) -> Result<Listing> {
        match self {
            Handle::File(f) => Err(Error::invalid_operation("read_dir", f.metadata().path().as_str())),
            Handle::Directory(d) => d.read_dir(n).await,
        }
    }

    pub fn as_file(&mut self) -> Option<&mut FileHandle> {
        match self {
            Handle::File(f) => Some(f),
            Handle::Directory(_) => None,
        }
    }

    pub fn as_dir(&mut self) -> Option<&mut DirHandle> {
        match self {
            Handle::Directory(d) => Some(d),
            Handle::File(_) => None,
        }
    }

    pub fn into_file(self) -> Option<FileHandle> {
        match self {
            Handle::File(f) => Some(f),
            Handle::Directory(_) => None,
        }
    }

    pub fn into_dir(self) -> Option<DirHandle> {
        match self {
            Handle::Directory(d) => Some(d),
            Handle::File(_) => None,
        }
    }

    pub async fn close(self) -> Result<()> {
        match self {
            Handle::File(f) => f.close().await,
            Handle::Directory(d) => d.close().await,
        }
    }
}
