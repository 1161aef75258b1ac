use crate::cid::Cid;

pub type Result<T> = std::result::Result<T, Error>;

/// Result type used by storage-node collaborators.
pub type NodeResult<T> = std::result::Result<T, NodeError>;

/// Errors surfaced by the filesystem adapter.
///
/// Each lookup stage has its own variant so callers can tell a missing
/// path from a store failure or an undecodable node.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path resolve {path}: {source}")]
    Resolution {
        path: String,
        #[source]
        source: NodeError,
    },

    #[error("dag get {cid}: {source}")]
    Fetch {
        cid: Cid,
        #[source]
        source: NodeError,
    },

    #[error("create unix file {cid}: {source}")]
    Reconstruction {
        cid: Cid,
        #[source]
        source: NodeError,
    },

    #[error("invalid file type: {kind}")]
    UnsupportedType { kind: String },

    #[error("invalid operation: {op} on {path}")]
    InvalidOperation { op: &'static str, path: String },

    #[error("size unavailable for {path}: {source}")]
    SizeUnavailable {
        path: String,
        #[source]
        source: NodeError,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn invalid_operation<S: AsRef<str>>(op: &'static str, path: S) -> Self {
        Error::InvalidOperation {
            op,
            path: path.as_ref().to_string(),
        }
    }

    pub fn unsupported_type<S: AsRef<str>>(kind: S) -> Self {
        Error::UnsupportedType {
            kind: kind.as_ref().to_string(),
        }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// True when the failure came from a cancelled or expired context,
    /// whether detected up front or while a collaborator was running.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        match self {
            Error::Cancelled | Error::DeadlineExceeded => true,
            Error::Resolution { source, .. }
            | Error::Fetch { source, .. }
            | Error::Reconstruction { source, .. }
            | Error::SizeUnavailable { source, .. }
            | Error::Node(source) => source.is_cancellation(),
            _ => false,
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        use std::io::ErrorKind;
        match e {
            Error::Io(err) => err,
            Error::Resolution { .. } => std::io::Error::new(ErrorKind::NotFound, e),
            Error::InvalidOperation { .. } => std::io::Error::new(ErrorKind::InvalidInput, e),
            Error::UnsupportedType { .. } => std::io::Error::new(ErrorKind::Unsupported, e),
            Error::Cancelled => std::io::Error::new(ErrorKind::Interrupted, e),
            Error::DeadlineExceeded => std::io::Error::new(ErrorKind::TimedOut, e),
            other => std::io::Error::other(other),
        }
    }
}

/// Failures reported by the storage node, its object store and its
/// reconstruction service.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("not found: {0}")]
    NotFound(Cid),

    #[error("no link named {name:?} under {parent}")]
    NoLink { parent: Cid, name: String },

    #[error("not a directory: {0}")]
    NotADirectory(Cid),

    #[error("entry already exists: {0}")]
    AlreadyExists(String),

    #[error("malformed path: {0}")]
    MalformedPath(String),

    #[error("unsupported namespace: /{0}/")]
    UnsupportedNamespace(String),

    #[error("invalid cid {input:?}: {reason}")]
    InvalidCid { input: String, reason: String },

    #[error("unknown codec 0x{0:x}")]
    UnknownCodec(u64),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeError {
    pub fn invalid_cid<S: AsRef<str>, R: Into<String>>(input: S, reason: R) -> Self {
        NodeError::InvalidCid {
            input: input.as_ref().to_string(),
            reason: reason.into(),
        }
    }

    pub fn no_link<S: AsRef<str>>(parent: Cid, name: S) -> Self {
        NodeError::NoLink {
            parent,
            name: name.as_ref().to_string(),
        }
    }

    pub fn decode<S: Into<String>>(msg: S) -> Self {
        NodeError::Decode(msg.into())
    }

    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, NodeError::Cancelled | NodeError::DeadlineExceeded)
    }
}

impl From<serde_json::Error> for NodeError {
    fn from(e: serde_json::Error) -> Self {
        NodeError::Decode(e.to_string())
    }
}

impl From<NodeError> for std::io::Error {
    fn from(e: NodeError) -> Self {
        match e {
            NodeError::Io(err) => err,
            NodeError::NotFound(_) => std::io::Error::new(std::io::ErrorKind::NotFound, e),
            NodeError::Cancelled => std::io::Error::new(std::io::ErrorKind::Interrupted, e),
            NodeError::DeadlineExceeded => std::io::Error::new(std::io::ErrorKind::TimedOut, e),
            other => std::io::Error::other(other),
        }
    }
}
