//! Process-wide table of block codecs the reconstruction service can
//! decode.
//!
//! The table is built on first use and never changes afterwards, so
//! concurrent callers of [`load_codecs`] share a single initialization.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::cid::Codec;
use crate::error::{NodeError, NodeResult};

/// How the reconstruction service interprets blocks of a codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFormat {
    /// Bytes are file content verbatim.
    Raw,
    /// JSON-encoded file, directory or symlink node.
    Json,
}

#[derive(Debug)]
pub struct CodecRegistry {
    formats: BTreeMap<Codec, (&'static str, BlockFormat)>,
}

static REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();

impl CodecRegistry {
    fn builtin() -> Self {
        let formats = BTreeMap::from([
            (Codec::RAW, ("raw", BlockFormat::Raw)),
            (Codec::DAG_JSON, ("dag-json", BlockFormat::Json)),
        ]);
        Self { formats }
    }

    pub fn format(&self, codec: Codec) -> NodeResult<BlockFormat> {
        self.formats
            .get(&codec)
            .map(|(_, format)| *format)
            .ok_or(NodeError::UnknownCodec(codec.code()))
    }

    pub fn name(&self, codec: Codec) -> Option<&'static str> {
        self.formats.get(&codec).map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

/// Load the built-in codecs. Idempotent.
pub fn load_codecs() -> &'static CodecRegistry {
    REGISTRY.get_or_init(|| {
        let registry = CodecRegistry::builtin();
        diagnostics::info!("loaded {count} block codecs", count: registry.len());
        registry
    })
}

/// The loaded registry.
pub fn registry() -> &'static CodecRegistry {
    load_codecs()
}
