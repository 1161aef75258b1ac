//! Content identifiers.
//!
//! A [`Cid`] is a CIDv1 over a sha2-256 multihash. The text form is the
//! multibase base16 encoding: `f` followed by the lowercase hex of
//! `varint(1) varint(codec) varint(0x12) varint(32) digest`.

use crate::error::{NodeError, NodeResult};
use sha2::{Digest, Sha256};

const CID_VERSION: u64 = 1;
const SHA2_256: u64 = 0x12;
const DIGEST_LEN: usize = 32;
const BASE16_PREFIX: char = 'f';

/// Multicodec code naming how a block's bytes are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codec(pub u64);

impl Codec {
    pub const RAW: Codec = Codec(0x55);
    pub const DAG_PB: Codec = Codec(0x70);
    pub const DAG_CBOR: Codec = Codec(0x71);
    pub const DAG_JSON: Codec = Codec(0x0129);

    #[must_use]
    pub fn code(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Content identifier of a block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid {
    codec: Codec,
    digest: [u8; DIGEST_LEN],
}

impl Cid {
    pub fn new(codec: Codec, digest: [u8; DIGEST_LEN]) -> Self {
        Self { codec, digest }
    }

    /// Hash `data` and tag it with `codec`.
    pub fn from_block(codec: Codec, data: &[u8]) -> Self {
        let digest: [u8; DIGEST_LEN] = Sha256::digest(data).into();
        Self::new(codec, digest)
    }

    pub fn raw_from_bytes(data: &[u8]) -> Self {
        Self::from_block(Codec::RAW, data)
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn digest(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }

    /// Binary CIDv1 form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(DIGEST_LEN + 8);
        put_varint(&mut out, CID_VERSION);
        put_varint(&mut out, self.codec.0);
        put_varint(&mut out, SHA2_256);
        put_varint(&mut out, DIGEST_LEN as u64);
        out.extend_from_slice(&self.digest);
        out
    }

    pub fn from_bytes(bytes: &[u8], input: &str) -> NodeResult<Self> {
        let mut rest = bytes;
        let version = take_varint(&mut rest).ok_or_else(|| NodeError::invalid_cid(input, "truncated version"))?;
        if version != CID_VERSION {
            return Err(NodeError::invalid_cid(input, format!("unsupported version {version}")));
        }
        let codec = take_varint(&mut rest).ok_or_else(|| NodeError::invalid_cid(input, "truncated codec"))?;
        let hash = take_varint(&mut rest).ok_or_else(|| NodeError::invalid_cid(input, "truncated multihash"))?;
        if hash != SHA2_256 {
            return Err(NodeError::invalid_cid(input, format!("unsupported multihash 0x{hash:x}")));
        }
        let len = take_varint(&mut rest).ok_or_else(|| NodeError::invalid_cid(input, "truncated digest length"))?;
        if len as usize != DIGEST_LEN || rest.len() != DIGEST_LEN {
            return Err(NodeError::invalid_cid(input, "bad digest length"));
        }
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(rest);
        Ok(Self::new(Codec(codec), digest))
    }

    /// Parse the base16 text form.
    pub fn parse<S: AsRef<str>>(input: S) -> NodeResult<Self> {
        let input = input.as_ref();
        let Some(encoded) = input.strip_prefix(BASE16_PREFIX) else {
            return Err(NodeError::invalid_cid(input, "unsupported multibase"));
        };
        let bytes = hex::decode(encoded).map_err(|e| NodeError::invalid_cid(input, e.to_string()))?;
        Self::from_bytes(&bytes, input)
    }
}

impl std::fmt::Display for Cid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", BASE16_PREFIX, hex::encode(self.to_bytes()))
    }
}

impl std::fmt::Debug for Cid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cid({self})")
    }
}

impl std::str::FromStr for Cid {
    type Err = NodeError;

    fn from_str(s: &str) -> NodeResult<Self> {
        Self::parse(s)
    }
}

impl serde::Serialize for Cid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Cid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn put_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn take_varint(input: &mut &[u8]) -> Option<u64> {
    let bytes: &[u8] = input;
    let mut value = 0u64;
    for (i, byte) in bytes.iter().enumerate().take(9) {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            *input = &bytes[i + 1..];
            return Some(value);
        }
    }
    None
}
