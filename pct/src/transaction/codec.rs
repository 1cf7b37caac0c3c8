//! # PCT Wire Codec
//!
//! Serialize a PCT for transport between parties, and parse one back. The
//! format is a 4-byte magic preamble, a 1-byte format version, and a
//! bincode body. The preamble lets a receiver reject foreign blobs cheaply
//! and gives future format revisions somewhere to go.
//!
//! `serialize` is non-consuming — taking a serialized backup *before* a
//! risky consuming call is the sanctioned recovery pattern. `parse`
//! constructs a fresh, exclusively owned PCT in the same logical state as
//! the one that was serialized: round-tripping is observable-identity.

use tracing::trace;

use crate::config::{PCT_FORMAT_VERSION, PCT_MAGIC};
use crate::error::ParseError;
use crate::transaction::Pct;

impl Pct {
    /// Serialize to bytes. Non-consuming; the PCT stays valid.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 + self.inputs.len() * 160 + self.outputs.len() * 48);
        buf.extend_from_slice(&PCT_MAGIC);
        buf.push(PCT_FORMAT_VERSION);
        bincode::serialize_into(&mut buf, self)
            .expect("bincode serialization of an in-memory PCT cannot fail");
        trace!(bytes = buf.len(), id = %self.proposal_id(), "serialized PCT");
        buf
    }

    /// Parse serialized bytes into a fresh, exclusively owned PCT.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let header_len = PCT_MAGIC.len() + 1;
        if bytes.len() < header_len {
            return Err(ParseError::TooShort { len: bytes.len() });
        }
        if bytes[..PCT_MAGIC.len()] != PCT_MAGIC {
            return Err(ParseError::BadMagic);
        }
        let version = bytes[PCT_MAGIC.len()];
        if version != PCT_FORMAT_VERSION {
            return Err(ParseError::UnsupportedVersion { version });
        }

        bincode::deserialize(&bytes[header_len..])
            .map_err(|e| ParseError::Malformed(e.to_string()))
    }
}
