//! # Address Codec
//!
//! Classifies and decodes the address strings that appear in payment
//! requests. Two pools, two encodings:
//!
//! - **Transparent** addresses are Bech32 over a 20-byte public-key hash.
//!   They expand to a fixed 25-byte pay-to-pubkey-hash script and back;
//!   the expansion is exact in both directions.
//! - **Shielded** addresses are Bech32m over a 43-byte raw receiver. The
//!   receiver bytes are opaque to this layer.
//!
//! The human-readable prefix carries both the pool and the network, so a
//! mainnet address can never decode on testnet and a shielded address can
//! never be mistaken for a transparent one.

use bech32::{Bech32, Bech32m, Hrp};
use thiserror::Error;

use crate::config::{Network, PUBKEY_HASH_LENGTH, P2KH_SCRIPT_LENGTH, SHIELDED_RECEIVER_LENGTH};
use crate::crypto;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while decoding an address string.
#[derive(Debug, Error)]
pub enum AddressError {
    /// The Bech32 string could not be decoded at all.
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The prefix belongs to neither pool on the requested network.
    #[error("unknown address prefix '{got}' for {network}")]
    UnknownHrp { got: String, network: Network },

    /// The decoded payload has the wrong length for its pool.
    #[error("invalid address payload length: expected {expected} bytes, got {got}")]
    InvalidDataLength { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A decoded recipient address. The variant decides whether a payment
/// becomes a transparent output or a shielded action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Transparent(TransparentAddress),
    Shielded(ShieldedAddress),
}

impl Address {
    /// Decode an address string for the given network.
    ///
    /// The pool is inferred from the prefix. Addresses for the other
    /// network fail with [`AddressError::UnknownHrp`].
    pub fn decode(addr: &str, network: Network) -> Result<Self, AddressError> {
        let (hrp, data) =
            bech32::decode(addr).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;

        let transparent_hrp =
            Hrp::parse(network.transparent_hrp()).expect("static HRP is valid");
        let shielded_hrp = Hrp::parse(network.shielded_hrp()).expect("static HRP is valid");

        if hrp == transparent_hrp {
            if data.len() != PUBKEY_HASH_LENGTH {
                return Err(AddressError::InvalidDataLength {
                    expected: PUBKEY_HASH_LENGTH,
                    got: data.len(),
                });
            }
            let mut pubkey_hash = [0u8; PUBKEY_HASH_LENGTH];
            pubkey_hash.copy_from_slice(&data);
            Ok(Address::Transparent(TransparentAddress {
                pubkey_hash,
                network,
            }))
        } else if hrp == shielded_hrp {
            if data.len() != SHIELDED_RECEIVER_LENGTH {
                return Err(AddressError::InvalidDataLength {
                    expected: SHIELDED_RECEIVER_LENGTH,
                    got: data.len(),
                });
            }
            let mut receiver = [0u8; SHIELDED_RECEIVER_LENGTH];
            receiver.copy_from_slice(&data);
            Ok(Address::Shielded(ShieldedAddress { receiver, network }))
        } else {
            Err(AddressError::UnknownHrp {
                got: hrp.to_string(),
                network,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// TransparentAddress
// ---------------------------------------------------------------------------

/// A transparent (public) address: a 20-byte hash of the holder's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransparentAddress {
    pubkey_hash: [u8; PUBKEY_HASH_LENGTH],
    network: Network,
}

impl TransparentAddress {
    /// Derive the address that a compressed public key pays to.
    pub fn from_pubkey(pubkey: &[u8], network: Network) -> Self {
        Self {
            pubkey_hash: crypto::pubkey_hash(pubkey),
            network,
        }
    }

    /// Recover an address from a pay-to-pubkey-hash script, if the script
    /// matches the canonical 25-byte template exactly.
    pub fn from_script(script: &[u8], network: Network) -> Option<Self> {
        if script.len() != P2KH_SCRIPT_LENGTH {
            return None;
        }
        if script[..3] != [0x76, 0xa9, 0x14] || script[23..] != [0x88, 0xac] {
            return None;
        }
        let mut pubkey_hash = [0u8; PUBKEY_HASH_LENGTH];
        pubkey_hash.copy_from_slice(&script[3..23]);
        Some(Self {
            pubkey_hash,
            network,
        })
    }

    /// The canonical pay-to-pubkey-hash script for this address.
    ///
    /// Layout: `DUP HASH160 <20-byte hash> EQUALVERIFY CHECKSIG`, always
    /// exactly 25 bytes.
    pub fn script_pubkey(&self) -> Vec<u8> {
        let mut script = Vec::with_capacity(P2KH_SCRIPT_LENGTH);
        script.extend_from_slice(&[0x76, 0xa9, 0x14]);
        script.extend_from_slice(&self.pubkey_hash);
        script.extend_from_slice(&[0x88, 0xac]);
        script
    }

    /// Encode as a Bech32 address string.
    pub fn encode(&self) -> String {
        let hrp = Hrp::parse(self.network.transparent_hrp()).expect("static HRP is valid");
        bech32::encode::<Bech32>(hrp, &self.pubkey_hash)
            .expect("encoding a 20-byte payload should never fail")
    }

    /// The raw 20-byte public-key hash.
    pub fn pubkey_hash(&self) -> &[u8; PUBKEY_HASH_LENGTH] {
        &self.pubkey_hash
    }
}

// ---------------------------------------------------------------------------
// ShieldedAddress
// ---------------------------------------------------------------------------

/// A shielded address: a 43-byte raw receiver, opaque to this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShieldedAddress {
    receiver: [u8; SHIELDED_RECEIVER_LENGTH],
    network: Network,
}

impl ShieldedAddress {
    /// Wrap a raw receiver.
    pub fn from_receiver(receiver: [u8; SHIELDED_RECEIVER_LENGTH], network: Network) -> Self {
        Self { receiver, network }
    }

    /// Encode as a Bech32m address string.
    pub fn encode(&self) -> String {
        let hrp = Hrp::parse(self.network.shielded_hrp()).expect("static HRP is valid");
        bech32::encode::<Bech32m>(hrp, &self.receiver)
            .expect("encoding a 43-byte payload should never fail")
    }

    /// The raw receiver bytes.
    pub fn receiver(&self) -> &[u8; SHIELDED_RECEIVER_LENGTH] {
        &self.receiver
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
