//! # Protocol Constants & Network Parameters
//!
//! Every magic number in the PCT stack lives here: field widths, the fee
//! schedule, address prefixes, and the wire-format preamble. Code elsewhere
//! refers to these by name so that a consensus-affecting change is a
//! one-line diff in one file.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Field widths
// ---------------------------------------------------------------------------

/// Compressed secp256k1-style public key length. Every transparent input
/// carries one so signers can be matched to the scripts they satisfy.
pub const PUBKEY_LENGTH: usize = 33;

/// Transaction id length (a 32-byte digest).
pub const TXID_LENGTH: usize = 32;

/// Per-input signature hash length.
pub const SIGHASH_LENGTH: usize = 32;

/// External signature length: a fixed 64-byte scalar pair. Signatures of any
/// other length are rejected before any further processing.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of a raw shielded receiver, as carried inside a shielded address.
pub const SHIELDED_RECEIVER_LENGTH: usize = 43;

/// Length of the public-key hash embedded in transparent addresses.
pub const PUBKEY_HASH_LENGTH: usize = 20;

/// A pay-to-pubkey-hash script is always exactly this long.
pub const P2KH_SCRIPT_LENGTH: usize = 25;

/// Maximum memo field length in bytes. Enough for a short message,
/// not enough for your novel.
pub const MAX_MEMO_LENGTH: usize = 512;

// ---------------------------------------------------------------------------
// Fee schedule
// ---------------------------------------------------------------------------

/// Marginal fee per logical action, in atomic units.
pub const MARGINAL_FEE: u64 = 5_000;

/// Grace allowance: transactions are charged for at least this many logical
/// actions regardless of their actual shape.
pub const GRACE_ACTIONS: u64 = 2;

/// Shielded actions never count as fewer than this once any are present.
/// The padding keeps single-action transactions indistinguishable from
/// two-action ones on the fee axis.
pub const SHIELDED_ACTION_PADDING: u64 = 2;

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Magic preamble on every serialized PCT. Lets receivers reject foreign
/// blobs without deserializing further.
pub const PCT_MAGIC: [u8; 4] = *b"PCT\xC4";

/// Serialized PCT format version.
pub const PCT_FORMAT_VERSION: u8 = 1;

/// Transaction version recorded in every proposal and in the extracted
/// transaction bytes.
pub const TX_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Networks
// ---------------------------------------------------------------------------

/// Consensus branch id for the initial ruleset.
pub const BRANCH_ID_V1: u32 = 0x7043_5431; // "pCT1"

/// Consensus branch id after the first scheduled upgrade.
pub const BRANCH_ID_V2: u32 = 0x7043_5432; // "pCT2"

/// Height at which the V2 ruleset activates, on every network.
pub const V2_ACTIVATION_HEIGHT: u32 = 1_000_000;

/// The network a transaction is being assembled for.
///
/// The choice affects address prefixes and the consensus branch id that is
/// committed to by every signature hash, so a transaction assembled for one
/// network can never be replayed on the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// The real deal. Mistakes here cost real money.
    Mainnet,
    /// Where we break things on purpose and call it "testing."
    Testnet,
}

impl Network {
    /// Human-readable prefix for transparent addresses on this network.
    pub fn transparent_hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "pt",
            Network::Testnet => "tpt",
        }
    }

    /// Human-readable prefix for shielded addresses on this network.
    pub fn shielded_hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "pz",
            Network::Testnet => "tpz",
        }
    }

    /// The consensus branch id in force at `height`.
    ///
    /// The branch id is mixed into every signature hash, so signatures
    /// produced under one ruleset are invalid under another.
    pub fn branch_id(&self, height: u32) -> u32 {
        if height >= V2_ACTIVATION_HEIGHT {
            BRANCH_ID_V2
        } else {
            BRANCH_ID_V1
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}
