//! # Transaction Requests & Input Specs
//!
//! The read-only inputs to the builder: what the coordinator intends to pay
//! ([`Payment`], [`TransactionRequest`]) and which transparent coins fund it
//! ([`TransparentInputSpec`]). [`TransparentOutputSpec`] exists only for
//! expected-change assertions handed to the verifier.
//!
//! Requests are plain value data, not handles — proposing from a request
//! does not consume it, and the same request is re-used later as the
//! verifier's source of truth.

use serde::{Deserialize, Serialize};

use crate::config::{Network, PUBKEY_LENGTH, TXID_LENGTH};

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

/// A single intended payment to one recipient.
///
/// The address string decides the pool: a transparent address becomes a
/// public output, a shielded address becomes a shielded action. Amounts are
/// atomic units and must be positive (enforced at proposal time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Recipient address string (either pool).
    pub address: String,
    /// Amount in atomic units. Must be > 0.
    pub amount: u64,
    /// Optional memo, at most 512 bytes. Only meaningful for shielded
    /// recipients; carried as plaintext until finalization seals it.
    pub memo: Option<Vec<u8>>,
    /// Optional human label for the recipient. Diagnostic only.
    pub label: Option<String>,
    /// Optional free-form message. Diagnostic only.
    pub message: Option<String>,
}

impl Payment {
    /// Create a payment with no memo, label, or message.
    pub fn new(address: impl Into<String>, amount: u64) -> Self {
        Self {
            address: address.into(),
            amount,
            memo: None,
            label: None,
            message: None,
        }
    }

    /// Attach a memo.
    pub fn with_memo(mut self, memo: Vec<u8>) -> Self {
        self.memo = Some(memo);
        self
    }

    /// Attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

// ---------------------------------------------------------------------------
// TransactionRequest
// ---------------------------------------------------------------------------

/// An immutable description of intended payments plus network parameters.
///
/// `target_height` and the network selection must be set before the request
/// is handed to the builder; they feed the consensus branch id that every
/// signature hash commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// The intended payments, in request order. Order has no effect on
    /// validity; it only drives diagnostic numbering.
    pub payments: Vec<Payment>,
    /// Block height the transaction targets. Selects the ruleset.
    pub target_height: u32,
    /// Which network's parameters apply.
    pub network: Network,
}

impl TransactionRequest {
    /// Create a request for the given payments, defaulting to testnet
    /// parameters at height 0.
    pub fn new(payments: Vec<Payment>) -> Self {
        Self {
            payments,
            target_height: 0,
            network: Network::Testnet,
        }
    }

    /// Set the target height.
    pub fn with_target_height(mut self, height: u32) -> Self {
        self.target_height = height;
        self
    }

    /// Select the network parameter set.
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Select mainnet or testnet parameters from a flag, for callers whose
    /// environment expresses the choice as a boolean.
    pub fn use_mainnet_params(self, mainnet: bool) -> Self {
        self.with_network(if mainnet {
            Network::Mainnet
        } else {
            Network::Testnet
        })
    }

    /// Sum of all payment amounts. Saturating; the builder re-sums with
    /// overflow checking before trusting the value.
    pub fn total_amount(&self) -> u64 {
        self.payments
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.amount))
    }
}

// ---------------------------------------------------------------------------
// Input / output specs
// ---------------------------------------------------------------------------

/// One transparent coin the caller has chosen to spend.
///
/// The builder performs no coin selection: the supplied specs are converted
/// 1:1 into transaction inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransparentInputSpec {
    /// Compressed public key able to satisfy `script_pubkey`.
    pub pubkey: [u8; PUBKEY_LENGTH],
    /// Txid of the transaction that created the coin.
    pub prev_txid: [u8; TXID_LENGTH],
    /// Output index within that transaction.
    pub prev_index: u32,
    /// Coin value in atomic units.
    pub value: u64,
    /// The script the coin is locked with.
    pub script_pubkey: Vec<u8>,
}

/// An expected transparent change output, asserted to the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransparentOutputSpec {
    /// The change script the caller expects.
    pub script_pubkey: Vec<u8>,
    /// The change value the caller expects.
    pub value: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
