use serde::{Deserialize, Serialize};

use crate::error::{CritterSdkError, Result};

/// 32-byte seed that uniquely identifies a token. The hex encoding of the
/// seed doubles as the token's opaque identifier string.
pub type MintSeed = [u8; 32];

/// Numeric species identifier derived on-chain from a token's seed.
pub type SpeciesId = u32;

/// A signing identity exposed by the signing agent.
///
/// Uniquely identified by `address`; `display_name` is whatever label the
/// agent attached to the key (keystore entry name, dev identity name).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub display_name: Option<String>,
}

/// Client-side view of a submitted call's confirmation lifecycle.
///
/// The ledger drives the progression; the coordinator observes it but does
/// not control its timing. Stages arrive in non-decreasing confirmation
/// order (`Submitted` before `InBlock` before `Finalized`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Call built locally, not yet signed
    Constructed,
    /// Signed and transmitted to the node
    Submitted,
    /// Included in a block
    InBlock,
    /// Irreversibly confirmed
    Finalized,
    /// Signing declined or the ledger dropped the call
    Rejected,
}

impl TransactionStatus {
    /// Terminal stages end a transaction's status stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Finalized | TransactionStatus::Rejected)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransactionStatus::Constructed => "constructed",
            TransactionStatus::Submitted => "submitted",
            TransactionStatus::InBlock => "in block",
            TransactionStatus::Finalized => "finalized",
            TransactionStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// Hash handed back by the node when a signed call is accepted for
/// inclusion; used to poll confirmation status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallHash(pub String);

impl std::fmt::Display for CallHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Node-side confirmation status as reported by the status RPC. Converted
/// into [`TransactionStatus`] at the signing-agent boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerCallStatus {
    Pending,
    InBlock,
    Finalized,
    Dropped,
}

/// Generate a fresh random mint seed.
pub fn random_mint_seed() -> MintSeed {
    rand::random()
}

/// Hex-encode a seed into its opaque token identifier form.
pub fn token_id(seed: &MintSeed) -> String {
    hex::encode(seed)
}

/// Parse an opaque token identifier back into its seed bytes.
pub fn parse_token_id(id: &str) -> Result<MintSeed> {
    let bytes = hex::decode(id)
        .map_err(|err| CritterSdkError::Query(format!("malformed token id {id}: {err}")))?;
    bytes
        .try_into()
        .map_err(|_| CritterSdkError::Query(format!("token id {id} is not 32 bytes")))
}
