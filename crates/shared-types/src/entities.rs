//! # Core Ledger Entities
//!
//! World-state rows, committed-chain structures, and the content digests
//! that tie them together.
//!
//! ## Clusters
//!
//! - **World state**: `Domain`, `Account`, `Role`, `Asset`, `AccountAsset`, `Peer`
//! - **Chain**: `BlockHeader`, `Block`, `Transaction`, `Command`
//! - **Crypto shapes**: `Hash`, `PublicKey`, `SignatureBytes`, `KeyedSignature`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};

use crate::identifiers::{AccountId, AssetId, DomainId, RoleId};
use crate::permissions::RolePermissionSet;

/// A 32-byte content digest. Hex form is 64 lowercase characters.
pub type Hash = [u8; 32];

/// A 32-byte public key.
pub type PublicKey = [u8; 32];

/// A 64-byte signature.
pub type SignatureBytes = [u8; 64];

/// The all-zero hash; `prev_hash` of the block at height 1.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Renders a hash as its canonical 64-character lowercase hex form.
pub fn hash_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// A signature together with the key that produced it.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedSignature {
    /// Signer's public key.
    pub public_key: PublicKey,
    /// Signature over the payload digest.
    #[serde_as(as = "Bytes")]
    pub signature: SignatureBytes,
}

/// An asset quantity in minor units.
///
/// The decimal placement comes from the owning asset's `precision`; the
/// canonical string form has exactly `precision` fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Amount(pub u128);

impl Amount {
    /// Canonical decimal rendering with exactly `precision` fractional digits.
    ///
    /// Works over the whole precision domain `[0, 255]`: the decimal
    /// digits are re-grouped around the point rather than divided by a
    /// power of ten, which `u128` could not represent past 38 digits.
    pub fn to_decimal_string(self, precision: u8) -> String {
        let digits = self.0.to_string();
        if precision == 0 {
            return digits;
        }
        let precision = usize::from(precision);
        if digits.len() > precision {
            let (whole, frac) = digits.split_at(digits.len() - precision);
            format!("{whole}.{frac}")
        } else {
            format!("0.{digits:0>precision$}")
        }
    }

    /// Checked addition in minor units.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction in minor units.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

/// A domain row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Unique domain identifier.
    pub id: DomainId,
    /// Role assigned to accounts created in this domain.
    pub default_role: RoleId,
}

/// An account row.
///
/// `json_data` maps writer account ids to key/value detail records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier.
    pub id: AccountId,
    /// The domain this account lives in.
    pub domain_id: DomainId,
    /// Signature quorum, at least 1.
    pub quorum: u32,
    /// Detail records keyed by writer, then by key.
    pub json_data: serde_json::Value,
}

/// A role row: a named permission set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier.
    pub id: RoleId,
    /// Permissions granted by holding this role.
    pub permissions: RolePermissionSet,
}

/// An asset row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique asset identifier.
    pub id: AssetId,
    /// The domain this asset lives in.
    pub domain_id: DomainId,
    /// Number of fractional digits in balance renderings.
    pub precision: u8,
}

/// A balance row for one `(account, asset)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAsset {
    pub account_id: AccountId,
    pub asset_id: AssetId,
    /// Balance in minor units.
    pub balance: Amount,
    /// The balance's canonical string form, with exactly the owning
    /// asset's `precision` fractional digits.
    pub balance_decimal: String,
}

/// A network peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    /// Network address (`host:port`).
    pub address: String,
    /// Peer identity key.
    pub public_key: PublicKey,
    /// Optional TLS certificate, PEM text.
    pub tls_certificate: Option<String>,
}

/// A state-changing command carried by a transaction.
///
/// The read side only inspects these; it never applies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Mint `amount` of `asset_id` onto the creator's balance.
    AddAssetQuantity { asset_id: AssetId, amount: Amount },
    /// Burn `amount` of `asset_id` from the creator's balance.
    SubtractAssetQuantity { asset_id: AssetId, amount: Amount },
    /// Move `amount` of `asset_id` between two accounts.
    TransferAsset {
        src_account_id: AccountId,
        dest_account_id: AccountId,
        asset_id: AssetId,
        amount: Amount,
        description: String,
    },
    /// Write one detail record under the target account.
    SetAccountDetail {
        account_id: AccountId,
        key: String,
        value: String,
    },
}

impl Command {
    fn digest_into(&self, hasher: &mut Sha256) {
        match self {
            Command::AddAssetQuantity { asset_id, amount } => {
                hasher.update([0u8]);
                hasher.update(asset_id.to_string());
                hasher.update(amount.0.to_le_bytes());
            }
            Command::SubtractAssetQuantity { asset_id, amount } => {
                hasher.update([1u8]);
                hasher.update(asset_id.to_string());
                hasher.update(amount.0.to_le_bytes());
            }
            Command::TransferAsset {
                src_account_id,
                dest_account_id,
                asset_id,
                amount,
                description,
            } => {
                hasher.update([2u8]);
                hasher.update(src_account_id.to_string());
                hasher.update(dest_account_id.to_string());
                hasher.update(asset_id.to_string());
                hasher.update(amount.0.to_le_bytes());
                hasher.update((description.len() as u64).to_le_bytes());
                hasher.update(description.as_bytes());
            }
            Command::SetAccountDetail {
                account_id,
                key,
                value,
            } => {
                hasher.update([3u8]);
                hasher.update(account_id.to_string());
                hasher.update((key.len() as u64).to_le_bytes());
                hasher.update(key.as_bytes());
                hasher.update(value.as_bytes());
            }
        }
    }
}

/// A signed transaction as it appears in blocks and in the pending pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The account that authored this transaction.
    pub creator_account_id: AccountId,
    /// Creation time, milliseconds since epoch.
    pub created_time_ms: u64,
    /// Ordered command list.
    pub commands: Vec<Command>,
    /// Signatures over the payload digest.
    pub signatures: Vec<KeyedSignature>,
}

impl Transaction {
    /// Content digest over the payload (creator, time, commands).
    ///
    /// Signatures are excluded so re-signing does not change identity.
    /// This digest is canonical across the whole system.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.creator_account_id.to_string());
        hasher.update(self.created_time_ms.to_le_bytes());
        hasher.update((self.commands.len() as u64).to_le_bytes());
        for command in &self.commands {
            command.digest_into(&mut hasher);
        }
        hasher.finalize().into()
    }
}

/// Block metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Height in the chain, starting at 1.
    pub height: u64,
    /// Hash of the previous block; all zeros at height 1.
    pub prev_hash: Hash,
    /// Creation time, milliseconds since epoch.
    pub created_time: u64,
}

/// A committed block: header plus ordered transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Content digest over the header and the contained transaction hashes.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.header.height.to_le_bytes());
        hasher.update(self.header.prev_hash);
        hasher.update(self.header.created_time.to_le_bytes());
        for tx in &self.transactions {
            hasher.update(tx.hash());
        }
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(s: &str) -> AccountId {
        s.parse().unwrap()
    }

    fn asset(s: &str) -> AssetId {
        s.parse().unwrap()
    }

    fn transfer(src: &str, dest: &str, amount: u128) -> Transaction {
        Transaction {
            creator_account_id: account(src),
            created_time_ms: 1_000,
            commands: vec![Command::TransferAsset {
                src_account_id: account(src),
                dest_account_id: account(dest),
                asset_id: asset("coin#domain"),
                amount: Amount(amount),
                description: String::new(),
            }],
            signatures: vec![],
        }
    }

    // ========== Test Group 1: Amount Rendering ==========

    #[test]
    fn test_amount_rendering_precision_zero() {
        assert_eq!(Amount(25).to_decimal_string(0), "25");
        assert_eq!(Amount(0).to_decimal_string(0), "0");
    }

    #[test]
    fn test_amount_rendering_fractional_digits() {
        assert_eq!(Amount(25).to_decimal_string(1), "2.5");
        assert_eq!(Amount(25).to_decimal_string(3), "0.025");
        assert_eq!(Amount(1_000).to_decimal_string(2), "10.00");
        assert_eq!(Amount(5).to_decimal_string(3), "0.005");
    }

    #[test]
    fn test_amount_rendering_at_the_u128_digit_boundary() {
        // u128::MAX has 39 decimal digits; precisions at and past that
        // boundary must still render exactly.
        assert_eq!(
            Amount(u128::MAX).to_decimal_string(38),
            "3.40282366920938463463374607431768211455"
        );
        assert_eq!(
            Amount(u128::MAX).to_decimal_string(39),
            "0.340282366920938463463374607431768211455"
        );
        assert_eq!(
            Amount(u128::MAX).to_decimal_string(40),
            "0.0340282366920938463463374607431768211455"
        );
    }

    #[test]
    fn test_amount_rendering_maximum_precision() {
        let rendered = Amount(7).to_decimal_string(255);
        assert_eq!(rendered, format!("0.{}7", "0".repeat(254)));
        // "0." plus exactly 255 fractional digits.
        assert_eq!(rendered.len(), 2 + 255);
    }

    #[test]
    fn test_amount_checked_arithmetic() {
        assert_eq!(Amount(2).checked_add(Amount(3)), Some(Amount(5)));
        assert_eq!(Amount(2).checked_sub(Amount(3)), None);
        assert_eq!(Amount(u128::MAX).checked_add(Amount(1)), None);
    }

    // ========== Test Group 2: Transaction Digests ==========

    #[test]
    fn test_transaction_hash_deterministic() {
        let a = transfer("id@domain", "id2@domain", 10);
        let b = transfer("id@domain", "id2@domain", 10);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_transaction_hash_ignores_signatures() {
        let mut a = transfer("id@domain", "id2@domain", 10);
        let before = a.hash();
        a.signatures.push(KeyedSignature {
            public_key: [7u8; 32],
            signature: [9u8; 64],
        });
        assert_eq!(a.hash(), before);
    }

    #[test]
    fn test_transaction_hash_distinguishes_payloads() {
        let a = transfer("id@domain", "id2@domain", 10);
        let b = transfer("id@domain", "id2@domain", 11);
        let c = transfer("id2@domain", "id@domain", 10);
        assert_ne!(a.hash(), b.hash());
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn test_hash_hex_is_lowercase_64_chars() {
        let h = transfer("id@domain", "id2@domain", 1).hash();
        let text = hash_hex(&h);
        assert_eq!(text.len(), 64);
        assert_eq!(text, text.to_lowercase());
    }

    // ========== Test Group 3: Block Digests ==========

    #[test]
    fn test_block_hash_covers_transactions() {
        let header = BlockHeader {
            height: 1,
            prev_hash: ZERO_HASH,
            created_time: 1,
        };
        let empty = Block {
            header: header.clone(),
            transactions: vec![],
        };
        let full = Block {
            header,
            transactions: vec![transfer("id@domain", "id2@domain", 1)],
        };
        assert_ne!(empty.hash(), full.hash());
    }
}
