//! # Blocks and Transactions
//!
//! Block and transaction types as they exist after validation, plus the
//! [`AppliedBlock`] commit payload the validation pipeline publishes once a
//! block is durable. `AppliedBlock` is the sole input of the change
//! notification pipeline: it carries the ids of every object the block
//! created, modified, or removed, and the operations in execution order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};

use crate::ids::{AccountId, ObjectId};
use crate::operations::{AppliedOperation, Operation};

/// A 32-byte SHA-256 hash.
pub type Hash = [u8; 32];

/// A 64-byte signature.
pub type Signature = [u8; 64];

/// The header of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Block height in the chain.
    pub number: u32,
    /// Id of the parent block (creates the chain linkage).
    pub previous: Hash,
    /// Unix timestamp when the block was produced.
    pub timestamp: u64,
    /// The account that produced this block.
    pub witness: AccountId,
    /// Merkle root of all transactions in the block.
    pub transaction_merkle_root: Hash,
}

impl BlockHeader {
    /// The block id: a digest over every header field.
    #[must_use]
    pub fn digest(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.number.to_le_bytes());
        hasher.update(self.previous);
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.witness.0.to_le_bytes());
        hasher.update(self.transaction_merkle_root);
        hasher.finalize().into()
    }
}

/// A transaction with its authorizing signatures.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// Low 16 bits of the referenced block number (TaPoS).
    pub ref_block_num: u16,
    /// Prefix of the referenced block id (TaPoS).
    pub ref_block_prefix: u32,
    /// Unix timestamp after which the transaction is invalid.
    pub expiration: u64,
    /// The operations to apply, in order.
    pub operations: Vec<Operation>,
    /// Signatures over the canonical serialization.
    #[serde_as(as = "Vec<Bytes>")]
    pub signatures: Vec<Signature>,
}

/// A produced block with its witness signature.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBlock {
    pub header: BlockHeader,
    #[serde_as(as = "Bytes")]
    pub witness_signature: Signature,
    pub transactions: Vec<SignedTransaction>,
}

impl SignedBlock {
    /// The block id, derived from the header.
    #[must_use]
    pub fn id(&self) -> Hash {
        self.header.digest()
    }
}

/// The commit payload published after a block becomes durable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedBlock {
    /// Height of the applied block.
    pub block_num: u32,
    /// Id of the applied block.
    pub block_id: Hash,
    /// Timestamp of the applied block.
    pub timestamp: u64,
    /// Every object the block created, modified, or removed.
    pub changed_objects: BTreeSet<ObjectId>,
    /// Every operation the block applied, in execution order.
    pub operations: Vec<AppliedOperation>,
}

impl AppliedBlock {
    /// True when the block changed nothing the query layer could report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed_objects.is_empty() && self.operations.is_empty()
    }
}
