use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, MAX_DIFFICULTY};
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// A sealed block. Its `hash` matches its content and only the mining
/// routine (or genesis creation) can produce one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub(crate) previous_hash: String,
    pub(crate) timestamp: i64, // Unix millis (UTC)
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) nonce: u64,
    pub(crate) hash: String,
}

impl Block {
    /// The first block of every chain: sentinel previous hash, no
    /// transactions and no proof-of-work.
    pub fn genesis(timestamp: i64) -> Result<Self> {
        let draft = BlockDraft::new(GENESIS_PREVIOUS_HASH.to_string(), timestamp, Vec::new())?;
        Ok(draft.seal())
    }

    /// Recompute the SHA-256 hash from the block's current content.
    pub fn compute_hash(&self) -> Result<String> {
        let preimage = preimage_prefix(&self.previous_hash, self.timestamp, &self.transactions)?;
        Ok(hash_with_nonce(&preimage, self.nonce))
    }

    /// True when the cached hash still matches the content.
    pub fn has_valid_hash(&self) -> bool {
        self.compute_hash().is_ok_and(|h| h == self.hash)
    }

    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        meets_target(&self.hash, difficulty)
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

/// A block under construction. Owns the mutable nonce search state and
/// turns into a [`Block`] once mined.
#[derive(Debug, Clone)]
pub struct BlockDraft {
    previous_hash: String,
    timestamp: i64,
    transactions: Vec<Transaction>,
    nonce: u64,
    hash: String,
    // previous_hash ∥ timestamp ∥ json(transactions), fixed while mining
    preimage: String,
}

impl BlockDraft {
    /// Create a draft at nonce 0 with its hash already computed.
    pub fn new(previous_hash: String, timestamp: i64, transactions: Vec<Transaction>) -> Result<Self> {
        let preimage = preimage_prefix(&previous_hash, timestamp, &transactions)?;
        let hash = hash_with_nonce(&preimage, 0);
        Ok(Self {
            previous_hash,
            timestamp,
            transactions,
            nonce: 0,
            hash,
            preimage,
        })
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Proof-of-work: bump the nonce until the hex hash starts with
    /// `difficulty` zeros. Runs until it succeeds.
    pub fn mine(self, difficulty: u32) -> Result<Block> {
        self.mine_with_cancel(difficulty, &AtomicBool::new(false))
    }

    /// Like [`BlockDraft::mine`], but checks `cancel` before every nonce
    /// increment and gives up with [`LedgerError::MiningCancelled`].
    pub fn mine_with_cancel(mut self, difficulty: u32, cancel: &AtomicBool) -> Result<Block> {
        check_difficulty(difficulty, 0)?;

        let mut attempts: u64 = 0;
        while !meets_target(&self.hash, difficulty) {
            if cancel.load(Ordering::Relaxed) {
                return Err(LedgerError::MiningCancelled { attempts });
            }
            self.nonce = self.nonce.wrapping_add(1);
            self.hash = hash_with_nonce(&self.preimage, self.nonce);
            attempts += 1;
        }

        debug!(
            "draft mined at difficulty {difficulty}: nonce={} attempts={attempts}",
            self.nonce
        );
        Ok(self.seal())
    }

    fn seal(self) -> Block {
        Block {
            previous_hash: self.previous_hash,
            timestamp: self.timestamp,
            transactions: self.transactions,
            nonce: self.nonce,
            hash: self.hash,
        }
    }
}

/// Reject difficulties outside `min..=MAX_DIFFICULTY` (64 hex chars in a
/// SHA-256 digest).
pub(crate) fn check_difficulty(difficulty: u32, min: u32) -> Result<()> {
    if difficulty < min || difficulty > MAX_DIFFICULTY {
        return Err(LedgerError::InvalidDifficulty {
            difficulty,
            min,
            max: MAX_DIFFICULTY,
        });
    }
    Ok(())
}

fn preimage_prefix(previous_hash: &str, timestamp: i64, transactions: &[Transaction]) -> Result<String> {
    let txs_json = serde_json::to_string(transactions)?;
    Ok(format!("{previous_hash}{timestamp}{txs_json}"))
}

fn hash_with_nonce(preimage: &str, nonce: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(preimage.as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

fn meets_target(hash: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}
