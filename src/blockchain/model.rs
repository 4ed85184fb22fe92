use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use log::{debug, info, warn};
use serde::Serialize;

use super::block::check_difficulty;
use super::{Block, BlockDraft, GENESIS_PREVIOUS_HASH, MAX_DIFFICULTY};
use crate::config::LedgerConfig;
use crate::error::{ChainViolation, LedgerError, Result};
use crate::transaction::{AdmissionPolicy, Transaction};

/// Simple in-memory ledger with Proof-of-Work.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blockchain {
    chain: Vec<Block>,
    difficulty: u32,
    pending_transactions: Vec<Transaction>,
    mining_reward: i64,
    difficulty_adjustment_period: usize,
    #[serde(skip)]
    policy: AdmissionPolicy,
}

impl Blockchain {
    /// Initialize a new ledger with its genesis block.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        check_difficulty(config.difficulty, 1)?;
        if config.difficulty_adjustment_period == 0 {
            return Err(LedgerError::Config(
                "difficulty adjustment period must be positive".to_string(),
            ));
        }

        let genesis_timestamp = config
            .genesis_timestamp
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        let genesis = Self::create_genesis_block(genesis_timestamp)?;
        debug!("genesis block created: {}", genesis.hash());

        Ok(Self {
            chain: vec![genesis],
            difficulty: config.difficulty,
            pending_transactions: Vec::new(),
            mining_reward: config.mining_reward,
            difficulty_adjustment_period: config.difficulty_adjustment_period,
            policy: AdmissionPolicy::from_flag(config.allow_unverified_transactions),
        })
    }

    pub fn create_genesis_block(timestamp: i64) -> Result<Block> {
        Block::genesis(timestamp)
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Queue a transaction for the next mined block.
    pub fn create_transaction(&mut self, transaction: Transaction) -> Result<()> {
        let spendable = match transaction.sender() {
            Some(sender) if self.policy == AdmissionPolicy::BalanceChecked => {
                self.get_balance(sender) - self.pending_outgoing(sender)
            }
            _ => 0,
        };
        self.policy.admit(&transaction, spendable)?;

        debug!(
            "queued transaction {:?} -> {} ({})",
            transaction.sender(),
            transaction.recipient(),
            transaction.amount()
        );
        self.pending_transactions.push(transaction);
        Ok(())
    }

    /// Mine the pending queue into a new block, then queue the reward for
    /// `reward_address`. Blocks the caller until a hash is found.
    pub fn mine_pending_transactions(&mut self, reward_address: &str) -> Result<&Block> {
        self.mine_pending_transactions_with_cancel(reward_address, &AtomicBool::new(false))
    }

    /// Cancellable variant. On cancellation the chain and the pending queue
    /// are left untouched.
    pub fn mine_pending_transactions_with_cancel(
        &mut self,
        reward_address: &str,
        cancel: &AtomicBool,
    ) -> Result<&Block> {
        let previous_hash = self.last_block()?.hash().to_string();
        let draft = BlockDraft::new(
            previous_hash,
            Utc::now().timestamp_millis(),
            self.pending_transactions.clone(),
        )?;

        let block = match draft.mine_with_cancel(self.difficulty, cancel) {
            Ok(block) => block,
            Err(err) => {
                if cancel.load(Ordering::Relaxed) {
                    warn!("mining of block {} cancelled", self.chain.len());
                }
                return Err(err);
            }
        };

        info!(
            "block {} mined: nonce={} hash={}",
            self.chain.len(),
            block.nonce(),
            block.hash()
        );
        self.chain.push(block);

        if self.chain.len() % self.difficulty_adjustment_period == 0 {
            self.handle_difficulty_change();
        }

        self.pending_transactions = vec![Transaction::reward(reward_address, self.mining_reward)];
        self.last_block()
    }

    /// Difficulty stops at `MAX_DIFFICULTY` so the ledger can still mine;
    /// the reward keeps dropping and may go negative.
    fn handle_difficulty_change(&mut self) {
        self.difficulty = (self.difficulty + 1).min(MAX_DIFFICULTY);
        self.mining_reward = self.mining_reward.saturating_sub(1);
        info!(
            "difficulty increased to {} (reward now {})",
            self.difficulty, self.mining_reward
        );
    }

    /// Validate the entire chain: genesis, every hash and every link.
    pub fn validate_chain(&self) -> std::result::Result<(), ChainViolation> {
        let Some(genesis) = self.chain.first() else {
            return Err(ChainViolation::GenesisTampered);
        };
        if genesis.previous_hash() != GENESIS_PREVIOUS_HASH || !genesis.has_valid_hash() {
            return Err(ChainViolation::GenesisTampered);
        }

        for (index, pair) in self.chain.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let index = index + 1;

            if !current.has_valid_hash() {
                return Err(ChainViolation::HashMismatch { index });
            }
            if current.previous_hash() != previous.hash() {
                return Err(ChainViolation::BrokenLink { index });
            }
        }

        Ok(())
    }

    pub fn is_chain_valid(&self) -> bool {
        self.validate_chain().is_ok()
    }

    /// Net amount received minus amount sent by `address` across all mined
    /// blocks. Pending transactions are not counted. Accumulates in `i128`,
    /// so any history of `i64` amounts sums without overflow.
    pub fn get_balance(&self, address: &str) -> i128 {
        self.chain
            .iter()
            .flat_map(|block| block.transactions())
            .map(|tx| tx.delta_for(address))
            .sum()
    }

    fn pending_outgoing(&self, address: &str) -> i128 {
        self.pending_transactions
            .iter()
            .filter(|tx| tx.sender() == Some(address))
            .map(|tx| i128::from(tx.amount()))
            .sum()
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn mining_reward(&self) -> i64 {
        self.mining_reward
    }

    pub fn difficulty_adjustment_period(&self) -> usize {
        self.difficulty_adjustment_period
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending_transactions
    }
}
