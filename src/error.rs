use thiserror::Error;

/// Errors surfaced by the ledger core.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid difficulty {difficulty}: must be between {min} and {max}")]
    InvalidDifficulty { difficulty: u32, min: u32, max: u32 },

    #[error("chain is empty")]
    EmptyChain,

    #[error("could not serialize transactions for hashing: {0}")]
    SerializationFailure(#[from] serde_json::Error),

    #[error("mining cancelled after {attempts} attempts")]
    MiningCancelled { attempts: u64 },

    #[error("insufficient funds for {address}: required {required}, available {available}")]
    InsufficientFunds {
        address: String,
        required: i64,
        available: i128,
    },

    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    #[error("reward transactions can only be issued by the ledger")]
    RewardNotAllowed,

    #[error("configuration error: {0}")]
    Config(String),
}

/// Why a chain failed validation. Reports the first offending block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainViolation {
    #[error("genesis block was tampered with")]
    GenesisTampered,

    #[error("block {index} hash does not match its content")]
    HashMismatch { index: usize },

    #[error("block {index} does not link to the previous block hash")]
    BrokenLink { index: usize },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
