pub mod block;
pub mod model;

pub use block::{Block, BlockDraft};
pub use model::Blockchain;

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 1;

/// Highest usable difficulty: a SHA-256 digest has 64 hex characters.
pub const MAX_DIFFICULTY: u32 = 64;

/// Initial reward paid to the miner of each block.
pub const DEFAULT_MINING_REWARD: i64 = 5;

/// Difficulty is raised whenever the chain length hits a multiple of this.
pub const DEFAULT_ADJUSTMENT_PERIOD: usize = 100;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
