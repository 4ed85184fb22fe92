//! Minimal proof-of-work ledger: hash-linked blocks, nonce mining,
//! full-chain validation and balances derived from transaction history.

pub mod blockchain;
pub mod config;
pub mod error;
pub mod transaction;

pub use blockchain::{Block, BlockDraft, Blockchain};
pub use config::LedgerConfig;
pub use error::{ChainViolation, LedgerError, Result};
pub use transaction::{AdmissionPolicy, Transaction};
