use std::env;
use std::str::FromStr;

use crate::blockchain::{
    DEFAULT_ADJUSTMENT_PERIOD, DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD,
};
use crate::error::{LedgerError, Result};

/// Construction parameters for a [`crate::Blockchain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Leading '0' hex characters required in a block hash.
    pub difficulty: u32,
    /// Genesis timestamp in Unix millis; `None` means "now".
    pub genesis_timestamp: Option<i64>,
    pub mining_reward: i64,
    /// Difficulty goes up (and the reward down) whenever the chain length
    /// reaches a multiple of this value.
    pub difficulty_adjustment_period: usize,
    /// When false, submitted transactions are checked against balances.
    pub allow_unverified_transactions: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            genesis_timestamp: None,
            mining_reward: DEFAULT_MINING_REWARD,
            difficulty_adjustment_period: DEFAULT_ADJUSTMENT_PERIOD,
            allow_unverified_transactions: true,
        }
    }
}

impl LedgerConfig {
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Read overrides from `LEDGER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`LedgerConfig::from_env`] but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            difficulty: parse_var(&lookup, "LEDGER_DIFFICULTY")?.unwrap_or(defaults.difficulty),
            genesis_timestamp: parse_var(&lookup, "LEDGER_GENESIS_TIMESTAMP")?,
            mining_reward: parse_var(&lookup, "LEDGER_MINING_REWARD")?
                .unwrap_or(defaults.mining_reward),
            difficulty_adjustment_period: parse_var(&lookup, "LEDGER_ADJUSTMENT_PERIOD")?
                .unwrap_or(defaults.difficulty_adjustment_period),
            allow_unverified_transactions: parse_var(&lookup, "LEDGER_ALLOW_UNVERIFIED")?
                .unwrap_or(defaults.allow_unverified_transactions),
        })
    }
}

/// Parse `key` if present. Blank values count as unset.
pub fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| LedgerError::Config(format!("{key}: cannot parse {raw:?}"))),
        _ => Ok(None),
    }
}
