use std::process::ExitCode;

use dotenvy::dotenv;
use log::{error, info};
use pow_ledger::config::parse_var;
use pow_ledger::{Blockchain, LedgerConfig};

const DEFAULT_DEMO_BLOCKS: usize = 300;
const DEFAULT_MINER_ADDRESS: &str = "abc";

fn run() -> pow_ledger::Result<bool> {
    let lookup = |key: &str| std::env::var(key).ok();
    let config = LedgerConfig::from_env()?;
    let blocks: usize = parse_var(&lookup, "DEMO_BLOCKS")?.unwrap_or(DEFAULT_DEMO_BLOCKS);
    let miner = lookup("DEMO_MINER_ADDRESS").unwrap_or_else(|| DEFAULT_MINER_ADDRESS.to_string());

    info!(
        "mining {blocks} blocks to {miner} (difficulty {}, reward {})",
        config.difficulty, config.mining_reward
    );

    let mut ledger = Blockchain::new(config)?;
    for _ in 0..blocks {
        ledger.mine_pending_transactions(&miner)?;
    }

    println!("{}", serde_json::to_string_pretty(&ledger)?);

    let valid = ledger.is_chain_valid();
    println!("{valid}");
    info!(
        "chain length {} valid={valid} balance[{miner}]={}",
        ledger.len(),
        ledger.get_balance(&miner)
    );
    Ok(valid)
}

fn main() -> ExitCode {
    let _ = dotenv();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
