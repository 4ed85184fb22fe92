use pow_ledger::{Blockchain, ChainViolation, LedgerConfig, LedgerError, Transaction};

fn ledger_with(difficulty: u32) -> Blockchain {
    Blockchain::new(LedgerConfig {
        difficulty,
        genesis_timestamp: Some(1_600_000_000_000),
        ..LedgerConfig::default()
    })
    .expect("valid config")
}

#[test]
fn three_reward_only_blocks() {
    let mut bc = ledger_with(1);
    let initial_reward = bc.mining_reward();

    for _ in 0..3 {
        bc.mine_pending_transactions("abc").unwrap();
    }

    assert_eq!(bc.len(), 4);
    assert!(bc.chain()[1..].iter().all(|b| b.hash().starts_with('0')));
    assert!(bc.is_chain_valid());
    assert_eq!(bc.get_balance("abc"), 2 * i128::from(initial_reward));
    // Third payout is still waiting for the next block.
    assert_eq!(bc.pending_transactions(), &[Transaction::reward("abc", initial_reward)]);
}

#[test]
fn user_transactions_flow_into_balances() {
    let mut bc = ledger_with(2);
    bc.create_transaction(Transaction::new("alice", "bob", 30)).unwrap();
    bc.create_transaction(Transaction::new("bob", "carol", 10)).unwrap();
    bc.mine_pending_transactions("miner").unwrap();
    bc.mine_pending_transactions("miner").unwrap();

    assert_eq!(bc.get_balance("alice"), -30);
    assert_eq!(bc.get_balance("bob"), 20);
    assert_eq!(bc.get_balance("carol"), 10);
    assert_eq!(bc.get_balance("miner"), 5);
    assert_eq!(bc.get_balance("stranger"), 0);
    assert_eq!(bc.validate_chain(), Ok::<(), ChainViolation>(()));
}

#[test]
fn genesis_is_reproducible_from_timestamp() {
    let a = ledger_with(1);
    let b = ledger_with(3);
    assert_eq!(a.last_block().unwrap().hash(), b.last_block().unwrap().hash());
}

#[test]
fn strict_mode_guards_the_queue() {
    let mut bc = Blockchain::new(LedgerConfig {
        allow_unverified_transactions: false,
        ..LedgerConfig::default()
    })
    .unwrap();

    let err = bc
        .create_transaction(Transaction::reward("mallory", 1_000))
        .unwrap_err();
    assert!(matches!(err, LedgerError::RewardNotAllowed));
    assert!(bc.pending_transactions().is_empty());
}
