use log::warn;

use super::Transaction;
use crate::error::{LedgerError, Result};

/// How the ledger treats transactions submitted by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionPolicy {
    /// Accept anything. No signature, balance or duplicate checks.
    Unverified,
    /// Reject caller-made rewards, non-positive amounts and overspends.
    BalanceChecked,
}

impl AdmissionPolicy {
    pub fn from_flag(allow_unverified_transactions: bool) -> Self {
        if allow_unverified_transactions {
            Self::Unverified
        } else {
            Self::BalanceChecked
        }
    }

    /// Decide whether `tx` may enter the pending queue. `spendable` is the
    /// sender's confirmed balance minus whatever it already has queued.
    pub fn admit(&self, tx: &Transaction, spendable: i128) -> Result<()> {
        if *self == Self::Unverified {
            return Ok(());
        }

        let Some(sender) = tx.sender() else {
            warn!("rejected reward transaction to {} from caller", tx.recipient());
            return Err(LedgerError::RewardNotAllowed);
        };

        if tx.amount() <= 0 {
            warn!("rejected transaction from {sender}: amount {}", tx.amount());
            return Err(LedgerError::InvalidAmount(tx.amount()));
        }

        if i128::from(tx.amount()) > spendable {
            warn!(
                "rejected transaction from {sender}: needs {}, has {spendable}",
                tx.amount()
            );
            return Err(LedgerError::InsufficientFunds {
                address: sender.to_string(),
                required: tx.amount(),
                available: spendable,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unverified_accepts_everything() {
        let policy = AdmissionPolicy::from_flag(true);
        assert!(policy.admit(&Transaction::new("a", "b", 1_000), 0).is_ok());
        assert!(policy.admit(&Transaction::new("a", "b", -4), 0).is_ok());
        assert!(policy.admit(&Transaction::reward("a", 9), 0).is_ok());
    }

    #[test]
    fn balance_checked_rejects_overspend() {
        let policy = AdmissionPolicy::from_flag(false);
        assert!(policy.admit(&Transaction::new("a", "b", 5), 5).is_ok());

        let err = policy.admit(&Transaction::new("a", "b", 6), 5).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientFunds { required: 6, available: 5, .. }
        ));
    }

    #[test]
    fn balance_checked_rejects_rewards_and_bad_amounts() {
        let policy = AdmissionPolicy::BalanceChecked;
        assert!(matches!(
            policy.admit(&Transaction::reward("a", 1), 100),
            Err(LedgerError::RewardNotAllowed)
        ));
        assert!(matches!(
            policy.admit(&Transaction::new("a", "b", 0), 100),
            Err(LedgerError::InvalidAmount(0))
        ));
    }
}
