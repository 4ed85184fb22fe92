use serde::Serialize;

/// A transfer of `amount` from one address to another.
///
/// Reward transactions have no sender (`from` is `None`). Values are
/// immutable once built; the serialized field order is part of the block
/// hash preimage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    #[serde(rename = "fromAddress")]
    pub(crate) from: Option<String>,
    #[serde(rename = "toAddress")]
    pub(crate) to: String,
    pub(crate) amount: i64,
}

impl Transaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: i64) -> Self {
        Self {
            from: Some(from.into()),
            to: to.into(),
            amount,
        }
    }

    /// Mining reward paid out of nowhere to `to`.
    pub fn reward(to: impl Into<String>, amount: i64) -> Self {
        Self {
            from: None,
            to: to.into(),
            amount,
        }
    }

    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn recipient(&self) -> &str {
        &self.to
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn is_reward(&self) -> bool {
        self.from.is_none()
    }

    /// Signed effect of this transaction on `address`. Widened to `i128`
    /// so that `-i64::MIN` and sums of large credits cannot overflow.
    pub fn delta_for(&self, address: &str) -> i128 {
        let amount = i128::from(self.amount);
        let mut delta = 0;
        if self.sender() == Some(address) {
            delta -= amount;
        }
        if self.to == address {
            delta += amount;
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::Transaction;

    #[test]
    fn serializes_with_stable_field_order() {
        let tx = Transaction::new("alice", "bob", 7);
        let json = serde_json::to_string(&tx).unwrap();
        assert_eq!(json, r#"{"fromAddress":"alice","toAddress":"bob","amount":7}"#);

        let reward = Transaction::reward("miner", 5);
        let json = serde_json::to_string(&reward).unwrap();
        assert_eq!(json, r#"{"fromAddress":null,"toAddress":"miner","amount":5}"#);
    }

    #[test]
    fn delta_for_sender_recipient_and_stranger() {
        let tx = Transaction::new("alice", "bob", 7);
        assert_eq!(tx.delta_for("alice"), -7);
        assert_eq!(tx.delta_for("bob"), 7);
        assert_eq!(tx.delta_for("carol"), 0);

        // Self-transfer nets out.
        let own = Transaction::new("alice", "alice", 3);
        assert_eq!(own.delta_for("alice"), 0);
    }

    #[test]
    fn delta_for_extreme_amounts_does_not_overflow() {
        let min = Transaction::new("alice", "bob", i64::MIN);
        assert_eq!(min.delta_for("alice"), -i128::from(i64::MIN));
        assert_eq!(min.delta_for("bob"), i128::from(i64::MIN));

        let max = Transaction::new("alice", "bob", i64::MAX);
        assert_eq!(max.delta_for("alice"), -i128::from(i64::MAX));
    }

    #[test]
    fn reward_has_no_sender() {
        let reward = Transaction::reward("miner", 5);
        assert!(reward.is_reward());
        assert_eq!(reward.sender(), None);
        assert_eq!(reward.delta_for("miner"), 5);
    }
}
