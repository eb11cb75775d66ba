//! Deposit balance entity.
//!
//! One record per account, created on the first credit and never deleted.
//! Arithmetic is checked in both directions: credits fail on overflow,
//! debits fail rather than go below zero.

use serde::{Deserialize, Serialize};

use crate::{Account, LedgerError, Result};

/// The ledger's record of funds held for one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepositBalance {
    pub account: Account,
    pub amount: u64,
}

impl DepositBalance {
    /// A zero balance for `account`.
    #[must_use]
    pub fn empty(account: Account) -> Self {
        Self { account, amount: 0 }
    }

    /// This balance increased by `amount`.
    ///
    /// # Errors
    /// Returns `BalanceOverflow` if the sum exceeds `u64::MAX`.
    pub fn credited(&self, amount: u64) -> Result<Self> {
        let new_amount =
            self.amount
                .checked_add(amount)
                .ok_or_else(|| LedgerError::BalanceOverflow {
                    account: self.account.clone(),
                    current: self.amount,
                    amount,
                })?;
        Ok(Self {
            account: self.account.clone(),
            amount: new_amount,
        })
    }

    /// This balance decreased by `amount`.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `amount` exceeds the balance.
    pub fn debited(&self, amount: u64) -> Result<Self> {
        let new_amount =
            self.amount
                .checked_sub(amount)
                .ok_or_else(|| LedgerError::InsufficientFunds {
                    account: self.account.clone(),
                    requested: amount,
                    available: self.amount,
                })?;
        Ok(Self {
            account: self.account.clone(),
            amount: new_amount,
        })
    }
}
