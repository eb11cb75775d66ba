//! Deposit ledger: account → balance.
//!
//! Balances are created on first credit and never deleted. Credits fail
//! closed on overflow; debits fail rather than go below zero. Both only
//! stage their write in the enclosing [`LedgerTx`].

use custody_store::Table;
use custody_types::{Account, DepositBalance, Result};

use crate::tx::LedgerTx;

pub struct DepositLedger;

impl DepositLedger {
    /// Add `amount` to `account`, creating the record if needed.
    /// Returns the new balance.
    ///
    /// # Errors
    /// Returns `BalanceOverflow` if the result exceeds `u64::MAX`.
    pub fn credit(tx: &mut LedgerTx<'_>, account: &Account, amount: u64) -> Result<u64> {
        let current = tx
            .deposits
            .get(account)
            .cloned()
            .unwrap_or_else(|| DepositBalance::empty(account.clone()));
        let updated = current.credited(amount)?;
        let balance = updated.amount;
        tx.deposits.upsert(updated)?;
        tracing::debug!(tx = %tx.id(), account = %account, amount, balance, "Credit staged");
        Ok(balance)
    }

    /// Subtract `amount` from `account`. Returns the new balance.
    ///
    /// The check and the write happen against the same staged view, and
    /// mutators are serialized by the ledger, so two debits can never both
    /// pass against one pre-debit balance.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `amount` exceeds the balance
    /// (an account without a record has balance zero).
    pub fn debit(tx: &mut LedgerTx<'_>, account: &Account, amount: u64) -> Result<u64> {
        let Some(current) = tx.deposits.get(account).cloned() else {
            // Only credits create records.
            return DepositBalance::empty(account.clone())
                .debited(amount)
                .map(|b| b.amount);
        };
        let updated = current.debited(amount)?;
        let balance = updated.amount;
        tx.deposits.upsert(updated)?;
        tracing::debug!(tx = %tx.id(), account = %account, amount, balance, "Debit staged");
        Ok(balance)
    }

    /// Committed balance of `account`, 0 if it has no record.
    #[must_use]
    pub fn balance_of(table: &Table<DepositBalance>, account: &Account) -> u64 {
        table.get(account).map_or(0, |b| b.amount)
    }
}
