//! Withdrawal gate.
//!
//! A withdrawal debits the owner's own deposit balance and then issues one
//! instruction to the asset-transfer collaborator. The instruction is the
//! last fallible step, so a rejection discards the staged debit along with
//! everything else in the transaction.

use custody_types::{Account, EventKind, LedgerError, Operation, Result};

use crate::auth::Authorized;
use crate::deposits::DepositLedger;
use crate::transfer::AssetTransfer;
use crate::tx::LedgerTx;

pub struct WithdrawalGate;

impl WithdrawalGate {
    /// Debit the owner by `amount` and instruct `transfer` to pay `receiver`.
    ///
    /// # Errors
    /// - `InsufficientFunds` if the owner's balance is below `amount`
    /// - `TransferRejected` if the collaborator refuses the instruction
    pub fn withdraw<T: AssetTransfer + ?Sized>(
        tx: &mut LedgerTx<'_>,
        auth: &Authorized,
        transfer: &mut T,
        receiver: &Account,
        amount: u64,
    ) -> Result<()> {
        auth.ensure(Operation::Withdraw, tx.owner())?;

        let owner = tx.owner().clone();
        let remaining = DepositLedger::debit(tx, &owner, amount)?;
        tx.emit(EventKind::Withdrawn {
            receiver: receiver.clone(),
            amount,
        })?;

        if let Err(rejection) = transfer.transfer(receiver, amount) {
            tracing::warn!(
                tx = %tx.id(),
                receiver = %receiver,
                amount,
                reason = %rejection,
                "Outbound transfer rejected"
            );
            return Err(LedgerError::TransferRejected {
                receiver: receiver.clone(),
                amount,
                reason: rejection.reason,
            });
        }

        tracing::debug!(
            tx = %tx.id(),
            receiver = %receiver,
            amount,
            owner_balance = remaining,
            "Withdrawal staged"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::RecordingTransfer;
    use crate::tx::LedgerState;
    use custody_types::{ErrorKind, TxId};

    fn funded_state(amount: u64) -> LedgerState {
        let mut state = LedgerState::new(Account::new("exchange"));
        let owner = state.owner().clone();
        let changes = {
            let mut tx = LedgerTx::begin(TxId::new(), &state, true);
            DepositLedger::credit(&mut tx, &owner, amount).unwrap();
            tx.into_changes()
        };
        state.apply(changes);
        state
    }

    fn withdraw(
        state: &mut LedgerState,
        transfer: &mut RecordingTransfer,
        receiver: &Account,
        amount: u64,
    ) -> Result<()> {
        let auth = Authorized::for_test(Operation::Withdraw, state.owner().clone());
        let changes = {
            let mut tx = LedgerTx::begin(TxId::new(), state, true);
            WithdrawalGate::withdraw(&mut tx, &auth, transfer, receiver, amount)?;
            tx.into_changes()
        };
        state.apply(changes);
        Ok(())
    }

    #[test]
    fn withdraw_debits_owner_and_sends() {
        let mut state = funded_state(100);
        let mut transfer = RecordingTransfer::new();
        let bob = Account::new("bob");
        withdraw(&mut state, &mut transfer, &bob, 30).unwrap();
        assert_eq!(DepositLedger::balance_of(state.deposits(), state.owner()), 70);
        assert_eq!(transfer.accepted().len(), 1);
        assert_eq!(transfer.accepted()[0].receiver, bob);
        assert_eq!(transfer.accepted()[0].amount, 30);
    }

    #[test]
    fn insufficient_owner_balance_sends_nothing() {
        let mut state = funded_state(10);
        let mut transfer = RecordingTransfer::new();
        let err = withdraw(&mut state, &mut transfer, &Account::new("bob"), 11).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert!(transfer.accepted().is_empty());
        assert_eq!(DepositLedger::balance_of(state.deposits(), state.owner()), 10);
    }

    #[test]
    fn rejected_transfer_rolls_back_debit() {
        let mut state = funded_state(100);
        let mut transfer = RecordingTransfer::new();
        let mallory = Account::new("mallory");
        transfer.block(mallory.clone());
        let events_before = state.events().len();
        let err = withdraw(&mut state, &mut transfer, &mallory, 40).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalCollaborator);
        assert_eq!(DepositLedger::balance_of(state.deposits(), state.owner()), 100);
        assert_eq!(state.events().len(), events_before);
    }
}
