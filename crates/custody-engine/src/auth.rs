//! Authorization gate.
//!
//! Each mutating operation declares an [`AuthPolicy`]. The gate resolves
//! that policy to the principal whose authority is required and compares
//! it with the caller established by the signature layer. Success yields
//! an [`Authorized`] capability; ledger components only run when handed one.

use custody_types::{Account, AuthPolicy, LedgerError, Operation, Result};

/// Proof that the gate admitted `principal` for `operation`.
///
/// Only the gate can construct this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorized {
    operation: Operation,
    principal: Account,
}

impl Authorized {
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The caller the gate admitted.
    #[must_use]
    pub fn principal(&self) -> &Account {
        &self.principal
    }

    /// Confirm this capability was issued for `operation` to the principal
    /// the component itself resolves as `required`.
    ///
    /// # Errors
    /// - `Internal` if it was issued for another operation
    /// - `Unauthorized` if it was issued to anyone but `required`
    pub(crate) fn ensure(&self, operation: Operation, required: &Account) -> Result<()> {
        if self.operation != operation {
            return Err(LedgerError::Internal(format!(
                "capability for {} presented to {operation}",
                self.operation
            )));
        }
        if &self.principal != required {
            return Err(LedgerError::Unauthorized {
                operation,
                caller: self.principal.clone(),
                required: required.clone(),
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn for_test(operation: Operation, principal: Account) -> Self {
        Self {
            operation,
            principal,
        }
    }
}

/// Stateless authority check.
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// The principal whose authority `policy` requires.
    ///
    /// `subject` is the account named in the request payload; owner-only
    /// operations ignore it.
    pub fn required<'p>(
        policy: AuthPolicy,
        owner: &'p Account,
        subject: Option<&'p Account>,
    ) -> Result<&'p Account> {
        match policy {
            AuthPolicy::OwnerOnly => Ok(owner),
            AuthPolicy::SelfAttested => subject.ok_or_else(|| {
                LedgerError::Internal("self-attested operation without a subject account".into())
            }),
        }
    }

    /// Admit `caller` for `operation` if it is the `required` principal.
    ///
    /// # Errors
    /// Returns `Unauthorized` otherwise.
    pub fn authorize(
        operation: Operation,
        caller: &Account,
        required: &Account,
    ) -> Result<Authorized> {
        if caller != required {
            tracing::warn!(
                op = %operation,
                policy = %operation.policy(),
                caller = %caller,
                required = %required,
                "Authorization denied"
            );
            return Err(LedgerError::Unauthorized {
                operation,
                caller: caller.clone(),
                required: required.clone(),
            });
        }
        Ok(Authorized {
            operation,
            principal: caller.clone(),
        })
    }

    /// Resolve the policy for `operation` and authorize `caller` against it.
    pub fn admit(
        operation: Operation,
        caller: &Account,
        owner: &Account,
        subject: Option<&Account>,
    ) -> Result<Authorized> {
        let required = Self::required(operation.policy(), owner, subject)?;
        Self::authorize(operation, caller, required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_types::ErrorKind;

    #[test]
    fn owner_only_admits_owner() {
        let owner = Account::new("exchange");
        let auth =
            AuthorizationGate::admit(Operation::RecordCheckpoint, &owner, &owner, None).unwrap();
        assert_eq!(auth.principal(), &owner);
        assert_eq!(auth.operation(), Operation::RecordCheckpoint);
    }

    #[test]
    fn owner_only_ignores_subject() {
        let owner = Account::new("exchange");
        let alice = Account::new("alice");
        let err = AuthorizationGate::admit(Operation::Withdraw, &alice, &owner, Some(&alice))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn self_attested_admits_subject_only() {
        let owner = Account::new("exchange");
        let alice = Account::new("alice");
        let bob = Account::new("bob");
        assert!(AuthorizationGate::admit(Operation::PlaceOrder, &alice, &owner, Some(&alice)).is_ok());
        let err = AuthorizationGate::admit(Operation::PlaceOrder, &bob, &owner, Some(&alice))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Unauthorized { ref required, .. } if *required == alice
        ));
    }

    #[test]
    fn owner_is_not_implicitly_every_account() {
        let owner = Account::new("exchange");
        let alice = Account::new("alice");
        let err = AuthorizationGate::admit(Operation::Deposit, &owner, &owner, Some(&alice))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn self_attested_without_subject_is_internal() {
        let owner = Account::new("exchange");
        let err =
            AuthorizationGate::admit(Operation::Deposit, &owner, &owner, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn capability_is_bound_to_operation() {
        let a = Account::new("a");
        let auth = Authorized::for_test(Operation::Deposit, a.clone());
        assert!(auth.ensure(Operation::Deposit, &a).is_ok());
        assert_eq!(
            auth.ensure(Operation::Withdraw, &a).unwrap_err().kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn capability_is_bound_to_principal() {
        let owner = Account::new("exchange");
        let alice = Account::new("alice");
        let bob = Account::new("bob");
        // A legitimately issued capability for bob's own order.
        let auth = AuthorizationGate::authorize(Operation::PlaceOrder, &bob, &bob).unwrap();
        let err = auth.ensure(Operation::PlaceOrder, &alice).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Unauthorized { ref caller, ref required, .. }
                if *caller == bob && *required == alice
        ));
        let auth = AuthorizationGate::admit(Operation::Debit, &owner, &owner, None).unwrap();
        assert_eq!(
            auth.ensure(Operation::Debit, &alice).unwrap_err().kind(),
            ErrorKind::Authorization
        );
    }
}
