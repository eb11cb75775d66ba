//! Audit trail verification.

use custody_types::{constants, LedgerError, LedgerEvent, Result};

/// Walk `events` in order and confirm they form one unbroken hash chain
/// starting from the genesis digest.
///
/// # Errors
/// Returns `EventChainBroken` at the first gap, broken link, or digest
/// that does not match its event.
pub fn verify_chain<'e>(events: impl IntoIterator<Item = &'e LedgerEvent>) -> Result<()> {
    let mut expected_seq = 0u64;
    let mut prev = constants::GENESIS_DIGEST;
    for event in events {
        if event.seq != expected_seq {
            return Err(LedgerError::EventChainBroken {
                seq: event.seq,
                reason: format!("expected seq {expected_seq}"),
            });
        }
        if event.prev_digest != prev {
            return Err(LedgerError::EventChainBroken {
                seq: event.seq,
                reason: "prev_digest does not link to preceding event".into(),
            });
        }
        if !event.is_intact()? {
            return Err(LedgerError::EventChainBroken {
                seq: event.seq,
                reason: format!("digest {} does not match contents", event.digest_hex()),
            });
        }
        prev = event.digest;
        expected_seq += 1;
    }
    Ok(())
}
