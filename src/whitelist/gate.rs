//! Claim Gate
//!
//! Consumer-side eligibility check. A claim names an identifier, the
//! claiming account and its proof; the gate rebuilds the leaf, verifies it
//! against the registry root and allows each account to claim once.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::hash::Hash32;
use crate::core::types::{Address, TokenId};
use crate::merkle::{encode_leaf, verify};
use super::registry::{RegistryError, RootRegistry};

/// Reasons a claim is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// Proof does not place (identifier, account) under the root.
    #[error("account {account} is not whitelisted for identifier {identifier}")]
    NotEligible {
        /// Claimed identifier.
        identifier: TokenId,
        /// Claiming account.
        account: Address,
    },

    /// Account already used its claim.
    #[error("account {0} has already claimed")]
    AlreadyClaimed(Address),

    /// Registry has no usable root.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Membership check plus one-claim-per-account bookkeeping.
#[derive(Clone, Debug)]
pub struct ClaimGate {
    registry: RootRegistry,
    claimed: BTreeSet<Address>,
}

impl ClaimGate {
    /// Create a gate over a registry.
    pub fn new(registry: RootRegistry) -> Self {
        Self {
            registry,
            claimed: BTreeSet::new(),
        }
    }

    /// The registry.
    pub fn registry(&self) -> &RootRegistry {
        &self.registry
    }

    /// The registry, for owner root updates.
    pub fn registry_mut(&mut self) -> &mut RootRegistry {
        &mut self.registry
    }

    /// True if `account` has claimed.
    pub fn has_claimed(&self, account: &Address) -> bool {
        self.claimed.contains(account)
    }

    /// Check eligibility without recording a claim.
    pub fn check(
        &self,
        identifier: &TokenId,
        account: &Address,
        proof: &[Hash32],
    ) -> Result<(), ClaimError> {
        let root = self.registry.root()?;

        if self.claimed.contains(account) {
            return Err(ClaimError::AlreadyClaimed(*account));
        }

        let leaf = encode_leaf(identifier, account);
        if !verify(&leaf, proof, &root) {
            warn!("Rejected claim for {} by {}", identifier, account);
            return Err(ClaimError::NotEligible {
                identifier: *identifier,
                account: *account,
            });
        }

        Ok(())
    }

    /// Check eligibility and consume the account's claim.
    pub fn claim(
        &mut self,
        identifier: &TokenId,
        account: &Address,
        proof: &[Hash32],
    ) -> Result<(), ClaimError> {
        self.check(identifier, account, proof)?;
        self.claimed.insert(*account);
        debug!("Claim accepted for {} by {}", identifier, account);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::whitelist::distribution::ProofBook;
    use crate::whitelist::entry::{Entry, Whitelist};

    const OWNER: Address = Address::new([0xee; 20]);

    fn setup() -> (ProofBook, ClaimGate) {
        let entries = (0..3u8)
            .map(|i| Entry::new(TokenId::from(u64::from(i)), Address::new([i + 1; 20])))
            .collect();
        let whitelist = Whitelist::from_entries(entries).unwrap();
        let book = ProofBook::generate(&whitelist, TreeConfig::default()).unwrap();

        let mut registry = RootRegistry::new(OWNER);
        registry.initialize(OWNER, book.root).unwrap();
        (book, ClaimGate::new(registry))
    }

    #[test]
    fn test_claim_once() {
        let (book, mut gate) = setup();
        let record = &book.entries[0];

        gate.claim(&record.identifier, &record.account, &record.proof).unwrap();
        assert!(gate.has_claimed(&record.account));

        assert_eq!(
            gate.claim(&record.identifier, &record.account, &record.proof),
            Err(ClaimError::AlreadyClaimed(record.account))
        );

        // Proof is still valid, just spent
        assert!(record.verify(&gate.registry().root().unwrap()));
    }

    #[test]
    fn test_wrong_account_not_eligible() {
        let (book, mut gate) = setup();
        let record = &book.entries[0];
        let intruder = book.entries[1].account;

        assert!(matches!(
            gate.claim(&record.identifier, &intruder, &record.proof),
            Err(ClaimError::NotEligible { .. })
        ));
        assert!(!gate.has_claimed(&intruder));
    }

    #[test]
    fn test_wrong_identifier_not_eligible() {
        let (book, gate) = setup();
        let record = &book.entries[1];
        assert!(matches!(
            gate.check(&TokenId::from(7u64), &record.account, &record.proof),
            Err(ClaimError::NotEligible { .. })
        ));
    }

    #[test]
    fn test_check_does_not_consume() {
        let (book, gate) = setup();
        let record = &book.entries[2];
        gate.check(&record.identifier, &record.account, &record.proof).unwrap();
        assert!(!gate.has_claimed(&record.account));
    }

    #[test]
    fn test_no_root_rejects() {
        let (book, _) = setup();
        let gate = ClaimGate::new(RootRegistry::new(OWNER));
        let record = &book.entries[0];
        assert_eq!(
            gate.check(&record.identifier, &record.account, &record.proof),
            Err(ClaimError::Registry(RegistryError::RootNotSet))
        );
    }

    #[test]
    fn test_replaced_root_invalidates_old_proofs() {
        let (book, mut gate) = setup();
        gate.registry_mut().replace(OWNER, [0u8; 32]).unwrap();

        let record = &book.entries[0];
        assert!(matches!(
            gate.check(&record.identifier, &record.account, &record.proof),
            Err(ClaimError::NotEligible { .. })
        ));
    }
}
