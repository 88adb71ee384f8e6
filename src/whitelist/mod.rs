//! Whitelist Tooling
//!
//! Everything around the engine: the operator's typed whitelist, the proof
//! book distributed to claimants, and the consumer's root registry and
//! claim gate.

pub mod distribution;
pub mod entry;
pub mod gate;
pub mod registry;

pub use distribution::{DistributionError, ProofBook, ProofRecord};
pub use entry::{Entry, Whitelist, WhitelistError};
pub use gate::{ClaimError, ClaimGate};
pub use registry::{RegistryError, RootRegistry};
