//! Published Root
//!
//! The consuming system's only persisted whitelist state. The owner sets the
//! root once at setup and may replace it later; nobody else can touch it.

use thiserror::Error;
use tracing::{info, warn};

use crate::core::encoding::to_hex;
use crate::core::hash::Root;
use crate::core::types::Address;

/// Root lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Caller is not the owner.
    #[error("caller {caller} is not the registry owner")]
    NotAuthorized {
        /// Rejected caller.
        caller: Address,
    },

    /// `initialize` called on a registry that already has a root.
    #[error("whitelist root already initialized")]
    AlreadyInitialized,

    /// Root read or replaced before it was initialized.
    #[error("whitelist root not set")]
    RootNotSet,
}

/// Owner-gated holder of the published root.
#[derive(Clone, Debug)]
pub struct RootRegistry {
    owner: Address,
    root: Option<Root>,
}

impl RootRegistry {
    /// Create an empty registry owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self { owner, root: None }
    }

    /// Registry owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// True once a root has been set.
    pub fn is_initialized(&self) -> bool {
        self.root.is_some()
    }

    /// Current root.
    pub fn root(&self) -> Result<Root, RegistryError> {
        self.root.ok_or(RegistryError::RootNotSet)
    }

    /// Set the root for the first time.
    pub fn initialize(&mut self, caller: Address, root: Root) -> Result<(), RegistryError> {
        self.authorize(caller)?;
        if self.root.is_some() {
            return Err(RegistryError::AlreadyInitialized);
        }

        self.root = Some(root);
        info!("Whitelist root initialized: {}", to_hex(root));
        Ok(())
    }

    /// Replace an initialized root, returning the previous one.
    pub fn replace(&mut self, caller: Address, root: Root) -> Result<Root, RegistryError> {
        self.authorize(caller)?;
        let previous = self.root.ok_or(RegistryError::RootNotSet)?;

        self.root = Some(root);
        info!(
            "Whitelist root replaced: {} -> {}",
            to_hex(previous),
            to_hex(root)
        );
        Ok(previous)
    }

    fn authorize(&self, caller: Address) -> Result<(), RegistryError> {
        if caller != self.owner {
            warn!("Rejected root update from {}", caller);
            return Err(RegistryError::NotAuthorized { caller });
        }
        Ok(())
    }
}
