//! Registry of entry point and stake manager constructors keyed by version token

use crate::{
    entry_point::{
        EntryPoint, EntryPointV0_6, EntryPointV0_7, StakeManager, StakeManagerV0_6,
        StakeManagerV0_7,
    },
    error::EntryPointError,
};
use ethers::{providers::Middleware, types::Address};
use kestrel_primitives::constants::entry_point::{VERSION_V0_6, VERSION_V0_7};
use std::{collections::BTreeMap, fmt, sync::Arc};
use tracing::trace;

/// Builds the entry point of a version at the given address
pub type EntryPointConstructor<M> =
    fn(Address, Arc<M>) -> Result<Arc<dyn EntryPoint>, EntryPointError>;

/// Builds the stake manager of a version
pub type StakeManagerConstructor = fn() -> Arc<dyn StakeManager>;

/// Collects constructors before the registry is frozen
pub struct VersionRegistryBuilder<M> {
    entry_points: BTreeMap<String, EntryPointConstructor<M>>,
    stake_managers: BTreeMap<String, StakeManagerConstructor>,
}

impl<M> Default for VersionRegistryBuilder<M> {
    fn default() -> Self {
        Self { entry_points: BTreeMap::new(), stake_managers: BTreeMap::new() }
    }
}

impl<M> VersionRegistryBuilder<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the entry point constructor of `version`, replacing any previous one
    pub fn register_entry_point(
        mut self,
        version: impl Into<String>,
        constructor: EntryPointConstructor<M>,
    ) -> Self {
        self.entry_points.insert(version.into(), constructor);
        self
    }

    /// Registers the stake manager constructor of `version`, replacing any previous one
    pub fn register_stake_manager(
        mut self,
        version: impl Into<String>,
        constructor: StakeManagerConstructor,
    ) -> Self {
        self.stake_managers.insert(version.into(), constructor);
        self
    }

    pub fn build(self) -> VersionRegistry<M> {
        VersionRegistry { entry_points: self.entry_points, stake_managers: self.stake_managers }
    }
}

/// Immutable mapping from version token to the constructors of that version
///
/// Built once at startup and shared (`Arc`) by every component that needs to talk to an entry
/// point.
pub struct VersionRegistry<M> {
    entry_points: BTreeMap<String, EntryPointConstructor<M>>,
    stake_managers: BTreeMap<String, StakeManagerConstructor>,
}

impl<M: Middleware + 'static> VersionRegistry<M> {
    /// Registry with the v0.6 and v0.7 entry points
    pub fn with_defaults() -> Self {
        VersionRegistryBuilder::new()
            .register_entry_point(VERSION_V0_6, EntryPointV0_6::<M>::boxed)
            .register_entry_point(VERSION_V0_7, EntryPointV0_7::<M>::boxed)
            .register_stake_manager(VERSION_V0_6, StakeManagerV0_6::boxed)
            .register_stake_manager(VERSION_V0_7, StakeManagerV0_7::boxed)
            .build()
    }
}

impl<M> VersionRegistry<M> {
    pub fn builder() -> VersionRegistryBuilder<M> {
        VersionRegistryBuilder::new()
    }

    /// Constructs the entry point of `version` at `address`
    pub fn new_entry_point(
        &self,
        version: &str,
        address: Address,
        eth_client: Arc<M>,
    ) -> Result<Arc<dyn EntryPoint>, EntryPointError> {
        let constructor = self
            .entry_points
            .get(version)
            .ok_or_else(|| EntryPointError::UnsupportedVersion { version: version.into() })?;
        trace!("Constructing entry point {version} at {address:?}");
        constructor(address, eth_client)
    }

    /// Constructs the stake manager of `version`, if registered
    pub fn new_stake_manager(&self, version: &str) -> Option<Arc<dyn StakeManager>> {
        self.stake_managers.get(version).map(|constructor| constructor())
    }

    /// Version tokens with a registered entry point (sorted)
    pub fn versions(&self) -> Vec<&str> {
        self.entry_points.keys().map(String::as_str).collect()
    }
}

impl<M> fmt::Debug for VersionRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionRegistry")
            .field("entry_points", &self.entry_points.keys().collect::<Vec<_>>())
            .field("stake_managers", &self.stake_managers.keys().collect::<Vec<_>>())
            .finish()
    }
}
