//! Account abstraction (ERC-4337)-related constants

/// Entry point smart contract
pub mod entry_point {
    /// Version token of the v0.6 entry point
    pub const VERSION_V0_6: &str = "v0.6";
    /// Version token of the v0.7 entry point
    pub const VERSION_V0_7: &str = "v0.7";
    /// Address of the v0.6 entry point smart contract
    pub const ADDRESS_V0_6: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";
    /// Address of the v0.7 entry point smart contract
    pub const ADDRESS_V0_7: &str = "0x0000000071727De22E5E9d8BAf0edAc6f37da032";
    /// All supported version tokens
    pub const SUPPORTED_VERSIONS: [&str; 2] = [VERSION_V0_6, VERSION_V0_7];

    /// Canonical deployment address for a version token
    pub fn address_of(version: &str) -> Option<&'static str> {
        match version {
            VERSION_V0_6 => Some(ADDRESS_V0_6),
            VERSION_V0_7 => Some(ADDRESS_V0_7),
            _ => None,
        }
    }
}

/// User operation mempool
pub mod mempool {
    /// Percentage increase of gas price to replace a user operation in the mempool
    pub const GAS_INCREASE_PERC: u64 = 10;
}

/// Gas accounting
pub mod gas {
    /// Verification gas multiplier when a paymaster sponsors the user operation (validation +
    /// paymaster validation + post op)
    pub const PAYMASTER_VERIFICATION_GAS_MULTIPLIER: u64 = 3;
    /// Verification gas multiplier without a paymaster
    pub const VERIFICATION_GAS_MULTIPLIER: u64 = 1;
}
