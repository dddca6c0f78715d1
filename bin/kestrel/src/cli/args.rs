use crate::utils::{parse_address, read_user_operation};
use clap::Parser;
use ethers::types::Address;
use kestrel_primitives::{constants::entry_point::address_of, UserOperation};
use std::path::PathBuf;

/// User operation input
#[derive(Clone, Debug, Parser, PartialEq)]
pub struct UserOperationArgs {
    /// Path to the JSON encoded user operation (v0.6 or v0.7 layout).
    #[clap(long, short)]
    pub user_operation: PathBuf,
}

impl UserOperationArgs {
    pub fn load(&self) -> eyre::Result<UserOperation> {
        read_user_operation(&self.user_operation)
    }
}

/// Entry point and chain the user operation hash is bound to
#[derive(Clone, Debug, Parser, PartialEq)]
pub struct HashArgs {
    /// Entry point address (defaults to the canonical deployment of the user operation's
    /// version).
    #[clap(long, value_parser=parse_address)]
    pub entry_point: Option<Address>,

    /// Chain ID.
    #[clap(long, default_value = "1")]
    pub chain_id: u64,
}

impl HashArgs {
    /// Entry point address for a user operation of `version`
    pub fn entry_point(&self, version: &str) -> eyre::Result<Address> {
        if let Some(entry_point) = self.entry_point {
            return Ok(entry_point);
        }

        address_of(version)
            .ok_or_else(|| eyre::eyre!("no canonical entry point for version {version}"))?
            .parse::<Address>()
            .map_err(|err| eyre::eyre!("invalid entry point address: {err:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_primitives::constants::entry_point::{ADDRESS_V0_6, VERSION_V0_6, VERSION_V0_7};
    use std::str::FromStr;

    #[test]
    fn user_operation_args() {
        let args = vec!["uoargs", "--user-operation", "~/uo.json"];
        assert_eq!(
            UserOperationArgs { user_operation: PathBuf::from("~/uo.json") },
            UserOperationArgs::try_parse_from(args).unwrap()
        );
        assert!(UserOperationArgs::try_parse_from(vec!["uoargs"]).is_err());
    }

    #[test]
    fn hash_args() {
        let args = vec![
            "hashargs",
            "--entry-point",
            "0x690B9A9E9aa1C9dB991C7721a92d351Db4FaC990",
            "--chain-id",
            "11155111",
        ];
        assert_eq!(
            HashArgs {
                entry_point: Some(
                    Address::from_str("0x690B9A9E9aa1C9dB991C7721a92d351Db4FaC990").unwrap()
                ),
                chain_id: 11_155_111,
            },
            HashArgs::try_parse_from(args).unwrap()
        );
    }

    #[test]
    fn hash_args_defaults() -> eyre::Result<()> {
        let args = HashArgs::try_parse_from(vec!["hashargs"])?;
        assert_eq!(args, HashArgs { entry_point: None, chain_id: 1 });
        assert_eq!(args.entry_point(VERSION_V0_6)?, Address::from_str(ADDRESS_V0_6)?);
        assert_ne!(args.entry_point(VERSION_V0_7)?, Address::from_str(ADDRESS_V0_6)?);
        assert!(args.entry_point("v0.8").is_err());
        Ok(())
    }
}
