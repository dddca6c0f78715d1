use super::args::{HashArgs, UserOperationArgs};
use crate::utils::{parse_u256, read_user_operations};
use clap::Parser;
use ethers::{
    providers::{Http, Provider},
    types::U256,
};
use kestrel_contracts::VersionRegistry;
use kestrel_mempool::{validate::sanity::Sender, Validator};
use kestrel_primitives::constants::{entry_point::address_of, mempool::GAS_INCREASE_PERC};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// Print the hash of a user operation
#[derive(Debug, Parser)]
pub struct HashCommand {
    #[clap(flatten)]
    uo: UserOperationArgs,

    #[clap(flatten)]
    hash: HashArgs,
}

impl HashCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        let uo = self.uo.load()?;
        let entry_point = self.hash.entry_point(uo.version())?;
        let hash = uo.hash(&entry_point, self.hash.chain_id)?;
        info!(
            "User operation {:?} nonce {} ({}) on entry point {entry_point:?}, chain {}",
            uo.sender(),
            uo.nonce(),
            uo.version(),
            self.hash.chain_id
        );
        println!("{hash}");
        Ok(())
    }
}

/// Print the ABI packed user operation
#[derive(Debug, Parser)]
pub struct PackCommand {
    #[clap(flatten)]
    uo: UserOperationArgs,

    /// Pack without the signature and with the dynamic fields hashed (input of the user
    /// operation hash).
    #[clap(long)]
    for_signature: bool,
}

impl PackCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        let uo = self.uo.load()?;
        let packed = if self.for_signature { uo.pack_for_signature()? } else { uo.pack()? };
        println!("{packed}");
        Ok(())
    }
}

/// Print the gas quantities derived from a user operation
#[derive(Debug, Parser)]
pub struct GasCommand {
    #[clap(flatten)]
    uo: UserOperationArgs,

    /// Base fee per gas of the next block.
    #[clap(long, value_parser=parse_u256)]
    base_fee: Option<U256>,
}

impl GasCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        let uo = self.uo.load()?;
        let gas = json!({
            "maxGasAvailable": uo.max_gas_available(),
            "maxPrefund": uo.max_prefund(),
            "dynamicGasPrice": uo.dynamic_gas_price(self.base_fee),
        });
        println!("{}", serde_json::to_string_pretty(&gas)?);
        Ok(())
    }
}

/// Check whether a user operation may replace the pending user operations of its sender
#[derive(Debug, Parser)]
pub struct CheckReplacementCommand {
    #[clap(flatten)]
    uo: UserOperationArgs,

    /// Path to the JSON array of the sender's pending user operations.
    #[clap(long)]
    pending: PathBuf,

    #[clap(flatten)]
    hash: HashArgs,

    /// Minimum fee increase (in percent) of a replacement.
    #[clap(long, default_value_t = GAS_INCREASE_PERC)]
    gas_increase_perc: u64,
}

impl CheckReplacementCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        let uo = self.uo.load()?;
        let pending = read_user_operations(&self.pending)?;
        let entry_point = self.hash.entry_point(uo.version())?;

        let validator = Validator::new(entry_point, self.hash.chain_id)
            .with_check(Sender { gas_increase_perc: self.gas_increase_perc });
        let hash = validator.validate_user_operation(&uo, &pending)?;

        info!("User operation {hash} admitted next to {} pending user operations", pending.len());
        println!("{hash}");
        Ok(())
    }
}

/// List the supported entry point versions
#[derive(Debug, Parser)]
pub struct VersionsCommand;

impl VersionsCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        let registry = VersionRegistry::<Provider<Http>>::with_defaults();
        for version in registry.versions() {
            let stake_manager = registry.new_stake_manager(version).is_some();
            println!(
                "{version}\t{}\tstake manager: {stake_manager}",
                address_of(version).unwrap_or("-")
            );
        }
        Ok(())
    }
}
