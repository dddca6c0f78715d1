//! Entry point related primitives

use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// Deposit and stake of an entity in the entry point (`IStakeManager.DepositInfo`)
///
/// The on-chain struct narrows `deposit` to `uint112` in v0.6 and widens it to `uint256` in v0.7;
/// this is the version independent view of both.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositInfo {
    pub deposit: U256,
    pub staked: bool,
    pub stake: U256,
    pub unstake_delay_sec: u32,
    pub withdraw_time: u64,
}
