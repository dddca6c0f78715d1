use super::{check_address, version_mismatch, EntryPoint, StakeManager};
use crate::{
    error::EntryPointError,
    gen::v0_7::{self, EntryPointAPI, GetDepositInfoCall, HandleOpsCall, PackedUserOperation},
};
use ethers::{
    abi::{AbiDecode, AbiEncode},
    providers::Middleware,
    types::{Address, Bytes, U256},
};
use kestrel_primitives::{
    constants::entry_point::VERSION_V0_7, DepositInfo, UserOperation, UserOperationHash,
    UserOperationV0_7,
};
use std::sync::Arc;

impl From<UserOperationV0_7> for PackedUserOperation {
    fn from(uo: UserOperationV0_7) -> Self {
        Self {
            sender: uo.sender,
            nonce: uo.nonce,
            init_code: uo.init_code,
            call_data: uo.call_data,
            account_gas_limits: uo.account_gas_limits.to_fixed_bytes(),
            pre_verification_gas: uo.pre_verification_gas,
            gas_fees: uo.gas_fees.to_fixed_bytes(),
            paymaster_and_data: uo.paymaster_and_data,
            signature: uo.signature,
        }
    }
}

impl From<PackedUserOperation> for UserOperationV0_7 {
    fn from(uo: PackedUserOperation) -> Self {
        Self {
            sender: uo.sender,
            nonce: uo.nonce,
            init_code: uo.init_code,
            call_data: uo.call_data,
            account_gas_limits: uo.account_gas_limits.into(),
            pre_verification_gas: uo.pre_verification_gas,
            gas_fees: uo.gas_fees.into(),
            paymaster_and_data: uo.paymaster_and_data,
            signature: uo.signature,
        }
    }
}

impl From<v0_7::DepositInfo> for DepositInfo {
    fn from(info: v0_7::DepositInfo) -> Self {
        Self {
            deposit: info.deposit,
            staked: info.staked,
            stake: info.stake.into(),
            unstake_delay_sec: info.unstake_delay_sec,
            withdraw_time: info.withdraw_time,
        }
    }
}

fn to_binding(uo: &UserOperation) -> Result<PackedUserOperation, EntryPointError> {
    match uo {
        UserOperation::V0_7(uo) => Ok(uo.clone().into()),
        UserOperation::V0_6(_) => Err(version_mismatch(VERSION_V0_7, uo)),
    }
}

/// Entry point v0.7
#[derive(Clone, Debug)]
pub struct EntryPointV0_7<M: Middleware + 'static> {
    address: Address,
    entry_point_api: EntryPointAPI<M>,
}

impl<M: Middleware + 'static> EntryPointV0_7<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        let entry_point_api = EntryPointAPI::new(address, eth_client);
        Self { address, entry_point_api }
    }

    /// Registry constructor
    pub fn boxed(
        address: Address,
        eth_client: Arc<M>,
    ) -> Result<Arc<dyn EntryPoint>, EntryPointError> {
        Ok(Arc::new(Self::new(eth_client, check_address(address)?)))
    }
}

#[async_trait::async_trait]
impl<M: Middleware + 'static> EntryPoint for EntryPointV0_7<M> {
    fn version(&self) -> &'static str {
        VERSION_V0_7
    }

    fn address(&self) -> Address {
        self.address
    }

    async fn get_nonce(&self, sender: &Address, key: U256) -> Result<U256, EntryPointError> {
        self.entry_point_api
            .get_nonce(*sender, key)
            .call()
            .await
            .map_err(EntryPointError::from_contract_error)
    }

    async fn balance_of(&self, addr: &Address) -> Result<U256, EntryPointError> {
        self.entry_point_api
            .balance_of(*addr)
            .call()
            .await
            .map_err(EntryPointError::from_contract_error)
    }

    async fn get_deposit_info(&self, addr: &Address) -> Result<DepositInfo, EntryPointError> {
        self.entry_point_api
            .get_deposit_info(*addr)
            .call()
            .await
            .map(|(deposit, staked, stake, unstake_delay_sec, withdraw_time)| {
                DepositInfo::from(v0_7::DepositInfo {
                    deposit,
                    staked,
                    stake,
                    unstake_delay_sec,
                    withdraw_time,
                })
            })
            .map_err(EntryPointError::from_contract_error)
    }

    async fn get_user_op_hash(
        &self,
        uo: &UserOperation,
    ) -> Result<UserOperationHash, EntryPointError> {
        let uo = to_binding(uo)?;
        self.entry_point_api
            .get_user_op_hash(uo)
            .call()
            .await
            .map(UserOperationHash::from)
            .map_err(EntryPointError::from_contract_error)
    }

    fn handle_ops_calldata(
        &self,
        uos: &[UserOperation],
        beneficiary: Address,
    ) -> Result<Bytes, EntryPointError> {
        let ops = uos.iter().map(to_binding).collect::<Result<Vec<_>, _>>()?;
        Ok(HandleOpsCall { ops, beneficiary }.encode().into())
    }
}

/// Stake manager of entry point v0.7 (`uint256` deposit)
#[derive(Clone, Copy, Debug, Default)]
pub struct StakeManagerV0_7;

impl StakeManagerV0_7 {
    /// Registry constructor
    pub fn boxed() -> Arc<dyn StakeManager> {
        Arc::new(Self)
    }
}

impl StakeManager for StakeManagerV0_7 {
    fn version(&self) -> &'static str {
        VERSION_V0_7
    }

    fn encode_get_deposit_info(&self, addr: Address) -> Bytes {
        GetDepositInfoCall { account: addr }.encode().into()
    }

    fn decode_deposit_info(&self, data: &[u8]) -> Result<DepositInfo, EntryPointError> {
        v0_7::DepositInfo::decode(data)
            .map(DepositInfo::from)
            .map_err(|e| EntryPointError::Decode { inner: e.to_string() })
    }
}
