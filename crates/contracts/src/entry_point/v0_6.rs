use super::{check_address, version_mismatch, EntryPoint, StakeManager};
use crate::{
    error::EntryPointError,
    gen::v0_6::{self, EntryPointAPI, GetDepositInfoCall, HandleOpsCall},
};
use ethers::{
    abi::{AbiDecode, AbiEncode},
    providers::Middleware,
    types::{Address, Bytes, U256},
};
use kestrel_primitives::{
    constants::entry_point::VERSION_V0_6, DepositInfo, UserOperation, UserOperationHash,
    UserOperationV0_6,
};
use std::sync::Arc;

impl From<UserOperationV0_6> for v0_6::UserOperation {
    fn from(uo: UserOperationV0_6) -> Self {
        Self {
            sender: uo.sender,
            nonce: uo.nonce,
            init_code: uo.init_code,
            call_data: uo.call_data,
            call_gas_limit: uo.call_gas_limit,
            verification_gas_limit: uo.verification_gas_limit,
            pre_verification_gas: uo.pre_verification_gas,
            max_fee_per_gas: uo.max_fee_per_gas,
            max_priority_fee_per_gas: uo.max_priority_fee_per_gas,
            paymaster_and_data: uo.paymaster_and_data,
            signature: uo.signature,
        }
    }
}

impl From<v0_6::DepositInfo> for DepositInfo {
    fn from(info: v0_6::DepositInfo) -> Self {
        Self {
            deposit: info.deposit.into(),
            staked: info.staked,
            stake: info.stake.into(),
            unstake_delay_sec: info.unstake_delay_sec,
            withdraw_time: info.withdraw_time,
        }
    }
}

fn to_binding(uo: &UserOperation) -> Result<v0_6::UserOperation, EntryPointError> {
    match uo {
        UserOperation::V0_6(uo) => Ok(uo.clone().into()),
        UserOperation::V0_7(_) => Err(version_mismatch(VERSION_V0_6, uo)),
    }
}

/// Entry point v0.6
#[derive(Clone, Debug)]
pub struct EntryPointV0_6<M: Middleware + 'static> {
    address: Address,
    entry_point_api: EntryPointAPI<M>,
}

impl<M: Middleware + 'static> EntryPointV0_6<M> {
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
impl<M: Middleware + 'static> EntryPoint for EntryPointV0_6<M> {
    fn version(&self) -> &'static str {
        VERSION_V0_6
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
                DepositInfo::from(v0_6::DepositInfo {
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

/// Stake manager of entry point v0.6 (`uint112` deposit)
#[derive(Clone, Copy, Debug, Default)]
pub struct StakeManagerV0_6;

impl StakeManagerV0_6 {
    /// Registry constructor
    pub fn boxed() -> Arc<dyn StakeManager> {
        Arc::new(Self)
    }
}

impl StakeManager for StakeManagerV0_6 {
    fn version(&self) -> &'static str {
        VERSION_V0_6
    }

    fn encode_get_deposit_info(&self, addr: Address) -> Bytes {
        GetDepositInfoCall { account: addr }.encode().into()
    }

    fn decode_deposit_info(&self, data: &[u8]) -> Result<DepositInfo, EntryPointError> {
        v0_6::DepositInfo::decode(data)
            .map(DepositInfo::from)
            .map_err(|e| EntryPointError::Decode { inner: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::{
        abi::{encode, Token},
        providers::Provider,
    };
    use kestrel_primitives::UserOperationV0_7;
    use std::str::FromStr;

    fn entry_point() -> Address {
        "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse().unwrap()
    }

    fn deposit_info_words() -> Vec<u8> {
        encode(&[
            Token::Uint(1_000_000.into()),
            Token::Bool(true),
            Token::Uint(500.into()),
            Token::Uint(86_400.into()),
            Token::Uint(0.into()),
        ])
    }

    #[tokio::test]
    async fn get_nonce() -> eyre::Result<()> {
        let (provider, mock) = Provider::mocked();
        mock.push::<Bytes, Bytes>(encode(&[Token::Uint(7.into())]).into())?;

        let ep = EntryPointV0_6::new(Arc::new(provider), entry_point());
        assert_eq!(ep.get_nonce(&Address::random(), U256::zero()).await?, 7.into());
        Ok(())
    }

    #[tokio::test]
    async fn get_deposit_info() -> eyre::Result<()> {
        let (provider, mock) = Provider::mocked();
        mock.push::<Bytes, Bytes>(deposit_info_words().into())?;

        let ep = EntryPointV0_6::new(Arc::new(provider), entry_point());
        let info = ep.get_deposit_info(&Address::random()).await?;
        assert_eq!(
            info,
            DepositInfo {
                deposit: 1_000_000.into(),
                staked: true,
                stake: 500.into(),
                unstake_delay_sec: 86_400,
                withdraw_time: 0,
            }
        );
        Ok(())
    }

    #[test]
    fn handle_ops_calldata() -> eyre::Result<()> {
        let (provider, _) = Provider::mocked();
        let ep = EntryPointV0_6::new(Arc::new(provider), entry_point());
        let uo: UserOperation = UserOperationV0_6::default().nonce(1.into()).into();

        let calldata = ep.handle_ops_calldata(&[uo.clone(), uo], Address::zero())?;
        assert_eq!(calldata[..4], [0x1f, 0xad, 0x94, 0x8c]);

        let res = ep.handle_ops_calldata(&[UserOperationV0_7::default().into()], Address::zero());
        assert_eq!(
            res,
            Err(EntryPointError::VersionMismatch { expected: "v0.6".into(), found: "v0.7".into() })
        );
        Ok(())
    }

    #[test]
    fn stake_manager_codec() -> eyre::Result<()> {
        let sm = StakeManagerV0_6;
        let addr = Address::from_str("0x9c5754De1443984659E1b3a8d1931D83475ba29C")?;

        let calldata = sm.encode_get_deposit_info(addr);
        assert_eq!(calldata.len(), 36);
        assert_eq!(calldata[..4], [0x52, 0x87, 0xce, 0x12]);
        assert_eq!(calldata[16..], *addr.as_bytes());

        let info = sm.decode_deposit_info(&deposit_info_words())?;
        assert_eq!(info.deposit, 1_000_000.into());
        assert!(info.staked);
        assert!(matches!(
            sm.decode_deposit_info(&[0u8; 12]),
            Err(EntryPointError::Decode { .. })
        ));
        Ok(())
    }

    #[test]
    fn zero_address_is_rejected() {
        let (provider, _) = Provider::mocked();
        assert!(EntryPointV0_6::boxed(Address::zero(), Arc::new(provider)).is_err());
    }
}
