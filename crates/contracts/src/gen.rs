/// Bindings of the v0.6 entry point (`0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789`)
pub mod v0_6 {
    use ethers::contract::abigen;

    abigen!(
        EntryPointAPI,
        r#"[
            struct UserOperation {address sender;uint256 nonce;bytes initCode;bytes callData;uint256 callGasLimit;uint256 verificationGasLimit;uint256 preVerificationGas;uint256 maxFeePerGas;uint256 maxPriorityFeePerGas;bytes paymasterAndData;bytes signature;}
            struct DepositInfo {uint112 deposit;bool staked;uint112 stake;uint32 unstakeDelaySec;uint48 withdrawTime;}
            function handleOps(UserOperation[] calldata ops,address payable beneficiary) external
            function getDepositInfo(address account) external view returns (DepositInfo memory info)
            function balanceOf(address account) external view returns (uint256)
            function getUserOpHash(UserOperation calldata userOp) external view returns (bytes32)
            function getNonce(address sender, uint192 key) external view returns (uint256 nonce)
            error FailedOp(uint256 opIndex, string reason)
        ]"#
    );
}

/// Bindings of the v0.7 entry point (`0x0000000071727De22E5E9d8BAf0edAc6f37da032`)
pub mod v0_7 {
    use ethers::contract::abigen;

    abigen!(
        EntryPointAPI,
        r#"[
            struct PackedUserOperation {address sender;uint256 nonce;bytes initCode;bytes callData;bytes32 accountGasLimits;uint256 preVerificationGas;bytes32 gasFees;bytes paymasterAndData;bytes signature;}
            struct DepositInfo {uint256 deposit;bool staked;uint112 stake;uint32 unstakeDelaySec;uint48 withdrawTime;}
            function handleOps(PackedUserOperation[] calldata ops,address payable beneficiary) external
            function getDepositInfo(address account) external view returns (DepositInfo memory info)
            function balanceOf(address account) external view returns (uint256)
            function getUserOpHash(PackedUserOperation calldata userOp) external view returns (bytes32)
            function getNonce(address sender, uint192 key) external view returns (uint256 nonce)
            error FailedOp(uint256 opIndex, string reason)
            error FailedOpWithRevert(uint256 opIndex, string reason, bytes inner)
        ]"#
    );
}
