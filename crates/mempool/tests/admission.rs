use ethers::types::U256;
use kestrel_mempool::{
    validate::sanity::Sender, validate_pending_ops, InvalidMempoolUserOperationError,
    MempoolErrorKind, SanityCheck, SanityError, Validator,
};
use kestrel_primitives::{
    constants::entry_point::ADDRESS_V0_7, UserOperation, UserOperationV0_6, UserOperationV0_7,
};

const PENDING: &str = r#"[
    {
        "sender": "0x9c5754De1443984659E1b3a8d1931D83475ba29C",
        "nonce": "0x0",
        "initCode": "0x",
        "callData": "0x",
        "callGasLimit": "0x5208",
        "verificationGasLimit": "0xc350",
        "preVerificationGas": "0x5208",
        "maxFeePerGas": "0x64",
        "maxPriorityFeePerGas": "0x64",
        "paymasterAndData": "0x",
        "signature": "0x"
    },
    {
        "sender": "0x9c5754De1443984659E1b3a8d1931D83475ba29C",
        "nonce": "0x1",
        "initCode": "0x",
        "callData": "0x",
        "accountGasLimits": "0x0000000000000000000000000000c35000000000000000000000000000005208",
        "preVerificationGas": "0x5208",
        "gasFees": "0x0000000000000000000000000000006400000000000000000000000000000064",
        "paymasterAndData": "0x",
        "signature": "0x"
    }
]"#;

fn pending() -> Vec<UserOperation> {
    serde_json::from_str(PENDING).unwrap()
}

fn candidate(nonce: u64, max_fee_per_gas: u64, max_priority_fee_per_gas: u64) -> UserOperation {
    UserOperationV0_7::default()
        .sender("0x9c5754De1443984659E1b3a8d1931D83475ba29C".parse().unwrap())
        .nonce(nonce.into())
        .gas_limits(50_000.into(), 21_000.into())
        .pre_verification_gas(21_000.into())
        .fees(max_priority_fee_per_gas.into(), max_fee_per_gas.into())
        .into()
}

#[test]
fn pending_snapshot_from_json() {
    let pending = pending();
    assert!(matches!(pending[0], UserOperation::V0_6(_)));
    assert!(matches!(pending[1], UserOperation::V0_7(_)));
    assert_eq!(pending[1].max_fee_per_gas(), 100.into());
    assert_eq!(pending[1].verification_gas_limit(), 50_000.into());
}

#[test]
fn fee_bump_boundary_per_nonce() {
    let pending = pending();
    for nonce in [0, 1] {
        assert!(validate_pending_ops(&candidate(nonce, 110, 110), &pending).is_ok());
        assert!(validate_pending_ops(&candidate(nonce, 109, 110), &pending).is_err());
        assert!(validate_pending_ops(&candidate(nonce, 110, 109), &pending).is_err());
    }
}

#[test]
fn new_nonce_is_always_admitted() {
    assert!(validate_pending_ops(&candidate(2, 0, 0), &pending()).is_ok());
    assert!(validate_pending_ops(&candidate(0, 0, 0), &[]).is_ok());
}

#[test]
fn random_user_operations_without_pending() {
    let check = Sender::default();
    for _ in 0..8 {
        let uo: UserOperation = UserOperationV0_6::random().into();
        assert!(check.check_user_operation(&uo, &[]).is_ok());
        let uo: UserOperation = UserOperationV0_7::random().into();
        assert!(check.check_user_operation(&uo, &[]).is_ok());
    }
}

#[test]
fn rejection_is_reported_with_hash() -> eyre::Result<()> {
    let validator = Validator::standard(ADDRESS_V0_7.parse()?, 11_155_111);
    let uo = candidate(1, 105, 200);

    let err = validator.validate_user_operation(&uo, &pending()).expect_err("underpriced");
    assert_eq!(err.hash, uo.hash(&ADDRESS_V0_7.parse()?, 11_155_111)?);
    match err.kind {
        MempoolErrorKind::InvalidUserOperation(InvalidMempoolUserOperationError::Sanity(
            SanityError::ReplacementUnderpriced {
                max_fee_per_gas_expected, max_priority_fee_per_gas_expected, ..
            },
        )) => {
            assert_eq!(max_fee_per_gas_expected, U256::from(110));
            assert_eq!(max_priority_fee_per_gas_expected, U256::from(110));
        }
        other => panic!("unexpected error {other:?}"),
    }

    let json = serde_json::to_value(&validator.validate_user_operation(&uo, &pending()).err())?;
    assert!(json["kind"]["InvalidUserOperation"]["Sanity"]["ReplacementUnderpriced"].is_object());
    Ok(())
}

#[test]
fn cheaper_replacement_of_max_fee_is_rejected() {
    let existing = UserOperationV0_6::default()
        .sender("0x9c5754De1443984659E1b3a8d1931D83475ba29C".parse().unwrap())
        .max_fee_per_gas(U256::MAX)
        .max_priority_fee_per_gas(100.into());
    let pending: Vec<UserOperation> = vec![existing.clone().into()];

    let replacement: UserOperation = existing.max_fee_per_gas(U256::MAX / 100).into();
    assert!(matches!(
        validate_pending_ops(&replacement, &pending),
        Err(SanityError::ReplacementUnderpriced { .. })
    ));
}
