use ethers::types::{Address, U256};
use eyre::WrapErr;
use kestrel_primitives::UserOperation;
use std::{fs, path::Path, str::FromStr};

/// Parses address from string
pub fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|_| format!("String {s} is not a valid address"))
}

/// Parses U256 from string (decimal, or hex with the `0x` prefix)
pub fn parse_u256(s: &str) -> Result<U256, String> {
    match s.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(s, 10),
    }
    .map_err(|_| format!("String {s} is not a valid U256"))
}

/// Reads a user operation (of any supported version) from a JSON file
pub fn read_user_operation(path: &Path) -> eyre::Result<UserOperation> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read user operation from {}", path.display()))?;
    serde_json::from_str(&content)
        .wrap_err_with(|| format!("{} is not a valid user operation", path.display()))
}

/// Reads a JSON array of user operations from a file
pub fn read_user_operations(path: &Path) -> eyre::Result<Vec<UserOperation>> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read user operations from {}", path.display()))?;
    serde_json::from_str(&content)
        .wrap_err_with(|| format!("{} is not a valid list of user operations", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_primitives::constants::entry_point::VERSION_V0_6;
    use tempdir::TempDir;

    const UO_V0_6: &str = r#"{
        "sender": "0x9c5754De1443984659E1b3a8d1931D83475ba29C",
        "nonce": "0x1",
        "initCode": "0x",
        "callData": "0x",
        "callGasLimit": "0x814c",
        "verificationGasLimit": "0xecd0",
        "preVerificationGas": "0xac18",
        "maxFeePerGas": "0x6507a5de",
        "maxPriorityFeePerGas": "0x6507a5c0",
        "paymasterAndData": "0x",
        "signature": "0x"
    }"#;

    #[test]
    fn parse_numbers() {
        assert_eq!(parse_u256("1000"), Ok(U256::from(1000)));
        assert_eq!(parse_u256("0x3e8"), Ok(U256::from(1000)));
        assert!(parse_u256("ten").is_err());
        assert!(parse_address("0x9c5754De1443984659E1b3a8d1931D83475ba29C").is_ok());
        assert!(parse_address("0x9c57").is_err());
    }

    #[test]
    fn read_user_operation_files() -> eyre::Result<()> {
        let dir = TempDir::new("kestrel")?;
        let path = dir.path().join("uo.json");
        fs::write(&path, UO_V0_6)?;

        let uo = read_user_operation(&path)?;
        assert_eq!(uo.version(), VERSION_V0_6);
        assert_eq!(uo.call_gas_limit(), 33_100.into());

        let pending = dir.path().join("pending.json");
        fs::write(&pending, format!("[{UO_V0_6}, {UO_V0_6}]"))?;
        assert_eq!(read_user_operations(&pending)?.len(), 2);

        assert!(read_user_operation(&pending).is_err());
        assert!(read_user_operation(&dir.path().join("missing.json")).is_err());
        Ok(())
    }
}
