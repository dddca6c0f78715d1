use ethers::types::{U256, U512};

/// Minimum gas price a replacement has to offer over `gas_price`
///
/// `gas_price * (100 + gas_incr_perc) / 100`, rounded down. The product is exact, so the
/// threshold of a price close to `U256::MAX` may exceed every `U256` price.
pub fn calculate_valid_gas(gas_price: U256, gas_incr_perc: u64) -> U512 {
    let factor = U512::from(u128::from(gas_incr_perc) + 100);
    U512::from(gas_price) * factor / U512::from(100)
}
