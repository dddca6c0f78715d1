use crate::{utils::calculate_valid_gas, validate::SanityCheck, SanityError};
use ethers::types::{U256, U512};
use kestrel_primitives::{constants::mempool::GAS_INCREASE_PERC, UserOperation};
use tracing::{debug, trace};

/// Replace-by-fee rule for user operations of the same sender and nonce
///
/// A user operation replacing a pending one has to raise both the max fee and the max priority
/// fee by at least `gas_increase_perc` percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sender {
    pub gas_increase_perc: u64,
}

impl Default for Sender {
    fn default() -> Self {
        Self { gas_increase_perc: GAS_INCREASE_PERC }
    }
}

/// Threshold as carried by [SanityError]; thresholds above `U256::MAX` are unreachable and
/// reported as `U256::MAX`.
fn reported_threshold(threshold: U512) -> U256 {
    U256::try_from(threshold).unwrap_or(U256::MAX)
}

impl SanityCheck for Sender {
    /// The [check_user_operation] method implementation that performs the check for the sender of
    /// the [UserOperation](UserOperation).
    ///
    /// # Arguments
    /// `uo` - The [UserOperation](UserOperation) to be checked.
    /// `pending` - Pending user operations of the sender.
    ///
    /// # Returns
    /// Nothing if the sanity check is successful, otherwise a [SanityError](SanityError)
    /// is returned.
    fn check_user_operation(
        &self,
        uo: &UserOperation,
        pending: &[UserOperation],
    ) -> Result<(), SanityError> {
        // check if prev user operation exists
        if pending.is_empty() {
            trace!("No pending user operations for {:?}", uo.sender());
            return Ok(());
        }

        let Some(uo_prev) = pending
            .iter()
            .find(|uo_prev| uo_prev.sender() == uo.sender() && uo_prev.nonce() == uo.nonce())
        else {
            trace!("No pending user operation of {:?} with nonce {}", uo.sender(), uo.nonce());
            return Ok(());
        };

        let max_fee_per_gas_expected =
            calculate_valid_gas(uo_prev.max_fee_per_gas(), self.gas_increase_perc);
        let max_priority_fee_per_gas_expected =
            calculate_valid_gas(uo_prev.max_priority_fee_per_gas(), self.gas_increase_perc);

        if U512::from(uo.max_fee_per_gas()) < max_fee_per_gas_expected ||
            U512::from(uo.max_priority_fee_per_gas()) < max_priority_fee_per_gas_expected
        {
            debug!(
                "Replacement of {:?} nonce {} underpriced (gas increase too low)",
                uo.sender(),
                uo.nonce()
            );
            return Err(SanityError::ReplacementUnderpriced {
                sender: uo.sender(),
                nonce: uo.nonce(),
                max_fee_per_gas: uo.max_fee_per_gas(),
                max_fee_per_gas_expected: reported_threshold(max_fee_per_gas_expected),
                max_priority_fee_per_gas: uo.max_priority_fee_per_gas(),
                max_priority_fee_per_gas_expected: reported_threshold(
                    max_priority_fee_per_gas_expected,
                ),
            });
        }

        debug!("User operation of {:?} nonce {} replaces a pending one", uo.sender(), uo.nonce());
        Ok(())
    }
}
