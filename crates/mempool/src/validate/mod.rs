//! User operation validator module provides the sanity checks a user operation has to pass
//! before it enters the pending set of its sender.
use crate::{
    error::{MempoolError, MempoolErrorKind},
    SanityError,
};
use ethers::types::Address;
use kestrel_primitives::{
    constants::mempool::GAS_INCREASE_PERC, UserOperation, UserOperationHash,
};
use tracing::debug;

pub mod sanity;

/// Check of a user operation against a point-in-time snapshot of the pending user operations of
/// the same sender.
pub trait SanityCheck: Send + Sync {
    /// Returns `Ok(())` if the user operation may be admitted next to `pending`.
    fn check_user_operation(
        &self,
        uo: &UserOperation,
        pending: &[UserOperation],
    ) -> Result<(), SanityError>;
}

impl SanityCheck for () {
    fn check_user_operation(
        &self,
        _uo: &UserOperation,
        _pending: &[UserOperation],
    ) -> Result<(), SanityError> {
        Ok(())
    }
}

macro_rules! sanity_check_impls {
    ( $( $name:ident )+ ) => {
        #[allow(non_snake_case)]
        impl<$($name : SanityCheck,)+> SanityCheck for ($($name,)+)
        {
            fn check_user_operation(
                &self,
                uo: &UserOperation,
                pending: &[UserOperation],
            ) -> Result<(), SanityError>
                {
                    let ($($name,)+) = self;
                    ($($name.check_user_operation(uo, pending)?,)+);
                    Ok(())
                }
        }
    };
}

// Sanity checks chain as tuples: `(Check1, Check2, ...).check_user_operation(uo, pending)` runs
// them in order and stops at the first error.
sanity_check_impls! { A }
sanity_check_impls! { A B }
sanity_check_impls! { A B C }
sanity_check_impls! { A B C D }
sanity_check_impls! { A B C D F }

/// Replace-by-fee admission with the default bump of [GAS_INCREASE_PERC] percent
pub fn validate_pending_ops(
    uo: &UserOperation,
    pending: &[UserOperation],
) -> Result<(), SanityError> {
    sanity::Sender::default().check_user_operation(uo, pending)
}

/// Ordered set of sanity checks bound to an entry point and chain
///
/// The entry point and chain only identify the user operation in the returned errors.
pub struct Validator {
    entry_point: Address,
    chain_id: u64,
    checks: Vec<Box<dyn SanityCheck>>,
}

impl Validator {
    pub fn new(entry_point: Address, chain_id: u64) -> Self {
        Self { entry_point, chain_id, checks: vec![] }
    }

    /// Validator with the replacement check of [GAS_INCREASE_PERC]
    pub fn standard(entry_point: Address, chain_id: u64) -> Self {
        Self::new(entry_point, chain_id)
            .with_check(sanity::Sender { gas_increase_perc: GAS_INCREASE_PERC })
    }

    /// Appends a check (checks run in insertion order)
    pub fn with_check<C: SanityCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Runs every check and returns the hash of the admitted user operation
    pub fn validate_user_operation(
        &self,
        uo: &UserOperation,
        pending: &[UserOperation],
    ) -> Result<UserOperationHash, MempoolError> {
        let hash = uo.hash(&self.entry_point, self.chain_id).map_err(|err| MempoolError {
            hash: UserOperationHash::zero(),
            kind: err.into(),
        })?;

        for check in self.checks.iter() {
            check.check_user_operation(uo, pending).map_err(|err| {
                debug!("User operation {hash} rejected: {err}");
                MempoolError { hash, kind: MempoolErrorKind::from(err) }
            })?;
        }

        debug!("User operation {hash} from {:?} passed {} sanity checks", uo.sender(), self.len());
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InvalidMempoolUserOperationError;
    use ethers::types::U256;
    use kestrel_primitives::{constants::entry_point::ADDRESS_V0_6, UserOperationV0_6};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    struct Counting(Arc<AtomicUsize>);

    impl SanityCheck for Counting {
        fn check_user_operation(
            &self,
            _uo: &UserOperation,
            _pending: &[UserOperation],
        ) -> Result<(), SanityError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn uo(nonce: u64, max_fee_per_gas: u64, max_priority_fee_per_gas: u64) -> UserOperation {
        UserOperationV0_6::default()
            .sender("0x9c5754De1443984659E1b3a8d1931D83475ba29C".parse().unwrap())
            .nonce(nonce.into())
            .max_fee_per_gas(max_fee_per_gas.into())
            .max_priority_fee_per_gas(max_priority_fee_per_gas.into())
            .into()
    }

    #[test]
    fn standard_validator_rejects_underpriced_replacement() -> eyre::Result<()> {
        let entry_point: Address = ADDRESS_V0_6.parse()?;
        let validator = Validator::standard(entry_point, 1);
        assert_eq!(validator.len(), 1);

        let pending = vec![uo(0, 100, 10)];
        let err = validator
            .validate_user_operation(&uo(0, 105, 11), &pending)
            .expect_err("replacement is underpriced");
        assert_eq!(err.hash, uo(0, 105, 11).hash(&entry_point, 1)?);
        assert!(matches!(
            err.kind,
            MempoolErrorKind::InvalidUserOperation(InvalidMempoolUserOperationError::Sanity(
                SanityError::ReplacementUnderpriced { .. }
            ))
        ));

        let hash = validator.validate_user_operation(&uo(0, 110, 11), &pending)?;
        assert_eq!(hash, uo(0, 110, 11).hash(&entry_point, 1)?);
        Ok(())
    }

    #[test]
    fn checks_stop_at_first_error() -> eyre::Result<()> {
        let counter = Arc::new(AtomicUsize::new(0));
        let validator = Validator::new(ADDRESS_V0_6.parse()?, 1)
            .with_check(Counting(counter.clone()))
            .with_check(sanity::Sender::default())
            .with_check(Counting(counter.clone()));

        validator.validate_user_operation(&uo(1, 1, 1), &[uo(0, 100, 10)])?;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        assert!(validator.validate_user_operation(&uo(0, 1, 1), &[uo(0, 100, 10)]).is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[test]
    fn tuple_of_checks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let checks = ((), Counting(counter.clone()), sanity::Sender::default());
        let pending = vec![uo(0, 100, 10)];

        assert!(checks.check_user_operation(&uo(0, 110, 11), &pending).is_ok());
        assert!(checks.check_user_operation(&uo(0, 109, 11), &pending).is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_admission() {
        let pending = vec![uo(3, 100, 100)];
        assert!(validate_pending_ops(&uo(3, 110, 110), &pending).is_ok());
        assert_eq!(
            validate_pending_ops(&uo(3, 110, 109), &pending),
            Err(SanityError::ReplacementUnderpriced {
                sender: "0x9c5754De1443984659E1b3a8d1931D83475ba29C".parse().unwrap(),
                nonce: U256::from(3),
                max_fee_per_gas: 110.into(),
                max_fee_per_gas_expected: 110.into(),
                max_priority_fee_per_gas: 109.into(),
                max_priority_fee_per_gas_expected: 110.into(),
            })
        );
    }
}
