//! Sender recovery implementations.

use alloy::{consensus::transaction::SignerRecoverable, primitives::Address};

use crate::{models::EVMTransaction, services::signer::RecoveryError};

/// Resolves the address that signed a transaction
///
/// `chain_id` is the chain being scanned and `base_fee_per_gas` the base fee of the
/// enclosing block, for signing schemes that depend on either.
pub trait SenderRecovery: Send + Sync + 'static {
	fn recover_sender(
		&self,
		transaction: &EVMTransaction,
		chain_id: u64,
		base_fee_per_gas: Option<u64>,
	) -> Result<Address, RecoveryError>;
}

/// ECDSA recovery over the transaction's signing hash.
///
/// Transactions carrying a chain id must carry the scanned chain's id; legacy
/// transactions without one are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureRecovery;

impl SenderRecovery for SignatureRecovery {
	fn recover_sender(
		&self,
		transaction: &EVMTransaction,
		chain_id: u64,
		_base_fee_per_gas: Option<u64>,
	) -> Result<Address, RecoveryError> {
		if let Some(actual) = transaction.chain_id() {
			if actual != chain_id {
				return Err(RecoveryError::ChainIdMismatch {
					expected: chain_id,
					actual,
				});
			}
		}

		transaction
			.0
			.recover_signer()
			.map_err(|e| RecoveryError::InvalidSignature(e.to_string()))
	}
}
