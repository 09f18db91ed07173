//! Transaction enrichment and block filtering.

use tracing::debug;

use crate::{
	models::{EVMBlock, EVMEnrichedTransaction, EVMTransaction},
	services::{
		filter::FilterSet,
		scanner::ScanStats,
		signer::{RecoveryError, SenderRecovery},
	},
};

/// Pairs a transaction with its recovered sender
pub fn enrich_transaction<R>(
	recovery: &R,
	transaction: EVMTransaction,
	chain_id: u64,
	base_fee_per_gas: Option<u64>,
) -> Result<EVMEnrichedTransaction, RecoveryError>
where
	R: SenderRecovery + ?Sized,
{
	let sender = recovery.recover_sender(&transaction, chain_id, base_fee_per_gas)?;
	Ok(EVMEnrichedTransaction::new(
		transaction,
		sender,
		base_fee_per_gas,
	))
}

/// Enriches every transaction of a block and keeps those accepted by `filters`
///
/// Transactions whose sender cannot be recovered are dropped without affecting
/// the others. The result preserves the block's transaction order.
pub fn filter_block<R>(
	recovery: &R,
	block: EVMBlock,
	chain_id: u64,
	filters: &FilterSet,
	stats: &ScanStats,
) -> Vec<EVMEnrichedTransaction>
where
	R: SenderRecovery + ?Sized,
{
	let base_fee = block.base_fee_per_gas;
	let number = block.number;

	block
		.transactions
		.into_iter()
		.filter_map(|transaction| {
			let hash = transaction.hash();
			match enrich_transaction(recovery, transaction, chain_id, base_fee) {
				Ok(enriched) => {
					stats.record_recovered();
					Some(enriched)
				}
				Err(e) => {
					stats.record_recovery_failure();
					debug!(block = number, tx = %hash, "Dropping transaction: {}", e);
					None
				}
			}
		})
		.filter(|enriched| filters.evaluate(enriched))
		.collect()
}
