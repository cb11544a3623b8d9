//! Mapping between [`PartitionState`] and the persisted [`Ranking`] record.

use shared::protocol::Ranking;
use tracing::debug;

use crate::{
    error::InvariantViolation,
    ids::TierIdSource,
    partition::{Item, PartitionState},
};

/// Rebuilds a saved partition, minting one fresh tier id per saved tier in
/// rank order. Saved tiers with no items are skipped.
pub fn partition_from_saved<S>(
    record: &Ranking,
    ids: &mut S,
) -> Result<PartitionState, InvariantViolation>
where
    S: TierIdSource + ?Sized,
{
    let mut tiers = Vec::with_capacity(record.ranked_tiers.len());
    for (rank, saved) in record.ranked_tiers.iter().enumerate() {
        if saved.is_empty() {
            debug!(rank = rank + 1, "skipping empty saved tier");
            continue;
        }
        tiers.push((ids.next_tier_id(), to_items(saved)));
    }
    PartitionState::from_parts(to_items(&record.unranked_items), tiers)
}

/// Pool holding every item of someone else's ranking; their tiers collapse.
pub fn partition_from_other(record: &Ranking) -> PartitionState {
    let ranked = record.ranked_tiers.iter().flatten();
    let all = ranked.chain(&record.unranked_items);
    PartitionState::from_pool(all.map(|value| Item::new(value.as_str())))
}

/// Tier contents in rank order, ids stripped.
pub fn ranked_tiers(state: &PartitionState) -> Vec<Vec<String>> {
    state.tiers().map(|(_, items)| to_strings(items)).collect()
}

pub fn unranked_items(state: &PartitionState) -> Vec<String> {
    to_strings(state.pool())
}

fn to_items(values: &[String]) -> Vec<Item> {
    values.iter().map(|value| Item::new(value.as_str())).collect()
}

fn to_strings(items: &[Item]) -> Vec<String> {
    items.iter().map(|item| item.as_str().to_owned()).collect()
}
