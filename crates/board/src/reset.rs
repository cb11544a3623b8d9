use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{partition::PartitionState, templates::Topic};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetDecision {
    /// Replacement state: no tiers, the new topic's items shuffled in the pool.
    Proceed(PartitionState),
    /// The user kept their work; nothing changes, including the topic.
    Cancel,
}

/// True when switching away from `active_topic` would throw work away: some
/// item is ranked, or the pool no longer matches the topic's item set.
pub fn is_destructive(state: &PartitionState, active_topic: &Topic) -> bool {
    if !state.tier_order().is_empty() {
        return true;
    }
    let baseline = active_topic.items();
    let pool: HashSet<_> = state.pool().iter().collect();
    let template: HashSet<_> = baseline.iter().collect();
    pool != template
}

/// Replaces the partition with `new_topic`'s items, asking `confirm` first
/// when [`is_destructive`] holds. `confirm` is not called otherwise.
pub fn request_reset<F, R>(
    state: &PartitionState,
    active_topic: &Topic,
    new_topic: &Topic,
    confirm: F,
    rng: &mut R,
) -> ResetDecision
where
    F: FnOnce() -> bool,
    R: Rng + ?Sized,
{
    if is_destructive(state, active_topic) && !confirm() {
        debug!(from = active_topic.key(), to = new_topic.key(), "topic reset declined");
        return ResetDecision::Cancel;
    }

    let mut items = new_topic.items();
    items.shuffle(rng);
    debug!(
        from = active_topic.key(),
        to = new_topic.key(),
        items = items.len(),
        "topic reset"
    );
    ResetDecision::Proceed(PartitionState::from_pool(items))
}

#[cfg(test)]
#[path = "tests/reset_tests.rs"]
mod tests;
