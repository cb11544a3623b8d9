//! Pure transitions over [`PartitionState`].
//!
//! Every function borrows the current state and returns the next one; the
//! input is never touched. Intents naming ids the state does not know are
//! answered with an unchanged copy.

use tracing::{debug, warn};

use crate::{
    classify::Scenario,
    error::{AddItemError, EngineError},
    ids::{ContainerId, TierId, TierIdSource},
    partition::{Item, PartitionState},
};

/// Applies a classified drag outcome.
pub fn apply<S>(state: &PartitionState, scenario: &Scenario, ids: &mut S) -> PartitionState
where
    S: TierIdSource + ?Sized,
{
    match scenario {
        Scenario::ReorderTiers { active, over } => reorder_tiers(state, *active, *over),
        Scenario::SpawnTier { item, source } => spawn_tier(state, item, *source, ids),
        Scenario::ReorderWithinContainer {
            container,
            active,
            over,
        } => reorder_within(state, *container, active, over),
        Scenario::MoveBetweenContainers {
            source,
            dest,
            item,
            over,
        } => move_between(state, *source, *dest, item, over.as_ref()),
        Scenario::Reject | Scenario::NoOp => {
            debug!(?scenario, "drag left partition unchanged");
            state.clone()
        }
    }
}

/// Moves `active` to the rank `over` held; tiers in between shift by one.
pub fn reorder_tiers(state: &PartitionState, active: TierId, over: TierId) -> PartitionState {
    let mut next = state.clone();
    let from = next.tier_order.iter().position(|id| *id == active);
    let to = next.tier_order.iter().position(|id| *id == over);
    if let (Some(from), Some(to)) = (from, to) {
        array_move(&mut next.tier_order, from, to);
        debug!(%active, %over, from, to, "reordered tiers");
    }
    next
}

/// Moves `active` to the slot `over` held inside `container`.
pub fn reorder_within(
    state: &PartitionState,
    container: ContainerId,
    active: &Item,
    over: &Item,
) -> PartitionState {
    let mut next = state.clone();
    let Some(items) = next.items_mut(container) else {
        return next;
    };
    let from = items.iter().position(|item| item == active);
    let to = items.iter().position(|item| item == over);
    if let (Some(from), Some(to)) = (from, to) {
        array_move(items, from, to);
        debug!(%container, item = %active, from, to, "reordered within container");
    }
    next
}

/// Takes `item` out of `source` and puts it in `dest`, at `over`'s slot when
/// `over` is in `dest`, otherwise at the end. An emptied source tier is
/// dropped.
pub fn move_between(
    state: &PartitionState,
    source: ContainerId,
    dest: ContainerId,
    item: &Item,
    over: Option<&Item>,
) -> PartitionState {
    if source == dest {
        return match over {
            Some(over) => reorder_within(state, source, item, over),
            None => state.clone(),
        };
    }
    let source_holds_item = state
        .container(source)
        .is_some_and(|items| items.contains(item));
    if !source_holds_item || state.container(dest).is_none() {
        debug!(%source, %dest, %item, "move names unknown container or item");
        return state.clone();
    }

    let mut next = state.clone();
    if let Some(items) = next.items_mut(source) {
        items.retain(|candidate| candidate != item);
    }
    if let Some(items) = next.items_mut(dest) {
        let index = over
            .and_then(|over| items.iter().position(|candidate| candidate == over))
            .unwrap_or(items.len());
        items.insert(index, item.clone());
        debug!(%source, %dest, %item, index, "moved item between containers");
    }
    next.remove_if_empty_tier(source);
    next
}

/// Moves `item` into a brand-new tier ranked last.
pub fn spawn_tier<S>(
    state: &PartitionState,
    item: &Item,
    source: ContainerId,
    ids: &mut S,
) -> PartitionState
where
    S: TierIdSource + ?Sized,
{
    let source_holds_item = state
        .container(source)
        .is_some_and(|items| items.contains(item));
    if !source_holds_item {
        debug!(%source, %item, "spawn names unknown container or item");
        return state.clone();
    }

    let tier = fresh_tier_id(state, ids);
    let mut next = state.clone();
    if let Some(items) = next.items_mut(source) {
        items.retain(|candidate| candidate != item);
    }
    next.containers
        .insert(ContainerId::Tier(tier), vec![item.clone()]);
    next.tier_order.push(tier);
    next.remove_if_empty_tier(source);
    debug!(%source, %item, %tier, "spawned tier");
    next
}

/// Appends a new item to the pool. Surrounding whitespace is trimmed; empty
/// text and text already present anywhere are declined.
pub fn add_item(state: &PartitionState, value: &str) -> Result<PartitionState, AddItemError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AddItemError::Empty);
    }
    let item = Item::new(trimmed);
    if state.contains_item(&item) {
        debug!(%item, "declined duplicate item");
        return Err(AddItemError::Duplicate(item));
    }

    let mut next = state.clone();
    if let Some(pool) = next.items_mut(ContainerId::Pool) {
        pool.push(item);
    }
    Ok(next)
}

/// Removes an unranked item. Ranked items are refused; unknown items leave
/// the state as it is.
pub fn delete_item(state: &PartitionState, item: &Item) -> Result<PartitionState, EngineError> {
    match state.locate(item) {
        None => {
            debug!(%item, "delete names unknown item");
            Ok(state.clone())
        }
        Some(ContainerId::Tier(tier)) => {
            warn!(%item, %tier, "refused to delete ranked item");
            Err(EngineError::RankedItemDelete {
                item: item.clone(),
                tier,
            })
        }
        Some(ContainerId::Pool) => {
            let mut next = state.clone();
            if let Some(pool) = next.items_mut(ContainerId::Pool) {
                pool.retain(|candidate| candidate != item);
            }
            Ok(next)
        }
    }
}

fn fresh_tier_id<S>(state: &PartitionState, ids: &mut S) -> TierId
where
    S: TierIdSource + ?Sized,
{
    // A source that never repeats finds a free id within this many draws.
    for _ in 0..=state.tier_order().len() {
        let candidate = ids.next_tier_id();
        if !state.contains_tier(candidate) {
            return candidate;
        }
    }
    smallest_free_tier_id(state)
}

fn smallest_free_tier_id(state: &PartitionState) -> TierId {
    let mut taken: Vec<u64> = state.tier_order().iter().map(|id| id.get()).collect();
    taken.sort_unstable();
    let mut free = 0;
    for raw in taken {
        if raw > free {
            break;
        }
        if raw == free {
            free += 1;
        }
    }
    TierId::from_raw(free)
}

fn array_move<T>(list: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let moved = list.remove(from);
    list.insert(to, moved);
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
