use crate::{
    ids::{ContainerId, DragId, TierId},
    partition::{Item, PartitionState},
};

/// What a finished drag means for the partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scenario {
    /// A tier was dropped on the new-tier zone. Tiers cannot spawn tiers.
    Reject,
    ReorderTiers {
        active: TierId,
        over: TierId,
    },
    SpawnTier {
        item: Item,
        source: ContainerId,
    },
    ReorderWithinContainer {
        container: ContainerId,
        active: Item,
        over: Item,
    },
    /// `over` is the item the drop landed on inside `dest`, or `None` when
    /// the drop landed on the container itself.
    MoveBetweenContainers {
        source: ContainerId,
        dest: ContainerId,
        item: Item,
        over: Option<Item>,
    },
    NoOp,
}

impl Scenario {
    /// True when applying the scenario cannot change the state.
    pub fn is_inert(&self) -> bool {
        matches!(self, Self::Reject | Self::NoOp)
    }
}

/// Names the edit a drag from `active` onto `over` asks for.
///
/// `over` is `None` when the drag was cancelled or ended outside every drop
/// target. Ids that do not resolve against `state` classify as
/// [`Scenario::NoOp`].
pub fn classify(state: &PartitionState, active: &DragId, over: Option<&DragId>) -> Scenario {
    let Some(over) = over else {
        return Scenario::NoOp;
    };

    match active {
        DragId::Container(ContainerId::Tier(tier)) => classify_tier_drag(state, *tier, over),
        DragId::Item(item) => classify_item_drag(state, item, over),
        DragId::Container(ContainerId::Pool) | DragId::NewTier => Scenario::NoOp,
    }
}

fn classify_tier_drag(state: &PartitionState, active: TierId, over: &DragId) -> Scenario {
    if matches!(over, DragId::NewTier) {
        return Scenario::Reject;
    }
    if !state.contains_tier(active) {
        return Scenario::NoOp;
    }

    // Hovering an item inside another tier targets that tier.
    match state.resolve(over) {
        Some(ContainerId::Tier(over_tier)) if over_tier != active => Scenario::ReorderTiers {
            active,
            over: over_tier,
        },
        _ => Scenario::NoOp,
    }
}

fn classify_item_drag(state: &PartitionState, item: &Item, over: &DragId) -> Scenario {
    let Some(source) = state.locate(item) else {
        return Scenario::NoOp;
    };

    if matches!(over, DragId::NewTier) {
        return Scenario::SpawnTier {
            item: item.clone(),
            source,
        };
    }

    let Some(dest) = state.resolve(over) else {
        return Scenario::NoOp;
    };
    let over_item = match over {
        DragId::Item(over_item) => Some(over_item),
        _ => None,
    };

    if dest == source {
        return match over_item {
            Some(over_item) if over_item != item => Scenario::ReorderWithinContainer {
                container: source,
                active: item.clone(),
                over: over_item.clone(),
            },
            _ => Scenario::NoOp,
        };
    }

    Scenario::MoveBetweenContainers {
        source,
        dest,
        item: item.clone(),
        over: over_item.cloned(),
    }
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
