use std::{
    collections::{BTreeMap, HashSet},
    fmt,
};

use crate::{
    error::InvariantViolation,
    ids::{ContainerId, DragId, TierId},
};

/// A rankable value. Compared by its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Item(String);

impl Item {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Item {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Item {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Items split between the pool and the ranked tiers.
///
/// Every value handed out by this crate satisfies:
/// - each item sits in exactly one container, once;
/// - `tier_order` lists exactly the tiers in `containers`, each once;
/// - no tier container is empty (the pool may be).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionState {
    pub(crate) containers: BTreeMap<ContainerId, Vec<Item>>,
    pub(crate) tier_order: Vec<TierId>,
}

impl Default for PartitionState {
    fn default() -> Self {
        Self::from_pool(Vec::new())
    }
}

impl PartitionState {
    /// Pool-only state. Repeated items keep their first position.
    pub fn from_pool(items: impl IntoIterator<Item = Item>) -> Self {
        let mut seen = HashSet::new();
        let pool: Vec<Item> = items
            .into_iter()
            .filter(|item| seen.insert(item.clone()))
            .collect();
        let mut containers = BTreeMap::new();
        containers.insert(ContainerId::Pool, pool);
        Self {
            containers,
            tier_order: Vec::new(),
        }
    }

    /// Builds a state from ranked tiers (most valued first) and a pool,
    /// rejecting anything that breaks the invariants.
    pub fn from_parts(
        pool: Vec<Item>,
        tiers: Vec<(TierId, Vec<Item>)>,
    ) -> Result<Self, InvariantViolation> {
        let mut containers = BTreeMap::new();
        containers.insert(ContainerId::Pool, pool);
        let mut tier_order = Vec::with_capacity(tiers.len());
        for (id, items) in tiers {
            if containers.insert(ContainerId::Tier(id), items).is_some() {
                return Err(InvariantViolation::RepeatedTier(id));
            }
            tier_order.push(id);
        }
        let state = Self {
            containers,
            tier_order,
        };
        state.validate()?;
        Ok(state)
    }

    pub fn pool(&self) -> &[Item] {
        self.containers
            .get(&ContainerId::Pool)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn container(&self, id: ContainerId) -> Option<&[Item]> {
        self.containers.get(&id).map(Vec::as_slice)
    }

    pub fn tier_order(&self) -> &[TierId] {
        &self.tier_order
    }

    /// Tiers in rank order, most valued first.
    pub fn tiers(&self) -> impl Iterator<Item = (TierId, &[Item])> + '_ {
        self.tier_order.iter().filter_map(|id| {
            self.containers
                .get(&ContainerId::Tier(*id))
                .map(|items| (*id, items.as_slice()))
        })
    }

    /// 1-based rank of a tier.
    pub fn rank_of(&self, tier: TierId) -> Option<usize> {
        self.tier_order
            .iter()
            .position(|id| *id == tier)
            .map(|index| index + 1)
    }

    pub fn contains_tier(&self, tier: TierId) -> bool {
        self.containers.contains_key(&ContainerId::Tier(tier))
    }

    pub fn contains_item(&self, item: &Item) -> bool {
        self.locate(item).is_some()
    }

    pub fn item_count(&self) -> usize {
        self.containers.values().map(Vec::len).sum()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.containers.values().flatten()
    }

    /// Container currently listing `item`.
    pub fn locate(&self, item: &Item) -> Option<ContainerId> {
        self.containers
            .iter()
            .find(|(_, items)| items.contains(item))
            .map(|(id, _)| *id)
    }

    /// A container id denotes itself, an item denotes the container listing
    /// it. Unknown ids and the new-tier zone resolve to nothing.
    pub fn resolve(&self, id: &DragId) -> Option<ContainerId> {
        match id {
            DragId::Container(container) => self
                .containers
                .contains_key(container)
                .then_some(*container),
            DragId::Item(item) => self.locate(item),
            DragId::NewTier => None,
        }
    }

    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if !self.containers.contains_key(&ContainerId::Pool) {
            return Err(InvariantViolation::MissingPool);
        }

        let mut seen = HashSet::new();
        for item in self.items() {
            if !seen.insert(item) {
                return Err(InvariantViolation::DuplicateItem(item.clone()));
            }
        }

        let mut ranked = HashSet::new();
        for id in &self.tier_order {
            if !ranked.insert(*id) {
                return Err(InvariantViolation::RepeatedTier(*id));
            }
            match self.containers.get(&ContainerId::Tier(*id)) {
                None => return Err(InvariantViolation::UnknownTier(*id)),
                Some(items) if items.is_empty() => {
                    return Err(InvariantViolation::EmptyTier(*id))
                }
                Some(_) => {}
            }
        }

        if let Some(id) = self
            .containers
            .keys()
            .filter_map(|container| container.tier())
            .find(|id| !ranked.contains(id))
        {
            return Err(InvariantViolation::UnrankedTier(id));
        }

        Ok(())
    }

    pub(crate) fn items_mut(&mut self, id: ContainerId) -> Option<&mut Vec<Item>> {
        self.containers.get_mut(&id)
    }

    /// Drops `id` if it is a tier left with no items. The pool is kept even
    /// when empty.
    pub(crate) fn remove_if_empty_tier(&mut self, id: ContainerId) {
        let ContainerId::Tier(tier) = id else {
            return;
        };
        if self.containers.get(&id).is_some_and(Vec::is_empty) {
            self.containers.remove(&id);
            self.tier_order.retain(|ranked| *ranked != tier);
        }
    }
}

#[cfg(test)]
#[path = "tests/partition_tests.rs"]
mod tests;
