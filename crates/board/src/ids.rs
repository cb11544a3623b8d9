use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::partition::Item;

/// Opaque token naming one tier for as long as it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TierId(u64);

impl TierId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerId {
    Pool,
    Tier(TierId),
}

impl ContainerId {
    pub fn tier(self) -> Option<TierId> {
        match self {
            Self::Pool => None,
            Self::Tier(id) => Some(id),
        }
    }
}

impl From<TierId> for ContainerId {
    fn from(value: TierId) -> Self {
        Self::Tier(value)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool => f.write_str("pool"),
            Self::Tier(id) => id.fmt(f),
        }
    }
}

/// Anything a drag can start on or end over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DragId {
    Item(Item),
    Container(ContainerId),
    /// The drop zone that turns the dragged item into a new lowest tier.
    NewTier,
}

impl DragId {
    pub fn item(value: impl Into<String>) -> Self {
        Self::Item(Item::new(value))
    }

    pub fn tier(id: TierId) -> Self {
        Self::Container(ContainerId::Tier(id))
    }

    pub fn pool() -> Self {
        Self::Container(ContainerId::Pool)
    }
}

/// Source of fresh tier identifiers. Implementations should not hand out the
/// same token twice; the engine still copes with one that does (an exhausted
/// counter, for instance) by falling back to the smallest unused id.
pub trait TierIdSource {
    fn next_tier_id(&mut self) -> TierId;
}

impl<T: TierIdSource + ?Sized> TierIdSource for &mut T {
    fn next_tier_id(&mut self) -> TierId {
        (**self).next_tier_id()
    }
}

/// Counter-backed ids, deterministic for tests and replays. Stops advancing
/// at `u64::MAX`.
#[derive(Debug, Clone)]
pub struct SequentialTierIds {
    next: u64,
}

impl SequentialTierIds {
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialTierIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl TierIdSource for SequentialTierIds {
    fn next_tier_id(&mut self) -> TierId {
        let id = TierId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Wall-clock nanoseconds, bumped so consecutive ids strictly increase even
/// when the clock stalls or steps backwards.
#[derive(Debug, Clone, Default)]
pub struct ClockTierIds {
    last: u64,
}

impl TierIdSource for ClockTierIds {
    fn next_tier_id(&mut self) -> TierId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        self.last = now.max(self.last.saturating_add(1));
        TierId(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialTierIds::starting_at(7);
        assert_eq!(ids.next_tier_id(), TierId::from_raw(7));
        assert_eq!(ids.next_tier_id(), TierId::from_raw(8));
    }

    #[test]
    fn clock_ids_strictly_increase() {
        let mut ids = ClockTierIds::default();
        let mut previous = ids.next_tier_id();
        for _ in 0..1_000 {
            let next = ids.next_tier_id();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn pool_sorts_before_tiers() {
        assert!(ContainerId::Pool < ContainerId::Tier(TierId::from_raw(0)));
    }
}
