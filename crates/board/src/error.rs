use thiserror::Error;

use crate::{ids::TierId, partition::Item};

/// Broken partition invariant found while building or checking a state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("partition has no pool")]
    MissingPool,
    #[error("item '{0}' appears more than once")]
    DuplicateItem(Item),
    #[error("{0} is empty")]
    EmptyTier(TierId),
    #[error("{0} holds items but has no rank")]
    UnrankedTier(TierId),
    #[error("{0} is ranked but has no container")]
    UnknownTier(TierId),
    #[error("{0} is ranked more than once")]
    RepeatedTier(TierId),
}

/// Operation refused because applying it would break the partition rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("'{item}' is ranked in {tier}; only pool items can be deleted")]
    RankedItemDelete { item: Item, tier: TierId },
}

/// Declined add-item request. The caller decides how to tell the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddItemError {
    #[error("item text is empty")]
    Empty,
    #[error("'{0}' already exists")]
    Duplicate(Item),
}
