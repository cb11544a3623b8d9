//! Tiered-partition reconciliation engine.
//!
//! A [`PartitionState`] splits a set of unique items between one pool and an
//! ordered list of tiers. Drag events are turned into a [`Scenario`] by
//! [`classify`] and applied by the pure functions in [`engine`], which always
//! return a fresh state that satisfies the partition invariants. [`Board`]
//! is the single owner a host keeps between events.

pub mod classify;
pub mod engine;
pub mod error;
pub mod ids;
pub mod partition;
pub mod record;
pub mod reset;
pub mod session;
pub mod templates;

pub use classify::{classify, Scenario};
pub use error::{AddItemError, EngineError, InvariantViolation};
pub use ids::{ClockTierIds, ContainerId, DragId, SequentialTierIds, TierId, TierIdSource};
pub use partition::{Item, PartitionState};
pub use reset::{is_destructive, request_reset, ResetDecision};
pub use session::Board;
pub use templates::Topic;
