use rand::Rng;
use shared::{domain::RankingId, protocol::Ranking};
use tracing::debug;

use crate::{
    classify::{classify, Scenario},
    engine,
    error::{AddItemError, EngineError, InvariantViolation},
    ids::{DragId, TierIdSource},
    partition::{Item, PartitionState},
    record,
    reset::{request_reset, ResetDecision},
    templates::Topic,
};

/// The one owner of a ranking being edited. Each call runs a single
/// transition and commits the result whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    topic: Topic,
    state: PartitionState,
    linked: Vec<RankingId>,
}

impl Board {
    /// Fresh board holding `topic`'s default items in template order.
    pub fn from_topic(topic: Topic) -> Self {
        let state = PartitionState::from_pool(topic.items());
        Self {
            topic,
            state,
            linked: Vec::new(),
        }
    }

    /// Reopens a saved ranking for editing, keeping its topic and links.
    pub fn from_saved<S>(record: &Ranking, ids: &mut S) -> Result<Self, InvariantViolation>
    where
        S: TierIdSource + ?Sized,
    {
        Ok(Self {
            topic: topic_of(record),
            state: record::partition_from_saved(record, ids)?,
            linked: record.other_ranking_ids.clone(),
        })
    }

    /// Starts an invitee's board from another party's items. Their tiers and
    /// links are not carried over.
    pub fn seeded_from(record: &Ranking) -> Self {
        Self {
            topic: topic_of(record),
            state: record::partition_from_other(record),
            linked: Vec::new(),
        }
    }

    pub fn to_record(&self) -> Ranking {
        Ranking {
            topic: Some(self.topic.key().to_owned()),
            ranked_tiers: record::ranked_tiers(&self.state),
            unranked_items: record::unranked_items(&self.state),
            other_ranking_ids: self.linked.clone(),
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn state(&self) -> &PartitionState {
        &self.state
    }

    pub fn linked_ids(&self) -> &[RankingId] {
        &self.linked
    }

    pub fn set_linked_ids(&mut self, linked: Vec<RankingId>) {
        self.linked = linked;
    }

    /// Handles the end of a drag. `over` is `None` when nothing was under the
    /// pointer. Returns what the drag was classified as.
    pub fn drag_end<S>(&mut self, active: &DragId, over: Option<&DragId>, ids: &mut S) -> Scenario
    where
        S: TierIdSource + ?Sized,
    {
        let scenario = classify(&self.state, active, over);
        if !scenario.is_inert() {
            self.state = engine::apply(&self.state, &scenario, ids);
        }
        scenario
    }

    pub fn add_item(&mut self, value: &str) -> Result<(), AddItemError> {
        self.state = engine::add_item(&self.state, value)?;
        Ok(())
    }

    pub fn delete_item(&mut self, item: &Item) -> Result<(), EngineError> {
        self.state = engine::delete_item(&self.state, item)?;
        Ok(())
    }

    /// Switches topic through the reset guard. Returns false when the user
    /// declined and nothing changed.
    pub fn change_topic<F, R>(&mut self, new_topic: Topic, confirm: F, rng: &mut R) -> bool
    where
        F: FnOnce() -> bool,
        R: Rng + ?Sized,
    {
        match request_reset(&self.state, &self.topic, &new_topic, confirm, rng) {
            ResetDecision::Proceed(state) => {
                debug!(topic = new_topic.key(), "board switched topic");
                self.state = state;
                self.topic = new_topic;
                true
            }
            ResetDecision::Cancel => false,
        }
    }
}

fn topic_of(record: &Ranking) -> Topic {
    record
        .topic
        .as_deref()
        .map(Topic::new)
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
