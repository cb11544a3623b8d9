use serde::{Deserialize, Serialize};

use crate::domain::RankingId;

/// Persisted form of a ranking. Outer order of `ranked_tiers` is rank (most
/// valued first), inner order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub ranked_tiers: Vec<Vec<String>>,
    #[serde(default)]
    pub unranked_items: Vec<String>,
    #[serde(default, alias = "otherBlobIds")]
    pub other_ranking_ids: Vec<RankingId>,
}

impl Ranking {
    pub fn has_ranked_items(&self) -> bool {
        !self.ranked_tiers.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRankingResponse {
    pub inserted_id: RankingId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRankingResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    pub origin_id: RankingId,
    pub target_id: RankingId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitQuery {
    pub origin: RankingId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_a_valid_pending_record() {
        let ranking: Ranking = serde_json::from_str("{}").expect("json");
        assert_eq!(ranking, Ranking::default());
        assert!(!ranking.has_ranked_items());
    }

    #[test]
    fn accepts_legacy_linked_id_field() {
        let id = RankingId::new_v4();
        let raw = serde_json::json!({
            "topic": "pets",
            "rankedTiers": [["Dog"], ["Cat"]],
            "unrankedItems": ["Fish"],
            "otherBlobIds": [id],
        });
        let ranking: Ranking = serde_json::from_value(raw).expect("json");
        assert_eq!(ranking.other_ranking_ids, vec![id]);
        assert_eq!(ranking.ranked_tiers.len(), 2);

        let encoded = serde_json::to_value(&ranking).expect("encode");
        assert!(encoded.get("otherRankingIds").is_some());
        assert!(encoded.get("otherBlobIds").is_none());
    }
}
