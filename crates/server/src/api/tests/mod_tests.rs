use super::*;
use storage::Storage;

async fn setup() -> ApiContext {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    ApiContext {
        store: Arc::new(storage),
    }
}

fn ranking(tiers: &[&[&str]], pool: &[&str]) -> Ranking {
    Ranking {
        topic: Some("pets".into()),
        ranked_tiers: tiers
            .iter()
            .map(|tier| tier.iter().map(|item| item.to_string()).collect())
            .collect(),
        unranked_items: pool.iter().map(|item| item.to_string()).collect(),
        other_ranking_ids: Vec::new(),
    }
}

#[tokio::test]
async fn created_ranking_can_be_fetched() {
    let ctx = setup().await;
    let saved = ranking(&[&["Dog"]], &["Cat"]);
    let id = create_ranking(&ctx, saved.clone()).await.expect("create");
    assert_eq!(get_ranking(&ctx, id).await.expect("get"), saved);
}

#[tokio::test]
async fn duplicate_items_are_rejected() {
    let ctx = setup().await;
    let err = create_ranking(&ctx, ranking(&[&["Dog"]], &["Dog"]))
        .await
        .expect_err("should fail");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn unknown_ranking_is_not_found() {
    let ctx = setup().await;
    let err = get_ranking(&ctx, RankingId::new_v4())
        .await
        .expect_err("should fail");
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = update_ranking(&ctx, RankingId::new_v4(), Ranking::default())
        .await
        .expect_err("should fail");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn invite_links_origin_and_submission_links_back() {
    let ctx = setup().await;
    let origin = create_ranking(&ctx, ranking(&[&["Dog", "Cat"]], &["Fish"]))
        .await
        .expect("origin");

    let invite = create_invite(&ctx, origin).await.expect("invite");
    assert_eq!(invite.origin_id, origin);

    let origin_record = get_ranking(&ctx, origin).await.expect("origin");
    assert_eq!(origin_record.other_ranking_ids, vec![invite.target_id]);
    let pending = get_ranking(&ctx, invite.target_id).await.expect("target");
    assert_eq!(pending, Ranking::default());

    let seeded = Board::seeded_from(&origin_record);
    assert_eq!(seeded.state().item_count(), 3);

    let mut answer = seeded.to_record();
    answer.ranked_tiers = vec![vec!["Fish".into()]];
    answer.unranked_items = vec!["Dog".into(), "Cat".into()];
    submit_invited(&ctx, invite.target_id, origin, answer)
        .await
        .expect("submit");

    let target_record = get_ranking(&ctx, invite.target_id).await.expect("target");
    assert_eq!(target_record.other_ranking_ids, vec![origin]);
    assert_eq!(target_record.ranked_tiers, vec![vec!["Fish".to_string()]]);
}

#[tokio::test]
async fn second_invite_replaces_link() {
    let ctx = setup().await;
    let origin = create_ranking(&ctx, ranking(&[], &["Dog"]))
        .await
        .expect("origin");
    let first = create_invite(&ctx, origin).await.expect("first");
    let second = create_invite(&ctx, origin).await.expect("second");
    assert_ne!(first.target_id, second.target_id);

    let origin_record = get_ranking(&ctx, origin).await.expect("origin");
    assert_eq!(origin_record.other_ranking_ids, vec![second.target_id]);
}

#[tokio::test]
async fn invite_for_missing_origin_is_not_found() {
    let ctx = setup().await;
    let err = create_invite(&ctx, RankingId::new_v4())
        .await
        .expect_err("should fail");
    assert_eq!(err.code, ErrorCode::NotFound);
}
