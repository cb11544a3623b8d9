use super::*;
use axum::{body, body::Body, http::Request, response::Response};
use tower::ServiceExt;

async fn test_app() -> Router {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let state = AppState {
        api: ApiContext {
            store: Arc::new(storage),
        },
    };
    build_router(Arc::new(state), 64 * 1024)
}

fn json_request(method: &str, uri: &str, value: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(value.to_string()))
        .expect("request")
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app().await;
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn create_get_and_update_ranking_routes_work() {
    let app = test_app().await;

    let create = json_request(
        "POST",
        "/api/rankings",
        serde_json::json!({
            "topic": "cuisines",
            "rankedTiers": [["Italian", "Thai"], ["French"]],
            "unrankedItems": ["German"],
            "otherBlobIds": [],
        }),
    );
    let response = app.clone().oneshot(create).await.expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: CreateRankingResponse = read_json(response).await;
    let id = created.inserted_id;

    let fetch = Request::get(format!("/api/rankings/{id}"))
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(fetch).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let ranking: Ranking = read_json(response).await;
    assert_eq!(ranking.ranked_tiers.len(), 2);
    assert_eq!(ranking.unranked_items, vec!["German".to_string()]);

    let update = json_request(
        "PUT",
        &format!("/api/rankings/{id}"),
        serde_json::json!({
            "topic": "cuisines",
            "rankedTiers": [["German"]],
            "unrankedItems": ["Italian", "Thai", "French"],
        }),
    );
    let response = app.clone().oneshot(update).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: UpdateRankingResponse = read_json(response).await;
    assert_eq!(updated.message, "success");

    let fetch = Request::get(format!("/api/rankings/{id}"))
        .body(Body::empty())
        .expect("request");
    let ranking: Ranking = read_json(app.oneshot(fetch).await.expect("response")).await;
    assert_eq!(ranking.ranked_tiers, vec![vec!["German".to_string()]]);
}

#[tokio::test]
async fn missing_ranking_is_404_and_bad_record_is_400() {
    let app = test_app().await;

    let fetch = Request::get(format!("/api/rankings/{}", RankingId::new_v4()))
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(fetch).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let err: ApiError = read_json(response).await;
    assert_eq!(err.code, ErrorCode::NotFound);

    let create = json_request(
        "POST",
        "/api/rankings",
        serde_json::json!({ "rankedTiers": [["Dog"]], "unrankedItems": ["Dog"] }),
    );
    let response = app.oneshot(create).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = read_json(response).await;
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn invite_and_submit_routes_link_both_records() {
    let app = test_app().await;

    let create = json_request(
        "POST",
        "/api/rankings",
        serde_json::json!({ "topic": "pets", "rankedTiers": [["Dog"]], "unrankedItems": ["Cat"] }),
    );
    let created: CreateRankingResponse =
        read_json(app.clone().oneshot(create).await.expect("response")).await;
    let origin = created.inserted_id;

    let invite = Request::post(format!("/api/rankings/{origin}/invite"))
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(invite).await.expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let invite: InviteResponse = read_json(response).await;
    let target = invite.target_id;

    let submit = json_request(
        "PUT",
        &format!("/api/rankings/{target}/submit?origin={origin}"),
        serde_json::json!({ "topic": "pets", "rankedTiers": [["Cat"], ["Dog"]] }),
    );
    let response = app.clone().oneshot(submit).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let fetch = Request::get(format!("/api/rankings/{target}"))
        .body(Body::empty())
        .expect("request");
    let target_record: Ranking = read_json(app.clone().oneshot(fetch).await.expect("response")).await;
    assert_eq!(target_record.other_ranking_ids, vec![origin]);

    let fetch = Request::get(format!("/api/rankings/{origin}"))
        .body(Body::empty())
        .expect("request");
    let origin_record: Ranking = read_json(app.oneshot(fetch).await.expect("response")).await;
    assert_eq!(origin_record.other_ranking_ids, vec![target]);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let app = build_router(
        Arc::new(AppState {
            api: ApiContext {
                store: Arc::new(storage),
            },
        }),
        16,
    );
    let create = json_request(
        "POST",
        "/api/rankings",
        serde_json::json!({ "unrankedItems": ["a fairly long item name"] }),
    );
    let response = app.oneshot(create).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
