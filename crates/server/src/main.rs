use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use shared::{
    domain::RankingId,
    error::{ApiError, ErrorCode},
    protocol::{
        CreateRankingResponse, InviteResponse, Ranking, SubmitQuery, UpdateRankingResponse,
    },
};
use storage::Storage;
use tracing::{error, info};

mod api;
mod app_state;
mod config;

use api::ApiContext;
use app_state::AppState;
use config::{load_settings, prepare_database_url};

type HttpResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    storage.health_check().await?;

    let state = AppState {
        api: ApiContext {
            store: Arc::new(storage),
        },
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/rankings", post(http_create_ranking))
        .route(
            "/api/rankings/:id",
            get(http_get_ranking).put(http_update_ranking),
        )
        .route("/api/rankings/:id/invite", post(http_create_invite))
        .route("/api/rankings/:id/submit", put(http_submit_invited))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_create_ranking(
    State(state): State<Arc<AppState>>,
    Json(ranking): Json<Ranking>,
) -> HttpResult<(StatusCode, Json<CreateRankingResponse>)> {
    let inserted_id = api::create_ranking(&state.api, ranking)
        .await
        .map_err(reject)?;
    Ok((
        StatusCode::CREATED,
        Json(CreateRankingResponse { inserted_id }),
    ))
}

async fn http_get_ranking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RankingId>,
) -> HttpResult<Json<Ranking>> {
    api::get_ranking(&state.api, id)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_update_ranking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RankingId>,
    Json(ranking): Json<Ranking>,
) -> HttpResult<Json<UpdateRankingResponse>> {
    api::update_ranking(&state.api, id, ranking)
        .await
        .map_err(reject)?;
    Ok(Json(UpdateRankingResponse {
        message: "success".into(),
    }))
}

async fn http_create_invite(
    State(state): State<Arc<AppState>>,
    Path(origin): Path<RankingId>,
) -> HttpResult<(StatusCode, Json<InviteResponse>)> {
    let invite = api::create_invite(&state.api, origin)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(invite)))
}

async fn http_submit_invited(
    State(state): State<Arc<AppState>>,
    Path(target): Path<RankingId>,
    Query(q): Query<SubmitQuery>,
    Json(ranking): Json<Ranking>,
) -> HttpResult<Json<UpdateRankingResponse>> {
    api::submit_invited(&state.api, target, q.origin, ranking)
        .await
        .map_err(reject)?;
    Ok(Json(UpdateRankingResponse {
        message: "success".into(),
    }))
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => {
            error!(message = %err.message, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
