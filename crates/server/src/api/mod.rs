use std::sync::Arc;

use board::{Board, SequentialTierIds};
use shared::{
    domain::RankingId,
    error::{ApiError, ErrorCode},
    protocol::{InviteResponse, Ranking},
};
use storage::RankingStore;
use tracing::info;

#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn RankingStore>,
}

pub async fn create_ranking(ctx: &ApiContext, ranking: Ranking) -> Result<RankingId, ApiError> {
    validate_ranking(&ranking)?;
    let id = ctx.store.create(&ranking).await.map_err(internal)?;
    info!(%id, "ranking created");
    Ok(id)
}

pub async fn get_ranking(ctx: &ApiContext, id: RankingId) -> Result<Ranking, ApiError> {
    ctx.store
        .fetch(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found(id))
}

pub async fn update_ranking(
    ctx: &ApiContext,
    id: RankingId,
    ranking: Ranking,
) -> Result<(), ApiError> {
    validate_ranking(&ranking)?;
    let updated = ctx.store.update(id, &ranking).await.map_err(internal)?;
    if !updated {
        return Err(not_found(id));
    }
    Ok(())
}

/// Creates the empty record an invited friend will fill in and points the
/// origin at it, replacing any earlier link. The two writes are separate; a
/// failure between them leaves an unlinked empty record behind.
pub async fn create_invite(ctx: &ApiContext, origin: RankingId) -> Result<InviteResponse, ApiError> {
    let mut origin_ranking = get_ranking(ctx, origin).await?;
    let target = ctx
        .store
        .create(&Ranking::default())
        .await
        .map_err(internal)?;

    origin_ranking.other_ranking_ids = vec![target];
    let updated = ctx
        .store
        .update(origin, &origin_ranking)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(not_found(origin));
    }

    info!(%origin, %target, "invite created");
    Ok(InviteResponse {
        origin_id: origin,
        target_id: target,
    })
}

/// Stores an invitee's finished ranking in the target record prepared by
/// [`create_invite`], linking it back to the origin.
pub async fn submit_invited(
    ctx: &ApiContext,
    target: RankingId,
    origin: RankingId,
    mut ranking: Ranking,
) -> Result<(), ApiError> {
    ranking.other_ranking_ids = vec![origin];
    update_ranking(ctx, target, ranking).await?;
    info!(%origin, %target, "invited ranking submitted");
    Ok(())
}

/// A record is accepted only if it loads into a valid board.
fn validate_ranking(ranking: &Ranking) -> Result<(), ApiError> {
    Board::from_saved(ranking, &mut SequentialTierIds::default())
        .map(|_| ())
        .map_err(|err| ApiError::validation(err.to_string()))
}

fn not_found(id: RankingId) -> ApiError {
    ApiError::not_found(format!("ranking {id} not found"))
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
