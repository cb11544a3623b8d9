use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

use shared::{domain::RankingId, protocol::Ranking};

/// Keyed ranking records. Records are independent: updating one never
/// touches another, even when they link to each other.
#[async_trait]
pub trait RankingStore: Send + Sync {
    async fn create(&self, ranking: &Ranking) -> Result<RankingId>;
    async fn fetch(&self, id: RankingId) -> Result<Option<Ranking>>;
    /// Returns false when no record has `id`.
    async fn update(&self, id: RankingId, ranking: &Ranking) -> Result<bool>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct StoredRanking {
    pub id: RankingId,
    pub ranking: Ranking,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_ranking(&self, ranking: &Ranking) -> Result<RankingId> {
        let id = RankingId::new_v4();
        let body = serde_json::to_string(ranking).context("failed to encode ranking")?;
        sqlx::query("INSERT INTO rankings (id, body) VALUES (?, ?)")
            .bind(id.to_string())
            .bind(body)
            .execute(&self.pool)
            .await
            .context("failed to insert ranking")?;
        debug!(%id, "created ranking");
        Ok(id)
    }

    pub async fn load_ranking(&self, id: RankingId) -> Result<Option<StoredRanking>> {
        let row = sqlx::query(
            "SELECT id, body, created_at, updated_at FROM rankings WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| -> Result<StoredRanking> {
            let raw_id = r.get::<String, _>(0);
            let body = r.get::<String, _>(1);
            Ok(StoredRanking {
                id: RankingId::from_str(&raw_id)
                    .with_context(|| format!("stored ranking id '{raw_id}' is not a uuid"))?,
                ranking: serde_json::from_str(&body)
                    .with_context(|| format!("stored ranking {raw_id} is not valid json"))?,
                created_at: r.get::<DateTime<Utc>, _>(2),
                updated_at: r.get::<DateTime<Utc>, _>(3),
            })
        })
        .transpose()
    }

    pub async fn update_ranking(&self, id: RankingId, ranking: &Ranking) -> Result<bool> {
        let body = serde_json::to_string(ranking).context("failed to encode ranking")?;
        let result = sqlx::query(
            "UPDATE rankings SET body = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(body)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .context("failed to update ranking")?;
        let updated = result.rows_affected() > 0;
        debug!(%id, updated, "updated ranking");
        Ok(updated)
    }

    pub async fn list_ranking_ids(&self) -> Result<Vec<RankingId>> {
        let rows = sqlx::query("SELECT id FROM rankings ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|r| {
                let raw_id = r.get::<String, _>(0);
                RankingId::from_str(&raw_id)
                    .with_context(|| format!("stored ranking id '{raw_id}' is not a uuid"))
            })
            .collect()
    }
}

#[async_trait]
impl RankingStore for Storage {
    async fn create(&self, ranking: &Ranking) -> Result<RankingId> {
        self.create_ranking(ranking).await
    }

    async fn fetch(&self, id: RankingId) -> Result<Option<Ranking>> {
        Ok(self.load_ranking(id).await?.map(|stored| stored.ranking))
    }

    async fn update(&self, id: RankingId, ranking: &Ranking) -> Result<bool> {
        self.update_ranking(id, ranking).await
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
