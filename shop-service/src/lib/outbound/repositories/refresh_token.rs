use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::RefreshRecord;
use crate::domain::session::ports::RefreshTokenRepository;

/// Refresh records keyed by the exact token string.
pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RefreshTokenRow {
    id: Uuid,
    subject: String,
    token: String,
    expires_at: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshRecord {
    fn from(row: RefreshTokenRow) -> Self {
        Self {
            id: row.id,
            subject: row.subject,
            token: row.token,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn insert(&self, record: RefreshRecord) -> Result<RefreshRecord, SessionError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, subject, token, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.id)
        .bind(&record.subject)
        .bind(&record.token)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(record)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshRecord>, SessionError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            "SELECT id, subject, token, expires_at FROM refresh_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(row.map(RefreshRecord::from))
    }

    async fn delete_by_token(&self, token: &str) -> Result<u64, SessionError> {
        let done = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(done.rows_affected())
    }
}
