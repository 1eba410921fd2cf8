use std::sync::Arc;

use async_trait::async_trait;
use auth::Clock;
use chrono::Duration;
use uuid::Uuid;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::RefreshRecord;
use crate::domain::session::ports::RefreshStore;
use crate::domain::session::ports::RefreshTokenRepository;

/// Refresh store backed by a [`RefreshTokenRepository`].
///
/// Expired records are not swept; they fail `validate` and are removed by
/// logout or left in place.
pub struct RefreshTokenStore<R>
where
    R: RefreshTokenRepository,
{
    repository: Arc<R>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<R> RefreshTokenStore<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(repository: Arc<R>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            ttl,
            clock,
        }
    }
}

#[async_trait]
impl<R> RefreshStore for RefreshTokenStore<R>
where
    R: RefreshTokenRepository,
{
    async fn store(&self, subject: &str, token: &str) -> Result<RefreshRecord, SessionError> {
        let record = RefreshRecord {
            id: Uuid::new_v4(),
            subject: subject.to_string(),
            token: token.to_string(),
            expires_at: self.clock.now() + self.ttl,
        };

        self.repository.insert(record).await
    }

    async fn validate(&self, token: &str) -> Result<bool, SessionError> {
        let now = self.clock.now();

        Ok(self
            .repository
            .find_by_token(token)
            .await?
            .is_some_and(|record| record.is_live_at(now)))
    }

    async fn invalidate(&self, token: &str) -> Result<(), SessionError> {
        let removed = self.repository.delete_by_token(token).await?;
        tracing::debug!(removed, "Refresh token invalidated");
        Ok(())
    }
}
