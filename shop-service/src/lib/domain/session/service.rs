use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenKind;
use chrono::Utc;

use crate::domain::account::models::EmailAddress;
use crate::domain::account::ports::AccountRepository;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::IssuedTokens;
use crate::domain::session::ports::RefreshStore;
use crate::domain::session::ports::SessionServicePort;

/// Login, refresh and logout over the account repository and refresh store.
pub struct SessionService<AR, RS>
where
    AR: AccountRepository,
    RS: RefreshStore,
{
    accounts: Arc<AR>,
    refresh_store: Arc<RS>,
    authenticator: Arc<Authenticator>,
}

impl<AR, RS> SessionService<AR, RS>
where
    AR: AccountRepository,
    RS: RefreshStore,
{
    pub fn new(accounts: Arc<AR>, refresh_store: Arc<RS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            accounts,
            refresh_store,
            authenticator,
        }
    }
}

#[async_trait]
impl<AR, RS> SessionServicePort for SessionService<AR, RS>
where
    AR: AccountRepository,
    RS: RefreshStore,
{
    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<IssuedTokens, SessionError> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            tracing::debug!("Login rejected for unknown subject");
            return Err(self.authenticator.reject_unknown(password).into());
        };

        let credentials = self.authenticator.authenticate(
            password,
            &account.password_hash,
            account.email.as_str(),
            &account.role_tags(),
        )?;

        self.refresh_store
            .store(account.email.as_str(), &credentials.refresh_token)
            .await?;
        self.accounts.touch_last_login(&account.id, Utc::now()).await?;

        tracing::info!(account_id = %account.id, role = %account.role, "Login succeeded");

        Ok(IssuedTokens {
            access_token: credentials.access_token,
            refresh_token: credentials.refresh_token,
            subject: account.email.to_string(),
            user_name: account.name.to_string(),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens, SessionError> {
        if !self.refresh_store.validate(refresh_token).await? {
            return Err(SessionError::InvalidRefreshToken);
        }

        let claims = self
            .authenticator
            .codec()
            .verify_current(refresh_token, TokenKind::Refresh)
            .map_err(|e| {
                tracing::debug!(error = %e, "Stored refresh token failed verification");
                SessionError::InvalidRefreshToken
            })?;

        // Roles come from the account as it is now, not from the old credential.
        let email = EmailAddress::new(claims.sub).map_err(|_| SessionError::InvalidRefreshToken)?;
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(SessionError::InvalidRefreshToken)?;

        let access_token = self
            .authenticator
            .codec()
            .issue_access(account.email.as_str(), account.role_tags())?;

        Ok(IssuedTokens {
            access_token,
            refresh_token: refresh_token.to_string(),
            subject: account.email.to_string(),
            user_name: account.name.to_string(),
        })
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), SessionError> {
        self.refresh_store.invalidate(refresh_token).await
    }
}
