use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::SignUpCommand;
use crate::domain::account::models::UpdateProfileCommand;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AccountServicePort;
use crate::domain::guard::CreationGuard;
use crate::domain::session::models::Identity;

/// Domain service implementation for account operations.
pub struct AccountService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    guard: Arc<CreationGuard>,
    password_hasher: auth::PasswordHasher,
}

impl<AR> AccountService<AR>
where
    AR: AccountRepository,
{
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `guard` - Creation guard shared by everything keyed on account e-mail
    pub fn new(repository: Arc<AR>, guard: Arc<CreationGuard>) -> Self {
        Self {
            repository,
            guard,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<AR> AccountServicePort for AccountService<AR>
where
    AR: AccountRepository,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<Account, AccountError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            name: command.name,
            email: command.email,
            phone: command.phone,
            role: command.role,
            password_hash,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };

        let key = Account::natural_key(&account.email);
        let email = account.email.clone();
        let phone = account.phone.clone();

        let created = self
            .guard
            .guarded_create(
                &key,
                || async {
                    if self.repository.exists_by_phone(&phone).await? {
                        return Err(AccountError::PhoneAlreadyExists(phone.to_string()));
                    }
                    self.repository.exists_by_email(&email).await
                },
                || self.repository.create(account),
            )
            .await?;

        tracing::info!(
            account_id = %created.id,
            role = %created.role,
            "Account registered"
        );

        Ok(created)
    }

    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn get_account_by_email(&self, email: &EmailAddress) -> Result<Account, AccountError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or(AccountError::NotFound(email.to_string()))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        self.repository.list_all().await
    }

    async fn update_profile(
        &self,
        id: &AccountId,
        actor: &Identity,
        command: UpdateProfileCommand,
    ) -> Result<Account, AccountError> {
        let mut account = self.get_account(id).await?;

        if account.email.as_str() != actor.subject {
            return Err(AccountError::NotOwner);
        }
        if command.email == account.email {
            return Err(AccountError::SameEmail(command.email.to_string()));
        }
        if command.phone == account.phone {
            return Err(AccountError::SamePhone(command.phone.to_string()));
        }
        if self.repository.exists_by_phone(&command.phone).await? {
            return Err(AccountError::PhoneAlreadyExists(command.phone.to_string()));
        }

        let key = Account::natural_key(&command.email);
        let new_email = command.email.clone();

        account.name = command.name;
        account.email = command.email;
        account.phone = command.phone;
        account.updated_at = Utc::now();

        self.guard
            .guarded_create(
                &key,
                || self.repository.exists_by_email(&new_email),
                || self.repository.update(account),
            )
            .await
    }
}
