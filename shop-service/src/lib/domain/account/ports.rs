use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::PhoneNumber;
use crate::domain::account::models::SignUpCommand;
use crate::domain::account::models::UpdateProfileCommand;
use crate::domain::session::models::Identity;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// The existence check and insert run under the creation guard for
    /// the e-mail key.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - E-mail is already registered
    /// * `PhoneAlreadyExists` - Phone number is already registered
    /// * `Password` - Password empty or hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<Account, AccountError>;

    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError>;

    /// # Errors
    /// * `NotFound` - No account with this e-mail
    /// * `DatabaseError` - Database operation failed
    async fn get_account_by_email(&self, email: &EmailAddress) -> Result<Account, AccountError>;

    /// All accounts, oldest first.
    async fn list_accounts(&self) -> Result<Vec<Account>, AccountError>;

    /// Replace name, e-mail and phone of the caller's own account.
    ///
    /// # Arguments
    /// * `id` - Account to update
    /// * `actor` - Identity established for the request
    /// * `command` - New contact details
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `NotOwner` - `actor` is not the account's subject
    /// * `SameEmail` / `SamePhone` - Value unchanged
    /// * `EmailAlreadyExists` / `PhoneAlreadyExists` - Value taken by another account
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(
        &self,
        id: &AccountId,
        actor: &Identity,
        command: UpdateProfileCommand,
    ) -> Result<Account, AccountError>;
}

/// Persistence operations for account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// # Errors
    /// * `EmailAlreadyExists` - Unique e-mail constraint violated
    /// * `PhoneAlreadyExists` - Unique phone constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AccountError>;

    async fn exists_by_phone(&self, phone: &PhoneNumber) -> Result<bool, AccountError>;

    async fn list_all(&self) -> Result<Vec<Account>, AccountError>;

    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `EmailAlreadyExists` / `PhoneAlreadyExists` - Unique constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, account: Account) -> Result<Account, AccountError>;

    /// Record a successful login. Unknown ids are ignored.
    async fn touch_last_login(
        &self,
        id: &AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), AccountError>;
}
