use crate::config::BootstrapConfig;
use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::PersonName;
use crate::domain::account::models::PhoneNumber;
use crate::domain::account::models::Role;
use crate::domain::account::models::SignUpCommand;
use crate::domain::account::ports::AccountServicePort;

const DEFAULT_ADMIN_NAME: &str = "Administrator";
const DEFAULT_ADMIN_PHONE: &str = "0000000000";

/// Create the configured administrator unless an account with that e-mail
/// already exists.
///
/// Admin sign-up over HTTP needs an admin identity, so the first admin has
/// to come from here.
///
/// # Returns
/// The created account, or `None` when nothing is configured or it exists
pub async fn ensure_admin(
    accounts: &dyn AccountServicePort,
    config: &BootstrapConfig,
) -> Result<Option<Account>, AccountError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(None);
    };

    let command = SignUpCommand {
        role: Role::Admin,
        name: PersonName::new(
            config
                .admin_name
                .clone()
                .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
        )?,
        email: EmailAddress::new(email.clone())?,
        phone: PhoneNumber::new(
            config
                .admin_phone
                .clone()
                .unwrap_or_else(|| DEFAULT_ADMIN_PHONE.to_string()),
        )?,
        password: password.clone(),
    };

    match accounts.sign_up(command).await {
        Ok(account) => Ok(Some(account)),
        Err(AccountError::EmailAlreadyExists(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
