#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::CredentialCodec;
use auth::ManualClock;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use shop_service::bootstrap::ensure_admin;
use shop_service::config::BootstrapConfig;
use shop_service::domain::account::errors::AccountError;
use shop_service::domain::account::models::Account;
use shop_service::domain::account::models::AccountId;
use shop_service::domain::account::models::EmailAddress;
use shop_service::domain::account::models::PhoneNumber;
use shop_service::domain::account::ports::AccountRepository;
use shop_service::domain::account::service::AccountService;
use shop_service::domain::category::errors::CategoryError;
use shop_service::domain::category::models::Category;
use shop_service::domain::category::models::CategoryId;
use shop_service::domain::category::models::CategoryName;
use shop_service::domain::category::ports::CategoryRepository;
use shop_service::domain::category::service::CategoryService;
use shop_service::domain::guard::CreationGuard;
use shop_service::domain::session::errors::SessionError;
use shop_service::domain::session::models::RefreshRecord;
use shop_service::domain::session::ports::RefreshTokenRepository;
use shop_service::domain::session::service::SessionService;
use shop_service::domain::session::store::RefreshTokenStore;
use shop_service::inbound::http::policy::AccessPolicy;
use shop_service::inbound::http::router::create_router;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_EMAIL: &str = "admin@glowmart.test";
pub const ADMIN_PASSWORD: &str = "admin-pass";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub codec: Arc<CredentialCodec>,
    pub clock: Arc<ManualClock>,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub categories: Arc<InMemoryCategoryRepository>,
    pub refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_ttls(Duration::minutes(15), Duration::hours(24)).await
    }

    pub async fn spawn_with_ttls(access_ttl: Duration, refresh_ttl: Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::at(Utc::now()));
        let codec = Arc::new(
            CredentialCodec::new(JWT_SECRET, access_ttl, refresh_ttl)
                .expect("Failed to create credential codec")
                .with_clock(clock.clone()),
        );
        let authenticator = Arc::new(Authenticator::new(Arc::clone(&codec)));

        let accounts = Arc::new(InMemoryAccountRepository::default());
        let categories = Arc::new(InMemoryCategoryRepository::default());
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::default());

        let refresh_store = Arc::new(RefreshTokenStore::new(
            Arc::clone(&refresh_tokens),
            refresh_ttl,
            clock.clone(),
        ));

        let account_service = Arc::new(AccountService::new(
            Arc::clone(&accounts),
            Arc::new(CreationGuard::new()),
        ));
        let category_service = Arc::new(CategoryService::new(
            Arc::clone(&categories),
            Arc::new(CreationGuard::new()),
        ));
        let session_service = Arc::new(SessionService::new(
            Arc::clone(&accounts),
            refresh_store,
            authenticator,
        ));

        ensure_admin(
            account_service.as_ref(),
            &BootstrapConfig {
                admin_email: Some(ADMIN_EMAIL.to_string()),
                admin_password: Some(ADMIN_PASSWORD.to_string()),
                admin_name: Some("Store Admin".to_string()),
                admin_phone: Some("0900000000".to_string()),
            },
        )
        .await
        .expect("Failed to bootstrap admin");

        let router = create_router(
            account_service,
            category_service,
            session_service,
            Arc::clone(&codec),
            Arc::new(AccessPolicy::default()),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            codec,
            clock,
            accounts,
            categories,
            refresh_tokens,
        }
    }

    /// Access token for the bootstrap administrator
    pub fn admin_token(&self) -> String {
        self.codec
            .issue_access(ADMIN_EMAIL, ["ADMIN"])
            .expect("Failed to issue admin token")
    }

    /// Access token carrying only the USER role
    pub fn user_token(&self, subject: &str) -> String {
        self.codec
            .issue_access(subject, ["USER"])
            .expect("Failed to issue user token")
    }

    /// Register a USER account and return the response body
    pub async fn sign_up_user(&self, name: &str, email: &str, phone: &str) -> serde_json::Value {
        let response = self
            .post("/api/user/user/sign-up")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "phone": phone,
                "password": "pass_word!"
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in and return the response body
    pub async fn login(&self, email: &str, password: &str) -> serde_json::Value {
        self.post("/api/user/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response")
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}

/// Account storage with the same uniqueness rules as the accounts table.
///
/// Every read yields first so concurrent requests interleave between the
/// existence check and the insert.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    rows: Mutex<Vec<Account>>,
}

impl InMemoryAccountRepository {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        tokio::task::yield_now().await;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|a| a.email == account.email) {
            return Err(AccountError::EmailAlreadyExists(account.email.to_string()));
        }
        if rows.iter().any(|a| a.phone == account.phone) {
            return Err(AccountError::PhoneAlreadyExists(account.phone.to_string()));
        }
        rows.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        tokio::task::yield_now().await;
        Ok(self.rows.lock().unwrap().iter().find(|a| &a.id == id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        tokio::task::yield_now().await;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|a| &a.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AccountError> {
        tokio::task::yield_now().await;
        Ok(self.rows.lock().unwrap().iter().any(|a| &a.email == email))
    }

    async fn exists_by_phone(&self, phone: &PhoneNumber) -> Result<bool, AccountError> {
        tokio::task::yield_now().await;
        Ok(self.rows.lock().unwrap().iter().any(|a| &a.phone == phone))
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn update(&self, account: Account) -> Result<Account, AccountError> {
        tokio::task::yield_now().await;
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|a| a.id != account.id && a.email == account.email)
        {
            return Err(AccountError::EmailAlreadyExists(account.email.to_string()));
        }
        let row = rows
            .iter_mut()
            .find(|a| a.id == account.id)
            .ok_or_else(|| AccountError::NotFound(account.id.to_string()))?;
        *row = account.clone();
        Ok(account)
    }

    async fn touch_last_login(&self, id: &AccountId, at: DateTime<Utc>) -> Result<(), AccountError> {
        if let Some(row) = self.rows.lock().unwrap().iter_mut().find(|a| &a.id == id) {
            row.last_login_at = Some(at);
        }
        Ok(())
    }
}

/// Category storage keyed by unique name.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    rows: Mutex<Vec<Category>>,
}

impl InMemoryCategoryRepository {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, category: Category) -> Result<Category, CategoryError> {
        tokio::task::yield_now().await;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|c| c.name == category.name) {
            return Err(CategoryError::NameAlreadyExists(category.name.to_string()));
        }
        rows.push(category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, CategoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|c| &c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &CategoryName) -> Result<Option<Category>, CategoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.name == name)
            .cloned())
    }

    async fn exists_by_name(&self, name: &CategoryName) -> Result<bool, CategoryError> {
        tokio::task::yield_now().await;
        Ok(self.rows.lock().unwrap().iter().any(|c| &c.name == name))
    }

    async fn list_all(&self) -> Result<Vec<Category>, CategoryError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn update(&self, category: Category) -> Result<Category, CategoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|c| c.id != category.id && c.name == category.name)
        {
            return Err(CategoryError::NameAlreadyExists(category.name.to_string()));
        }
        let row = rows
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| CategoryError::NotFound(category.id.to_string()))?;
        *row = category.clone();
        Ok(category)
    }

    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| &c.id != id);
        if rows.len() == before {
            return Err(CategoryError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    rows: Mutex<Vec<RefreshRecord>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn insert(&self, record: RefreshRecord) -> Result<RefreshRecord, SessionError> {
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshRecord>, SessionError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.token == token)
            .cloned())
    }

    async fn delete_by_token(&self, token: &str) -> Result<u64, SessionError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.token != token);
        Ok((before - rows.len()) as u64)
    }
}
