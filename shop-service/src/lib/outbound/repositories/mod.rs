pub mod account;
pub mod category;
pub mod refresh_token;

pub use account::PostgresAccountRepository;
pub use category::PostgresCategoryRepository;
pub use refresh_token::PostgresRefreshTokenRepository;
