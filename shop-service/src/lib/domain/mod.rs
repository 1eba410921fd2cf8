pub mod account;
pub mod category;
pub mod guard;
pub mod session;
