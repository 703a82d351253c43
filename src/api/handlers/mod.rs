pub mod auth;
pub mod csrf;
pub mod error;
pub mod health;
pub mod me;
