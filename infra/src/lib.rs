//! # Savora Infrastructure
//!
//! Concrete implementations of the core layer's persistence and delivery
//! ports: MySQL repositories via sqlx and SMS providers (SMS.ru and a
//! log-only mock).

pub mod database;
pub mod sms;

pub use database::connection::create_pool;
pub use database::mysql::{MySqlTokenRepository, MySqlUserRepository};
pub use sms::{MockSms, SmsRuClient};
