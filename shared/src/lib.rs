//! Shared library for MindWell Lambda functions.
//!
//! This crate provides the sentiment engine, the role gate, and the common
//! utilities, types, and clients used across all Lambda functions.

pub mod admin;
pub mod assistant;
pub mod auth;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod http;
pub mod identity;
pub mod models;
pub mod responses;
pub mod role_api;
pub mod roles;
pub mod secrets;
pub mod sentiment;

pub use assistant::Assistant;
pub use auth::{caller_from_request, extract_user_from_context, validate_token, AuthenticatedUser};
pub use config::Config;
pub use context::{extract_context, ConversationContext, Turn};
pub use error::{Error, Result};
pub use identity::{MemoryUserDirectory, PgUserDirectory, UserDirectory};
pub use responses::{ChatCategory, ResponseCatalog, ResponsePool};
pub use roles::{ensure_can_revoke, Capabilities, Grant, MemoryRoleStore, PgRoleStore, Role, RoleGate, RoleStore};
pub use secrets::{get_database_credentials, get_secret, DatabaseCredentials};
pub use sentiment::{ChatSentiment, Domain, JournalSentiment, Sentiment, SentimentClassifier};
