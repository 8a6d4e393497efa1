//! keyfob — client-side auth SDK.
//!
//! Thin client layer over a web backend's auth API:
//! - Endpoint wrappers for login/registration and captcha fetch ([`api`])
//! - Password pre-hashing with a client-side fixed salt ([`crypto`])
//! - An HTTP client that injects the stored bearer token into every
//!   request and turns envelope/status failures into display-ready
//!   errors ([`http`])
//!
//! ## Design Decisions
//! - Passwords are pre-hashed (SHA-256 over password + fixed salt) before
//!   leaving the process; the backend never sees plaintext.
//! - The token is an opaque string kept in a [`token::TokenStore`]; a 401
//!   at either the envelope or the HTTP level discards it so the caller
//!   knows to re-authenticate.
//! - Every failure path yields an [`error::ApiError`] carrying a message
//!   suitable for direct display; rendering is the caller's job.

pub mod api;
pub mod config;
pub mod crypto;
pub mod error;
pub mod http;
pub mod token;

pub use api::{fetch_captcha, login, logout, register};
pub use api::{LoginData, LoginRequest, RegisterData, RegisterRequest};
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{ApiClient, Envelope};
pub use token::TokenStore;
