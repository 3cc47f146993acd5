//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionManager`: the session lifecycle (login, signup, verify,
//!   restore, logout) resolving to structured `AuthOutcome` values
//! - `Session` / `SessionContext`: the shared in-memory state the
//!   transport hooks read and invalidate
//! - `TokenStore`: the durable slot for the raw bearer token
//! - `CredentialStore`: optional remembered password via the OS keychain

pub mod credentials;
pub mod manager;
pub mod session;
pub mod store;

pub use credentials::CredentialStore;
pub use manager::{AuthOutcome, SessionManager};
pub use session::{Session, SessionContext};
pub use store::TokenStore;
