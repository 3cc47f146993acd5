//! AniBoard client library.
//!
//! This crate owns the session lifecycle for the AniBoard anime dashboard
//! service - bearer token acquisition, persistence, attachment to outgoing
//! requests, invalidation on server rejection, restoration at startup -
//! plus the post catalog operations the dashboard consumes.
//!
//! The usual flow:
//!
//! ```no_run
//! use aniboard::auth::SessionManager;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let manager = SessionManager::new("http://localhost:8080", "/tmp/aniboard".into())?;
//! manager.restore_session().await;
//!
//! if !manager.check_auth() {
//!     let outcome = manager.login("user", "password").await;
//!     if !outcome.success {
//!         eprintln!("{}", outcome.message);
//!     }
//! }
//!
//! let posts = manager.api().fetch_posts(None).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod utils;
