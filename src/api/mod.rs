//! REST API client module for the AniBoard service.
//!
//! This module provides the `ApiClient` used for the authentication
//! endpoints and the post catalog. The service uses JWT bearer token
//! authentication; the token is attached and invalidated by interception
//! hooks wired to the shared session context.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
