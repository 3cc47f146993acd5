//! Data models for AniBoard entities.
//!
//! This module contains the data structures exchanged with the AniBoard
//! service:
//!
//! - `UserProfile`, `ApiUser`: the signed-in account and its wire form
//! - `LoginResponse`, `VerifyResponse`, `SignupAck`: auth endpoint responses
//! - `SignupProfile`, `GoogleProfile`: registration payloads
//! - `Post`: one anime entry from the content listing

pub mod post;
pub mod user;

pub use post::Post;
pub use user::{
    ApiUser, GoogleProfile, LoginResponse, SignupAck, SignupProfile, UserProfile, VerifyResponse,
};
