//! In-memory session state, shared between the session manager and the
//! transport's interception hooks.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::warn;

use crate::auth::store::TokenStore;
use crate::models::UserProfile;

/// The live authentication state.
///
/// `authenticated` is true iff both `token` and `user` are present and the
/// most recent login or verification accepted the token. `loading` starts
/// true and is cleared when session restoration (or any later auth
/// operation) completes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub authenticated: bool,
    pub loading: bool,
}

impl Session {
    fn initial() -> Self {
        Session {
            loading: true,
            ..Default::default()
        }
    }
}

/// Shared owner of the session and the durable token slot.
///
/// All mutation goes through `establish` and `invalidate`, so token and user
/// are always set or cleared together; callers never observe one without the
/// other. The response hook holds a clone of the `Arc` and invalidates
/// through the same path as a failed verification.
pub struct SessionContext {
    session: RwLock<Session>,
    store: TokenStore,
}

impl SessionContext {
    pub fn new(store: TokenStore) -> Arc<Self> {
        Arc::new(Self {
            session: RwLock::new(Session::initial()),
            store,
        })
    }

    /// Current token: in-memory first, persisted slot as fallback.
    ///
    /// The fallback covers the window between process start and restoration
    /// completing, so early requests still go out authenticated.
    pub fn current_token(&self) -> Option<String> {
        let from_memory = self.session.read().token.clone();
        from_memory.or_else(|| self.store.load())
    }

    /// Token in the durable slot, ignoring in-memory state
    pub fn persisted_token(&self) -> Option<String> {
        self.store.load()
    }

    /// Install the token and profile for an accepted credential, atomically,
    /// and persist the token.
    pub fn establish(&self, token: String, user: UserProfile) {
        {
            let mut session = self.session.write();
            session.token = Some(token.clone());
            session.user = Some(user);
            session.authenticated = true;
        }
        if let Err(e) = self.store.save(&token) {
            warn!(error = %e, "Failed to persist session token");
        }
    }

    /// Clear the session and the durable token slot.
    ///
    /// Used by logout, failed verification, and the 401/403 response hook.
    pub fn invalidate(&self) {
        {
            let mut session = self.session.write();
            session.token = None;
            session.user = None;
            session.authenticated = false;
        }
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to remove persisted token");
        }
    }

    /// True iff the session is authenticated and a user profile is loaded
    pub fn is_authenticated(&self) -> bool {
        let session = self.session.read();
        session.authenticated && session.user.is_some()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.session.read().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.session.read().loading
    }

    /// Copy of the full session state for consumers
    pub fn snapshot(&self) -> Session {
        self.session.read().clone()
    }

    /// Mark a network round-trip in progress. The returned guard clears the
    /// flag when dropped, so every exit path of an operation completes the
    /// loading state.
    pub fn begin_loading(&self) -> LoadingGuard<'_> {
        self.session.write().loading = true;
        LoadingGuard { ctx: self }
    }

    fn finish_loading(&self) {
        self.session.write().loading = false;
    }
}

/// RAII guard for the `loading` flag
pub struct LoadingGuard<'a> {
    ctx: &'a SessionContext,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.ctx.finish_loading();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> (tempfile::TempDir, Arc<SessionContext>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = SessionContext::new(TokenStore::new(dir.path().to_path_buf()));
        (dir, ctx)
    }

    fn profile() -> UserProfile {
        UserProfile {
            username: "rei".into(),
            display_name: "Rei A.".into(),
            user_id: "u1".into(),
            email: "rei@example.com".into(),
        }
    }

    #[test]
    fn test_starts_empty_and_loading() {
        let (_dir, ctx) = test_context();
        let session = ctx.snapshot();
        assert!(session.loading);
        assert!(session.token.is_none());
        assert!(session.user.is_none());
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_establish_sets_token_and_user_together() {
        let (_dir, ctx) = test_context();
        ctx.establish("tok".into(), profile());

        let session = ctx.snapshot();
        assert_eq!(session.token.as_deref(), Some("tok"));
        assert!(session.user.is_some());
        assert!(ctx.is_authenticated());
        // Token reached the durable slot
        assert_eq!(ctx.persisted_token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_invalidate_clears_everything() {
        let (_dir, ctx) = test_context();
        ctx.establish("tok".into(), profile());
        ctx.invalidate();

        let session = ctx.snapshot();
        assert!(session.token.is_none());
        assert!(session.user.is_none());
        assert!(!ctx.is_authenticated());
        assert!(ctx.persisted_token().is_none());
    }

    #[test]
    fn test_current_token_falls_back_to_store() {
        let (dir, ctx) = test_context();
        ctx.establish("tok".into(), profile());

        // Simulate a fresh process: empty memory, same durable slot
        let fresh = SessionContext::new(TokenStore::new(dir.path().to_path_buf()));
        assert!(fresh.snapshot().token.is_none());
        assert_eq!(fresh.current_token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_loading_guard_clears_on_drop() {
        let (_dir, ctx) = test_context();
        {
            let _guard = ctx.begin_loading();
            assert!(ctx.is_loading());
        }
        assert!(!ctx.is_loading());
    }
}
