//! The session manager: single source of truth for "is this client
//! authenticated, and as whom".
//!
//! Every operation resolves to a value - expected rejections come back as
//! `AuthOutcome { success: false, .. }` with the server's message, transport
//! failures as a generic fallback message. Nothing here panics or returns
//! `Err` once the manager is constructed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::auth::session::{Session, SessionContext};
use crate::auth::store::TokenStore;
use crate::models::{GoogleProfile, SignupProfile, UserProfile};

/// Fallback messages for failures without a server-provided reason
const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";
const SIGNUP_FAILED_MESSAGE: &str = "Signup failed. Please try again.";
const GOOGLE_SIGNUP_FAILED_MESSAGE: &str = "Google signup failed. Please try again.";

/// Returned when registration succeeded but the follow-up login did not.
/// Distinct from a plain failure: the account exists, only the session is
/// missing.
const PARTIAL_SIGNUP_MESSAGE: &str = "Account created but login failed. Please try logging in.";

/// Structured result of an authentication operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
}

impl AuthOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Owns the session lifecycle: acquire on login, persist, attach to
/// outgoing calls via the transport hooks, invalidate on 401/403, restore
/// on startup.
pub struct SessionManager {
    api: ApiClient,
    session: Arc<SessionContext>,
}

impl SessionManager {
    /// Build a manager talking to `base_url`, persisting the token under
    /// `data_dir`. Installs the interception hooks by handing the transport
    /// a shared handle to the session context.
    pub fn new(base_url: impl Into<String>, data_dir: PathBuf) -> Result<Self> {
        let session = SessionContext::new(TokenStore::new(data_dir));
        let api = ApiClient::new(Arc::clone(&session))?.with_base_url(base_url);
        Ok(Self { api, session })
    }

    /// The authenticated transport, for catalog calls made by consumers
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Invoked once at startup. With no persisted token this makes no
    /// network call and just completes the loading state; otherwise the
    /// token is sent for verification.
    pub async fn restore_session(&self) {
        let _loading = self.session.begin_loading();
        match self.session.persisted_token() {
            Some(token) => {
                debug!("Found persisted token, verifying");
                self.verify(&token).await;
            }
            None => {
                debug!("No persisted token found");
            }
        }
    }

    /// Send a token to the verification endpoint. Returns true when the
    /// server accepted it and the session was populated; any failure
    /// (explicit, HTTP, or transport) invalidates the session instead.
    pub async fn verify(&self, token: &str) -> bool {
        let _loading = self.session.begin_loading();
        match self.api.verify_token(token).await {
            Ok(response) if response.success => match response.user {
                Some(user) => {
                    let profile = user.into_profile();
                    info!(username = %profile.username, "Token verified");
                    self.session.establish(token.to_string(), profile);
                    true
                }
                None => {
                    warn!("Verification succeeded but response carried no user");
                    self.session.invalidate();
                    false
                }
            },
            Ok(_) => {
                debug!("Token rejected by server");
                self.session.invalidate();
                false
            }
            Err(e) => {
                warn!(error = %e, "Token verification failed");
                self.session.invalidate();
                false
            }
        }
    }

    /// Authenticate with username and password.
    ///
    /// Only a confirmed success mutates session state; repeated failures
    /// leave any existing valid session untouched.
    pub async fn login(&self, username: &str, password: &str) -> AuthOutcome {
        let _loading = self.session.begin_loading();
        debug!(username, "Attempting login");

        match self.api.login(username, password).await {
            Ok(response) => match (response.success, response.token, response.user) {
                (true, Some(token), Some(user)) => {
                    let profile = user.into_profile();
                    info!(username = %profile.username, "Login successful");
                    self.session.establish(token, profile);
                    AuthOutcome::ok(
                        response
                            .message
                            .unwrap_or_else(|| "Login successful".to_string()),
                    )
                }
                _ => AuthOutcome::failure(
                    response.message.unwrap_or_else(|| "Login failed".to_string()),
                ),
            },
            Err(e) => {
                warn!(error = %e, "Login request failed");
                match e.user_message() {
                    Some(message) => AuthOutcome::failure(message),
                    None => AuthOutcome::failure(LOGIN_FAILED_MESSAGE),
                }
            }
        }
    }

    /// Register a new account, then establish a session with the same
    /// credentials in one user-facing action.
    pub async fn signup(&self, profile: &SignupProfile) -> AuthOutcome {
        let ack_message = {
            let _loading = self.session.begin_loading();
            debug!(username = %profile.user_name, "Attempting signup");

            match self.api.signup(profile).await {
                Ok(ack) if ack.success => ack.message,
                Ok(ack) => {
                    return AuthOutcome::failure(
                        ack.message.unwrap_or_else(|| "Signup failed".to_string()),
                    )
                }
                Err(e) => {
                    warn!(error = %e, "Signup request failed");
                    return match e.user_message() {
                        Some(message) => AuthOutcome::failure(message),
                        None => AuthOutcome::failure(SIGNUP_FAILED_MESSAGE),
                    };
                }
            }
            // loading drops here; login() manages its own round-trip
        };

        let login = self.login(&profile.user_name, &profile.password).await;
        if login.success {
            AuthOutcome::ok(ack_message.unwrap_or_else(|| "Account created".to_string()))
        } else {
            AuthOutcome::failure(PARTIAL_SIGNUP_MESSAGE)
        }
    }

    /// Authenticate from a third-party identity payload. The provider flow
    /// returns a token directly, so the session is populated from this
    /// response with no second round-trip.
    pub async fn google_signup(&self, profile: &GoogleProfile) -> AuthOutcome {
        let _loading = self.session.begin_loading();
        debug!(email = %profile.email, "Attempting Google signup");

        match self.api.google_signup(profile).await {
            Ok(response) => match (response.success, response.token, response.user) {
                (true, Some(token), Some(user)) => {
                    let profile = user.into_profile();
                    info!(username = %profile.username, "Google signup successful");
                    self.session.establish(token, profile);
                    AuthOutcome::ok(
                        response
                            .message
                            .unwrap_or_else(|| "Signup successful".to_string()),
                    )
                }
                _ => AuthOutcome::failure(
                    response
                        .message
                        .unwrap_or_else(|| "Google signup failed".to_string()),
                ),
            },
            Err(e) => {
                warn!(error = %e, "Google signup request failed");
                match e.user_message() {
                    Some(message) => AuthOutcome::failure(message),
                    None => AuthOutcome::failure(GOOGLE_SIGNUP_FAILED_MESSAGE),
                }
            }
        }
    }

    /// Best-effort remote logout, then unconditional local invalidation.
    /// A flaky network can never leave the client looking authenticated.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Logout request failed, clearing local state anyway");
        }
        self.session.invalidate();
        info!("Logged out");
    }

    /// Current token: in-memory value, falling back to the persisted slot
    pub fn token(&self) -> Option<String> {
        self.session.current_token()
    }

    /// True iff the session is authenticated and a user profile is loaded
    pub fn check_auth(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.session.user()
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    /// Copy of the full session state for consumers
    pub fn snapshot(&self) -> Session {
        self.session.snapshot()
    }
}
