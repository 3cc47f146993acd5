use serde::{Deserialize, Serialize};

/// Profile of the signed-in account as exposed to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub display_name: String,
    pub user_id: String,
    pub email: String,
}

/// User record as the server sends it.
///
/// The login and google-signup endpoints spell the username field
/// `user_name` while the verify endpoint spells it `username`; the alias
/// accepts both. Ids arrive as either strings or numbers depending on the
/// backing store, so they are captured as raw JSON and stringified.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    #[serde(alias = "user_name")]
    pub username: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "userId", alias = "_id")]
    pub user_id: Option<serde_json::Value>,
    pub email: Option<String>,
}

impl ApiUser {
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            username: self.username.unwrap_or_default(),
            display_name: self.name.unwrap_or_default(),
            user_id: match self.user_id {
                Some(serde_json::Value::String(id)) => id,
                Some(other) => other.to_string(),
                None => String::new(),
            },
            email: self.email.unwrap_or_default(),
        }
    }
}

/// Response from `POST /login` and `POST /google-signup`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    pub token: Option<String>,
    pub user: Option<ApiUser>,
    pub message: Option<String>,
}

/// Response from `GET /api/verify-token`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub success: bool,
    pub user: Option<ApiUser>,
}

/// Response from `POST /adduser`
#[derive(Debug, Clone, Deserialize)]
pub struct SignupAck {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

/// Registration payload for `POST /adduser`
#[derive(Debug, Clone, Serialize)]
pub struct SignupProfile {
    pub user_name: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Third-party identity payload for `POST /google-signup`
#[derive(Debug, Clone, Serialize)]
pub struct GoogleProfile {
    pub email: String,
    pub name: String,
    #[serde(rename = "googleId")]
    pub google_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_uses_user_name_spelling() {
        let json = r#"{
            "success": true,
            "token": "jwt-abc",
            "user": {"user_name": "rei", "name": "Rei A.", "userId": "66f1", "email": "rei@example.com"},
            "message": "Welcome back"
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).expect("parse login response");
        assert!(resp.success);
        assert_eq!(resp.token.as_deref(), Some("jwt-abc"));

        let profile = resp.user.expect("user present").into_profile();
        assert_eq!(profile.username, "rei");
        assert_eq!(profile.display_name, "Rei A.");
        assert_eq!(profile.user_id, "66f1");
    }

    #[test]
    fn test_verify_response_uses_username_spelling() {
        let json = r#"{
            "success": true,
            "user": {"username": "rei", "name": "Rei A.", "userId": 42, "email": "rei@example.com"}
        }"#;
        let resp: VerifyResponse = serde_json::from_str(json).expect("parse verify response");
        let profile = resp.user.expect("user present").into_profile();
        assert_eq!(profile.username, "rei");
        // Numeric ids are stringified
        assert_eq!(profile.user_id, "42");
    }

    #[test]
    fn test_failure_response_without_token() {
        let json = r#"{"success": false, "message": "Invalid credentials"}"#;
        let resp: LoginResponse = serde_json::from_str(json).expect("parse failure response");
        assert!(!resp.success);
        assert!(resp.token.is_none());
        assert_eq!(resp.message.as_deref(), Some("Invalid credentials"));
    }
}
