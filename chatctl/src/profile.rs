//! User profile lookups against the chatbot backend.
//!
//! The backend stores one profile per `(user_id, session_id)` pair and wraps
//! every answer in an envelope:
//!
//! ```json
//! { "success": true, "data": { "user_profile": { "name": "Alice" } } }
//! ```
//!
//! The profile itself is opaque here; it is handed back exactly as received.

use crate::client::BackendClient;
use crate::error::{ChatError, Result};
use serde_json::{Map, Value};
use tracing::{error, warn};

pub type UserProfile = Map<String, Value>;

const PROFILE_PATH: &str = "/api/user-profile";

#[derive(Clone, Debug)]
pub struct ProfileFetcher {
    client: BackendClient,
}

impl ProfileFetcher {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Looks up the profile for a user's chat session.
    ///
    /// Returns `None` without touching the network when either identifier is
    /// empty. Every other outcome is `Some`: the backend's profile on success,
    /// an empty map when the request failed or the response carried no profile.
    /// Failures are logged, never returned.
    pub async fn fetch_user_profile(&self, user_id: &str, session_id: &str) -> Option<UserProfile> {
        if user_id.is_empty() || session_id.is_empty() {
            warn!(user_id, session_id, "get user profile: missing user_id or session_id");
            return None;
        }

        match self.request_profile(user_id, session_id).await {
            Ok(profile) => Some(profile),
            Err(ChatError::UnexpectedShape(_)) => Some(UserProfile::new()),
            Err(e) => {
                error!(user_id, session_id, error = %e, "get user profile failed");
                Some(UserProfile::new())
            }
        }
    }

    async fn request_profile(&self, user_id: &str, session_id: &str) -> Result<UserProfile> {
        let body = self
            .client
            .get(PROFILE_PATH, &session_query(user_id, session_id))
            .await?;
        extract_profile(body)
    }

    /// Replaces the stored profile for a user's chat session and returns the
    /// profile the backend now holds.
    pub async fn update_user_profile(
        &self,
        user_id: &str,
        session_id: &str,
        profile: &UserProfile,
    ) -> Result<UserProfile> {
        if user_id.is_empty() || session_id.is_empty() {
            return Err(ChatError::Input(
                "user_id and session_id are required".into(),
            ));
        }
        // The backend rejects an empty profile with MISSING_PROFILE_DATA.
        if profile.is_empty() {
            return Err(ChatError::Input("profile has no fields to update".into()));
        }

        let body = self
            .client
            .post(
                PROFILE_PATH,
                &session_query(user_id, session_id),
                &Value::Object(profile.clone()),
            )
            .await?;
        extract_profile(body)
    }
}

fn session_query<'a>(user_id: &'a str, session_id: &'a str) -> [(&'static str, &'a str); 2] {
    [("user_id", user_id), ("session_id", session_id)]
}

fn extract_profile(body: Value) -> Result<UserProfile> {
    let Value::Object(mut envelope) = body else {
        return Err(ChatError::shape("response body is not an object"));
    };

    if envelope.get("success").and_then(Value::as_bool) != Some(true) {
        let message = envelope
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("success flag not set");
        return Err(ChatError::shape(message));
    }

    let Some(Value::Object(mut data)) = envelope.remove("data") else {
        return Err(ChatError::shape("missing data object"));
    };

    match data.remove("user_profile") {
        Some(Value::Object(profile)) => Ok(profile),
        Some(_) => Err(ChatError::shape("data.user_profile is not an object")),
        None => Err(ChatError::shape("missing data.user_profile")),
    }
}
