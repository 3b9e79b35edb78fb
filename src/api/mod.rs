pub mod client;

use serde::Serialize;
use serde_json::Value;

use crate::analytics::PageView;
use crate::features::FeatureFlags;
use crate::models::plan::PlanTier;
use crate::models::profile::Profile;
use crate::models::rsvp::{ReactionForm, RsvpForm, WishForm};
use crate::themes::Theme;

pub use client::ApiClient;

// ── Errors ────────────────────────────────────────────

/// What went wrong talking to the profile API, in the terms a guest page needs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("invitation not found")]
    NotFound,
    #[error("invitation link has expired")]
    Expired,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("too many requests")]
    RateLimited,
    #[error("unexpected API failure: {0}")]
    Unexpected(String),
}

/// The error page to show. One per `ApiError` variant, payload dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Expired,
    InvalidRequest,
    RateLimited,
    Unexpected,
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Expired => 410,
            Self::InvalidRequest => 400,
            Self::RateLimited => 429,
            Self::Unexpected => 502,
        }
    }

    /// Key prefix in the `errors` section of a language bundle.
    pub fn text_key(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::InvalidRequest => "invalid",
            Self::RateLimited => "rate_limited",
            Self::Unexpected => "unexpected",
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            Self::NotFound => "Invitation not found",
            Self::Expired => "This invitation has expired",
            Self::InvalidRequest => "This link doesn't look right",
            Self::RateLimited => "Please slow down",
            Self::Unexpected => "Something went wrong",
        }
    }

    pub fn default_body(&self) -> &'static str {
        match self {
            Self::NotFound => "We couldn't find an invitation at this address. Please check the link you were sent.",
            Self::Expired => "The celebration has passed and this invitation is no longer available.",
            Self::InvalidRequest => "The link seems to be incomplete or mistyped. Please ask the couple to share it again.",
            Self::RateLimited => "You've sent a lot of responses in a short time. Please try again in a little while.",
            Self::Unexpected => "We couldn't load this invitation right now. Please try again shortly.",
        }
    }
}

impl ApiError {
    /// Map an HTTP status (and the response body, for 400s) to the taxonomy.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            404 => ApiError::NotFound,
            410 => ApiError::Expired,
            400 => ApiError::InvalidRequest(error_message(body)),
            429 => ApiError::RateLimited,
            other => ApiError::Unexpected(format!("HTTP {}: {}", other, error_message(body))),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound => ErrorKind::NotFound,
            ApiError::Expired => ErrorKind::Expired,
            ApiError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            ApiError::RateLimited => ErrorKind::RateLimited,
            ApiError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

/// Pull a human message out of an error body: `{"error": ..}`, `{"detail": ..}`,
/// `{"message": ..}`, or the first 200 characters of the raw text.
fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(msg) = json.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    body.chars().take(200).collect()
}

// ── Backend ───────────────────────────────────────────

/// Everything this service asks of the profile API.
/// `ApiClient` talks HTTP; tests substitute an in-memory fake.
pub trait InvitationBackend: Send + Sync {
    fn fetch_profile(&self, profile_id: &str) -> Result<Profile, ApiError>;
    fn fetch_features(&self, profile_id: &str) -> Result<FeatureFlags, ApiError>;
    fn fetch_themes(&self, plan: PlanTier) -> Result<Vec<Theme>, ApiError>;

    fn create_profile(&self, profile: &Profile, token: Option<&str>) -> Result<Profile, ApiError>;
    fn update_profile(
        &self,
        profile_id: &str,
        profile: &Profile,
        token: Option<&str>,
    ) -> Result<Profile, ApiError>;
    fn delete_profile(&self, profile_id: &str, hard: bool, token: Option<&str>) -> Result<(), ApiError>;

    fn submit_rsvp(&self, profile_id: &str, form: &RsvpForm) -> Result<(), ApiError>;
    fn submit_wish(&self, profile_id: &str, form: &WishForm) -> Result<(), ApiError>;
    fn send_reaction(
        &self,
        profile_id: &str,
        event_id: &str,
        form: &ReactionForm,
    ) -> Result<(), ApiError>;
    fn track_view(&self, view: &PageView) -> Result<(), ApiError>;
}
