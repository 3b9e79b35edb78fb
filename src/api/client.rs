use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::{ApiError, InvitationBackend};
use crate::analytics::PageView;
use crate::features::FeatureFlags;
use crate::models::plan::PlanTier;
use crate::models::profile::Profile;
use crate::models::rsvp::{ReactionForm, RsvpForm, WishForm};
use crate::themes::Theme;

/// Blocking JSON client for the profile API. Never retries.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Unexpected(format!("invalid API base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Unexpected(format!(
                "API base URL cannot take paths: {}",
                base_url
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Unexpected(format!("HTTP client error: {}", e)))?;

        Ok(ApiClient {
            http,
            base_url,
            token,
        })
    }

    /// `base_url` + percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Attach the caller's bearer token, or the configured one.
    fn authorized(&self, req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token.or(self.token.as_deref()) {
            Some(t) if !t.is_empty() => req.bearer_auth(t),
            _ => req,
        }
    }

    fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = req
            .send()
            .map_err(|e| ApiError::Unexpected(format!("request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        resp.json::<T>()
            .map_err(|e| ApiError::Unexpected(format!("invalid JSON from API: {}", e)))
    }

    fn send_empty(&self, req: RequestBuilder) -> Result<(), ApiError> {
        let resp = req
            .send()
            .map_err(|e| ApiError::Unexpected(format!("request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(())
    }
}

impl InvitationBackend for ApiClient {
    fn fetch_profile(&self, profile_id: &str) -> Result<Profile, ApiError> {
        let url = self.endpoint(&["profiles", profile_id]);
        self.send_json(self.http.get(url))
    }

    fn fetch_features(&self, profile_id: &str) -> Result<FeatureFlags, ApiError> {
        let url = self.endpoint(&["profiles", profile_id, "features"]);
        self.send_json(self.http.get(url))
    }

    fn fetch_themes(&self, plan: PlanTier) -> Result<Vec<Theme>, ApiError> {
        let url = self.endpoint(&["themes"]);
        self.send_json(self.http.get(url).query(&[("plan_type", plan.as_str())]))
    }

    fn create_profile(&self, profile: &Profile, token: Option<&str>) -> Result<Profile, ApiError> {
        let url = self.endpoint(&["profiles"]);
        let req = self.authorized(self.http.post(url).json(profile), token);
        self.send_json(req)
    }

    fn update_profile(
        &self,
        profile_id: &str,
        profile: &Profile,
        token: Option<&str>,
    ) -> Result<Profile, ApiError> {
        let url = self.endpoint(&["profiles", profile_id]);
        let req = self.authorized(self.http.put(url).json(profile), token);
        self.send_json(req)
    }

    fn delete_profile(&self, profile_id: &str, hard: bool, token: Option<&str>) -> Result<(), ApiError> {
        let url = self.endpoint(&["profiles", profile_id]);
        let hard = if hard { "true" } else { "false" };
        let req = self.authorized(self.http.delete(url).query(&[("hard", hard)]), token);
        self.send_empty(req)
    }

    fn submit_rsvp(&self, profile_id: &str, form: &RsvpForm) -> Result<(), ApiError> {
        let url = self.endpoint(&["profiles", profile_id, "rsvp"]);
        self.send_empty(self.http.post(url).json(form))
    }

    fn submit_wish(&self, profile_id: &str, form: &WishForm) -> Result<(), ApiError> {
        let url = self.endpoint(&["profiles", profile_id, "wishes"]);
        self.send_empty(self.http.post(url).json(form))
    }

    fn send_reaction(
        &self,
        profile_id: &str,
        event_id: &str,
        form: &ReactionForm,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["profiles", profile_id, "events", event_id, "reactions"]);
        self.send_empty(self.http.post(url).json(form))
    }

    fn track_view(&self, view: &PageView) -> Result<(), ApiError> {
        let url = self.endpoint(&["profiles", view.profile_id.as_str(), "analytics", "view"]);
        self.send_empty(self.http.post(url).json(view))
    }
}
