use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{api_error_json, blocking, field_errors_json};
use crate::api::InvitationBackend;
use crate::editor::{EditorAction, EditorError, EditorState};
use crate::models::profile::Profile;

/// Bearer token from the admin console. Checked by the profile API, not
/// here; this guard only insists one is present and carries it along.
pub struct AdminToken(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = request
            .headers()
            .get_one("Authorization")
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim())
            .filter(|t| !t.is_empty());

        match token {
            Some(t) => Outcome::Success(AdminToken(t.to_string())),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

fn editor_error_json(error: EditorError) -> (Status, Json<Value>) {
    match error {
        EditorError::Invalid(errors) => field_errors_json(&errors),
        EditorError::Api(e) => api_error_json(&e),
        other => (
            Status::UnprocessableEntity,
            Json(json!({"success": false, "kind": "editor", "error": other.to_string()})),
        ),
    }
}

// ── Editor ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub profile: Profile,
    pub action: EditorAction,
}

/// Apply one editor action to a draft and hand the result back. Nothing is saved.
#[post("/editor/apply", format = "json", data = "<req>")]
pub fn editor_apply(_token: AdminToken, req: Json<ApplyRequest>) -> (Status, Json<Value>) {
    let ApplyRequest { profile, action } = req.into_inner();
    let mut state = EditorState::new(profile);
    match state.apply(action) {
        Ok(()) => (Status::Ok, Json(json!({"success": true, "state": state}))),
        Err(e) => editor_error_json(e),
    }
}

// ── Profiles ───────────────────────────────────────────

#[post("/profiles/save", format = "json", data = "<profile>")]
pub async fn profile_save(
    token: AdminToken,
    profile: Json<Profile>,
    backend: &State<Arc<dyn InvitationBackend>>,
) -> (Status, Json<Value>) {
    let mut state = EditorState::new(profile.into_inner());
    let backend = Arc::clone(backend.inner());

    let saved = rocket::tokio::task::spawn_blocking(move || {
        state.save(&*backend, Some(&token.0)).cloned()
    })
    .await;

    match saved {
        Ok(Ok(profile)) => (Status::Ok, Json(json!({"success": true, "profile": profile}))),
        Ok(Err(e)) => editor_error_json(e),
        Err(e) => {
            log::error!("[editor] Save worker failed: {}", e);
            (
                Status::InternalServerError,
                Json(json!({"success": false, "error": "save failed"})),
            )
        }
    }
}

#[delete("/profiles/<profile_id>?<hard>")]
pub async fn profile_delete(
    token: AdminToken,
    profile_id: &str,
    hard: Option<bool>,
    backend: &State<Arc<dyn InvitationBackend>>,
) -> (Status, Json<Value>) {
    let backend = Arc::clone(backend.inner());
    let id = profile_id.to_string();
    let hard = hard.unwrap_or(false);

    match blocking(move || backend.delete_profile(&id, hard, Some(&token.0))).await {
        Ok(()) => {
            log::info!(
                "[editor] {} profile {}",
                if hard { "Deleted" } else { "Archived" },
                profile_id
            );
            (Status::Ok, Json(json!({"success": true, "hard": hard})))
        }
        Err(e) => api_error_json(&e),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![editor_apply, profile_save, profile_delete]
}
