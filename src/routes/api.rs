use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

use super::blocking;
use crate::api::InvitationBackend;
use crate::designs::{all_designs, designs_for_event, lord_rule};
use crate::features::compute_feature_flags;
use crate::i18n::SUPPORTED_LANGUAGES;
use crate::models::event::EventType;
use crate::models::plan::PlanTier;
use crate::themes::catalog::themes_for_plan_remote;

fn bad_request(message: String) -> (Status, Json<Value>) {
    (
        Status::BadRequest,
        Json(json!({"success": false, "kind": "invalid_request", "error": message})),
    )
}

// ── Designs ────────────────────────────────────────────

#[get("/designs?<event_type>")]
pub fn designs(event_type: Option<&str>) -> (Status, Json<Value>) {
    match event_type {
        None => (Status::Ok, Json(json!({ "designs": all_designs() }))),
        Some(raw) => match EventType::from_str(raw) {
            Ok(t) => (
                Status::Ok,
                Json(json!({
                    "event_type": t,
                    "lord_rule": lord_rule(t),
                    "lord_policy": lord_rule(t).policy(),
                    "designs": designs_for_event(t),
                })),
            ),
            Err(e) => bad_request(e),
        },
    }
}

// ── Themes ─────────────────────────────────────────────

#[get("/themes?<plan>")]
pub async fn themes(
    plan: Option<&str>,
    backend: &State<Arc<dyn InvitationBackend>>,
) -> (Status, Json<Value>) {
    let plan = match plan.map(PlanTier::from_str).transpose() {
        Ok(p) => p.unwrap_or_default(),
        Err(e) => return bad_request(e),
    };

    let backend = Arc::clone(backend.inner());
    match blocking(move || Ok(themes_for_plan_remote(&*backend, plan))).await {
        Ok((themes, source)) => (
            Status::Ok,
            Json(json!({ "plan": plan, "source": source, "themes": themes })),
        ),
        Err(e) => super::api_error_json(&e),
    }
}

// ── Plans ──────────────────────────────────────────────

#[get("/plans/<plan>/features")]
pub fn plan_features(plan: &str) -> (Status, Json<Value>) {
    match PlanTier::from_str(plan) {
        Ok(tier) => (
            Status::Ok,
            Json(json!({ "plan": tier, "features": compute_feature_flags(tier) })),
        ),
        Err(e) => bad_request(e),
    }
}

// ── Languages ──────────────────────────────────────────

#[get("/languages")]
pub fn languages() -> Json<Value> {
    Json(json!({ "languages": SUPPORTED_LANGUAGES }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![designs, themes, plan_features, languages]
}
