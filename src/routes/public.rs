use chrono::Utc;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

use super::{api_error_json, blocking, field_errors_json};
use crate::analytics::{page_view, VisitorInfo};
use crate::api::{ApiError, ErrorKind, InvitationBackend};
use crate::config::AppConfig;
use crate::features::{self, FeatureFlags};
use crate::i18n::{LanguageLoader, Translator, ENGLISH};
use crate::invitation::{compose_event_page, compose_page, pick_language};
use crate::models::event::EventType;
use crate::models::profile::{CustomTexts, Profile};
use crate::models::rsvp::{ReactionForm, RsvpForm, WishForm};
use crate::notifier::{Notification, Notifier};
use crate::rate_limit::{self, Bucket, RateLimiter, HOUR};
use crate::render;

// ── Invitation pages ───────────────────────────────────

#[get("/i/<profile_id>?<lang>")]
pub async fn invitation(
    profile_id: &str,
    lang: Option<&str>,
    visitor: VisitorInfo,
    backend: &State<Arc<dyn InvitationBackend>>,
    languages: &State<Arc<LanguageLoader>>,
    notifier: &State<Notifier>,
    config: &State<AppConfig>,
) -> (Status, RawHtml<String>) {
    let loaded = load(backend, profile_id).await;
    respond(loaded, None, lang, &visitor, languages, notifier, config)
}

#[get("/i/<profile_id>/events/<event_type>?<lang>")]
pub async fn event_page(
    profile_id: &str,
    event_type: &str,
    lang: Option<&str>,
    visitor: VisitorInfo,
    backend: &State<Arc<dyn InvitationBackend>>,
    languages: &State<Arc<LanguageLoader>>,
    notifier: &State<Notifier>,
    config: &State<AppConfig>,
) -> (Status, RawHtml<String>) {
    let event_type = match EventType::from_str(event_type) {
        Ok(t) => t,
        Err(e) => {
            log::debug!("[routes] {}", e);
            return error_page(ErrorKind::InvalidRequest, lang, languages);
        }
    };
    let loaded = load(backend, profile_id).await;
    respond(loaded, Some(event_type), lang, &visitor, languages, notifier, config)
}

/// Profile and flags. A profile failure is the guest's error; a flags
/// failure only fails closed.
async fn load(
    backend: &State<Arc<dyn InvitationBackend>>,
    profile_id: &str,
) -> Result<(Profile, FeatureFlags), ApiError> {
    let backend = Arc::clone(backend.inner());
    let id = profile_id.to_string();
    blocking(move || {
        let profile = backend.fetch_profile(&id)?;
        let flags = features::fetch_flags(&*backend, &id);
        Ok((profile, flags))
    })
    .await
}

fn respond(
    loaded: Result<(Profile, FeatureFlags), ApiError>,
    only: Option<EventType>,
    lang: Option<&str>,
    visitor: &VisitorInfo,
    languages: &LanguageLoader,
    notifier: &Notifier,
    config: &AppConfig,
) -> (Status, RawHtml<String>) {
    let (profile, flags) = match loaded {
        Ok(pair) => pair,
        Err(e) => {
            if e.kind() == ErrorKind::Unexpected {
                log::warn!("[api] Profile fetch failed: {}", e);
            }
            return error_page(e.kind(), lang, languages);
        }
    };

    let code = pick_language(&profile, &flags, lang);
    let custom = if flags.custom_texts {
        profile.custom_texts.clone()
    } else {
        CustomTexts::new()
    };
    let translator = Translator::new(&code, languages.load_or_english(&code), custom);

    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let composed = match only {
        Some(event_type) => compose_event_page(&profile, &flags, &translator, event_type, now, &mut rng),
        None => compose_page(&profile, &flags, &translator, now, &mut rng),
    };

    match composed {
        Ok(mut page) => {
            page.site_name = config.site.name.clone();
            let profile_key = profile.id.as_deref().unwrap_or(&profile.slug);
            if let Some(view) = page_view(profile_key, &code, visitor, &flags) {
                notifier.enqueue(Notification::PageView(view));
            }
            (Status::Ok, RawHtml(render::render_invitation(&page)))
        }
        Err(e) => {
            let status = super::status_for(&e);
            (status, RawHtml(render::render_error_page(e.kind(), &translator)))
        }
    }
}

fn error_page(kind: ErrorKind, lang: Option<&str>, languages: &LanguageLoader) -> (Status, RawHtml<String>) {
    let code = lang.unwrap_or(ENGLISH);
    let translator = Translator::new(code, languages.load_or_english(code), CustomTexts::new());
    let status = Status::from_code(kind.status_code()).unwrap_or(Status::BadGateway);
    (status, RawHtml(render::render_error_page(kind, &translator)))
}

// ── Guest submissions ──────────────────────────────────

#[post("/i/<profile_id>/rsvp", format = "json", data = "<form>")]
pub async fn rsvp(
    profile_id: &str,
    form: Json<RsvpForm>,
    visitor: VisitorInfo,
    backend: &State<Arc<dyn InvitationBackend>>,
    limiter: &State<Arc<RateLimiter>>,
    config: &State<AppConfig>,
) -> (Status, Json<Value>) {
    let form = form.into_inner();
    let errors = form.validate();
    if !errors.is_empty() {
        return field_errors_json(&errors);
    }

    let key = rate_limit::key(Bucket::Rsvp, profile_id, &visitor.ip_hash);
    if !limiter.check_and_record(&key, config.limits.rsvp_per_hour, HOUR) {
        return api_error_json(&ApiError::RateLimited);
    }

    let backend = Arc::clone(backend.inner());
    let id = profile_id.to_string();
    match blocking(move || backend.submit_rsvp(&id, &form)).await {
        Ok(()) => (Status::Ok, Json(json!({"success": true}))),
        Err(e) => api_error_json(&e),
    }
}

#[post("/i/<profile_id>/wishes", format = "json", data = "<form>")]
pub async fn wishes(
    profile_id: &str,
    form: Json<WishForm>,
    visitor: VisitorInfo,
    backend: &State<Arc<dyn InvitationBackend>>,
    limiter: &State<Arc<RateLimiter>>,
    config: &State<AppConfig>,
) -> (Status, Json<Value>) {
    let form = form.into_inner();
    let errors = form.validate();
    if !errors.is_empty() {
        return field_errors_json(&errors);
    }

    let key = rate_limit::key(Bucket::Wishes, profile_id, &visitor.ip_hash);
    if !limiter.check_and_record(&key, config.limits.wishes_per_hour, HOUR) {
        return api_error_json(&ApiError::RateLimited);
    }

    let backend = Arc::clone(backend.inner());
    let id = profile_id.to_string();
    match blocking(move || backend.submit_wish(&id, &form)).await {
        Ok(()) => (Status::Ok, Json(json!({"success": true}))),
        Err(e) => api_error_json(&e),
    }
}

/// Reactions are queued and acknowledged straight away.
#[post("/i/<profile_id>/events/<event_id>/reactions", format = "json", data = "<form>")]
pub fn reaction(
    profile_id: &str,
    event_id: &str,
    form: Json<ReactionForm>,
    notifier: &State<Notifier>,
) -> (Status, Json<Value>) {
    let form = form.into_inner();
    if !form.is_allowed() {
        return api_error_json(&ApiError::InvalidRequest(format!(
            "unsupported reaction {}",
            form.emoji
        )));
    }

    notifier.enqueue(Notification::Reaction {
        profile_id: profile_id.to_string(),
        event_id: event_id.to_string(),
        form,
    });
    (Status::Accepted, Json(json!({"success": true})))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![invitation, event_page, rsvp, wishes, reaction]
}
