use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, InvitationBackend};
use crate::designs::lords::lord_by_id;
use crate::designs::{design_by_id, is_lord_allowed_for_event, is_lord_mandatory_for_event};
use crate::features::{compute_feature_flags, Feature, FeatureFlags};
use crate::i18n::{is_supported, ENGLISH};
use crate::models::event::{Event, EventType};
use crate::models::media::{is_web_url, MediaItem, MediaKind};
use crate::models::plan::PlanTier;
use crate::models::profile::{
    Profile, Section, MAX_CUSTOM_TEXT_LEN, MAX_DESCRIPTION_LEN, MAX_EVENTS, MAX_EVENT_NAME_LEN,
    MAX_NAME_LEN,
};
use crate::models::{char_len, FieldError};
use crate::themes::{can_use_theme, find_theme};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error("at least one event must stay visible")]
    LastVisibleEvent,
    #[error("a profile can have at most {} events", MAX_EVENTS)]
    TooManyEvents,
    #[error("no event with id {0}")]
    UnknownEvent(String),
    #[error("no media item with id {0}")]
    UnknownMedia(String),
    #[error("cannot move to position {to} of {len}")]
    InvalidMove { to: usize, len: usize },
    #[error("unknown design: {0}")]
    UnknownDesign(String),
    #[error("design {design} is not meant for {event_type}")]
    DesignNotForEvent { design: String, event_type: EventType },
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("theme {theme} needs the {required} plan")]
    ThemeLocked { theme: String, required: PlanTier },
    #[error("unknown deity: {0}")]
    UnknownLord(String),
    #[error("{} is not included in this plan", .0.name())]
    FeatureLocked(Feature),
    #[error("gallery is full ({0} items)")]
    GalleryFull(u32),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
    #[error("{field} is required")]
    Required { field: String },
    #[error("{field} must be an http or https link")]
    UnsafeLink { field: String },
    #[error("{key} is not a field of {event_type}")]
    FieldNotInSchema { key: String, event_type: EventType },
    #[error("deity artwork is required for {0}")]
    LordMandatory(EventType),
    #[error("deity artwork is not used for {0}")]
    LordProhibited(EventType),
    #[error("English cannot be disabled")]
    EnglishRequired,
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("profile has {} validation error(s)", .0.len())]
    Invalid(Vec<FieldError>),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    Lord,
    Bells,
    Lamps,
    Flowers,
}

/// The plain fields of an event card, replaced together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDetails {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub venue_name: String,
    pub venue_address: String,
    pub map_link: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementToggles {
    pub wishes: bool,
    pub reactions: bool,
    pub countdown: bool,
}

/// One editor operation, as sent by the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditorAction {
    SetNames { bride_name: String, groom_name: String },
    SetEventType { event_type: EventType },
    SetEventDate { date: Option<NaiveDate> },
    SetVenue { venue: String },
    SetDesign { design_id: Option<String> },
    SetTheme { theme_id: Option<String> },
    SetLord { lord_id: Option<String> },
    RegenerateSlug,

    AddEvent { event_type: EventType },
    RemoveEvent { event_id: String },
    MoveEvent { event_id: String, to: usize },
    SetEventVisibility { event_id: String, visible: bool },
    UpdateEventDetails { event_id: String, details: EventDetails },
    SetEventContent { event_id: String, key: String, value: String },
    SetEventDesign { event_id: String, design_id: Option<String> },
    SetEventTheme { event_id: String, theme_id: Option<String> },
    SetDecoration { event_id: String, decoration: DecorationKind, enabled: bool },
    SetEngagement { event_id: String, toggles: EngagementToggles },
    SetEventAttachments { event_id: String, video_url: Option<String>, music_url: Option<String> },

    AddMedia { item: MediaItem },
    RemoveMedia { media_id: String },
    MoveMedia { media_id: String, to: usize },

    EnableLanguage { code: String },
    DisableLanguage { code: String },
    SetCustomText { lang: String, key: String, text: String },
    ClearCustomText { lang: String, key: String },
    SetSection { section: Section, enabled: bool },
}

/// The admin's working copy of a profile. Every update is all-or-nothing:
/// on error the draft is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub draft: Profile,
    #[serde(default)]
    pub dirty: bool,
}

impl EditorState {
    pub fn new(profile: Profile) -> Self {
        EditorState {
            draft: profile,
            dirty: false,
        }
    }

    /// A new profile with one visible event of the primary ceremony.
    pub fn blank(bride_name: &str, groom_name: &str, event_type: EventType) -> Self {
        let mut state = EditorState::new(Profile::new(bride_name, groom_name, event_type));
        state.draft.events.push(default_event(event_type, 0));
        state.draft.slug = couple_slug(&state.draft);
        state.dirty = true;
        state
    }

    pub fn flags(&self) -> FeatureFlags {
        compute_feature_flags(self.draft.plan_type)
    }

    /// Run `f` on a copy of the draft and keep the copy only if it succeeds.
    fn update<T, F>(&mut self, f: F) -> Result<T, EditorError>
    where
        F: FnOnce(&mut Profile, &FeatureFlags) -> Result<T, EditorError>,
    {
        let flags = self.flags();
        let mut next = self.draft.clone();
        let out = f(&mut next, &flags)?;
        self.draft = next;
        self.dirty = true;
        Ok(out)
    }

    pub fn apply(&mut self, action: EditorAction) -> Result<(), EditorError> {
        match action {
            EditorAction::SetNames { bride_name, groom_name } => self.set_names(&bride_name, &groom_name),
            EditorAction::SetEventType { event_type } => self.set_event_type(event_type),
            EditorAction::SetEventDate { date } => self.set_event_date(date),
            EditorAction::SetVenue { venue } => self.set_venue(&venue),
            EditorAction::SetDesign { design_id } => self.set_design(design_id),
            EditorAction::SetTheme { theme_id } => self.set_theme(theme_id),
            EditorAction::SetLord { lord_id } => self.set_lord(lord_id),
            EditorAction::RegenerateSlug => self.regenerate_slug(),
            EditorAction::AddEvent { event_type } => self.add_event(event_type).map(|_| ()),
            EditorAction::RemoveEvent { event_id } => self.remove_event(&event_id),
            EditorAction::MoveEvent { event_id, to } => self.move_event(&event_id, to),
            EditorAction::SetEventVisibility { event_id, visible } => {
                self.set_event_visibility(&event_id, visible)
            }
            EditorAction::UpdateEventDetails { event_id, details } => {
                self.update_event_details(&event_id, details)
            }
            EditorAction::SetEventContent { event_id, key, value } => {
                self.set_event_content(&event_id, &key, &value)
            }
            EditorAction::SetEventDesign { event_id, design_id } => self.set_event_design(&event_id, design_id),
            EditorAction::SetEventTheme { event_id, theme_id } => self.set_event_theme(&event_id, theme_id),
            EditorAction::SetDecoration { event_id, decoration, enabled } => {
                self.set_decoration(&event_id, decoration, enabled)
            }
            EditorAction::SetEngagement { event_id, toggles } => self.set_engagement(&event_id, toggles),
            EditorAction::SetEventAttachments { event_id, video_url, music_url } => {
                self.set_event_attachments(&event_id, video_url, music_url)
            }
            EditorAction::AddMedia { item } => self.add_media(item),
            EditorAction::RemoveMedia { media_id } => self.remove_media(&media_id),
            EditorAction::MoveMedia { media_id, to } => self.move_media(&media_id, to),
            EditorAction::EnableLanguage { code } => self.enable_language(&code),
            EditorAction::DisableLanguage { code } => self.disable_language(&code),
            EditorAction::SetCustomText { lang, key, text } => self.set_custom_text(&lang, &key, &text),
            EditorAction::ClearCustomText { lang, key } => self.clear_custom_text(&lang, &key),
            EditorAction::SetSection { section, enabled } => self.set_section(section, enabled),
        }
    }

    // ── Basic info ────────────────────────────────────

    pub fn set_names(&mut self, bride_name: &str, groom_name: &str) -> Result<(), EditorError> {
        self.update(|p, _| {
            p.bride_name = checked_name("bride_name", bride_name)?;
            p.groom_name = checked_name("groom_name", groom_name)?;
            Ok(())
        })
    }

    pub fn set_event_type(&mut self, event_type: EventType) -> Result<(), EditorError> {
        self.update(|p, _| {
            p.event_type = event_type;
            Ok(())
        })
    }

    pub fn set_event_date(&mut self, date: Option<NaiveDate>) -> Result<(), EditorError> {
        self.update(|p, _| {
            p.event_date = date;
            Ok(())
        })
    }

    pub fn set_venue(&mut self, venue: &str) -> Result<(), EditorError> {
        self.update(|p, _| {
            p.venue = venue.trim().to_string();
            Ok(())
        })
    }

    pub fn set_design(&mut self, design_id: Option<String>) -> Result<(), EditorError> {
        self.update(|p, _| {
            if let Some(id) = &design_id {
                design_by_id(id).ok_or_else(|| EditorError::UnknownDesign(id.clone()))?;
            }
            p.design_id = design_id;
            Ok(())
        })
    }

    pub fn set_theme(&mut self, theme_id: Option<String>) -> Result<(), EditorError> {
        self.update(|p, _| {
            if let Some(id) = &theme_id {
                check_theme(id, p.plan_type)?;
            }
            p.theme_id = theme_id;
            Ok(())
        })
    }

    pub fn set_lord(&mut self, lord_id: Option<String>) -> Result<(), EditorError> {
        self.update(|p, _| {
            if let Some(id) = &lord_id {
                lord_by_id(id).ok_or_else(|| EditorError::UnknownLord(id.clone()))?;
            }
            p.lord_id = lord_id;
            Ok(())
        })
    }

    pub fn regenerate_slug(&mut self) -> Result<(), EditorError> {
        self.update(|p, _| {
            p.slug = couple_slug(p);
            Ok(())
        })
    }

    // ── Events ────────────────────────────────────────

    /// Append an event of `event_type` and return its new id.
    pub fn add_event(&mut self, event_type: EventType) -> Result<String, EditorError> {
        self.update(|p, _| {
            if p.events.len() >= MAX_EVENTS {
                return Err(EditorError::TooManyEvents);
            }
            let event = default_event(event_type, p.events.len() as u32);
            let id = event.event_id.clone();
            p.events.push(event);
            p.normalize_order();
            Ok(id)
        })
    }

    /// Refused when it would leave no visible event; nothing is sent anywhere.
    pub fn remove_event(&mut self, event_id: &str) -> Result<(), EditorError> {
        self.update(|p, _| {
            let idx = event_index(p, event_id)?;
            if p.events[idx].visible && p.visible_count() <= 1 {
                return Err(EditorError::LastVisibleEvent);
            }
            p.events.remove(idx);
            p.normalize_order();
            Ok(())
        })
    }

    pub fn move_event(&mut self, event_id: &str, to: usize) -> Result<(), EditorError> {
        self.update(|p, _| {
            p.normalize_order();
            let from = event_index(p, event_id)?;
            let len = p.events.len();
            if to >= len {
                return Err(EditorError::InvalidMove { to, len });
            }
            let event = p.events.remove(from);
            p.events.insert(to, event);
            for (i, event) in p.events.iter_mut().enumerate() {
                event.order = i as u32;
            }
            Ok(())
        })
    }

    pub fn set_event_visibility(&mut self, event_id: &str, visible: bool) -> Result<(), EditorError> {
        self.update(|p, _| {
            let idx = event_index(p, event_id)?;
            if !visible && p.events[idx].visible && p.visible_count() <= 1 {
                return Err(EditorError::LastVisibleEvent);
            }
            p.events[idx].visible = visible;
            Ok(())
        })
    }

    pub fn update_event_details(&mut self, event_id: &str, details: EventDetails) -> Result<(), EditorError> {
        self.update(|p, _| {
            let idx = event_index(p, event_id)?;
            if details.name.trim().is_empty() {
                return Err(EditorError::Required { field: "name".into() });
            }
            check_len("name", &details.name, MAX_EVENT_NAME_LEN)?;
            check_len("description", &details.description, MAX_DESCRIPTION_LEN)?;
            let map_link = details.map_link.filter(|l| !l.trim().is_empty());
            check_link("map_link", map_link.as_deref())?;

            let event = &mut p.events[idx];
            event.name = details.name.trim().to_string();
            event.date = details.date;
            event.start_time = details.start_time;
            event.end_time = details.end_time;
            event.venue_name = details.venue_name;
            event.venue_address = details.venue_address;
            event.map_link = map_link.map(|l| l.trim().to_string());
            event.description = details.description;
            Ok(())
        })
    }

    /// Set one ceremony-specific field. An empty value clears it.
    pub fn set_event_content(&mut self, event_id: &str, key: &str, value: &str) -> Result<(), EditorError> {
        self.update(|p, _| {
            let idx = event_index(p, event_id)?;
            let event = &mut p.events[idx];
            if !event.event_type.accepts_field(key) {
                return Err(EditorError::FieldNotInSchema {
                    key: key.to_string(),
                    event_type: event.event_type,
                });
            }
            check_len(key, value, MAX_CUSTOM_TEXT_LEN)?;
            if value.trim().is_empty() {
                event.content.remove(key);
            } else {
                event.content.insert(key.to_string(), value.trim().to_string());
            }
            Ok(())
        })
    }

    pub fn set_event_design(&mut self, event_id: &str, design_id: Option<String>) -> Result<(), EditorError> {
        self.update(|p, _| {
            let idx = event_index(p, event_id)?;
            let event_type = p.events[idx].event_type;
            if let Some(id) = &design_id {
                let design = design_by_id(id).ok_or_else(|| EditorError::UnknownDesign(id.clone()))?;
                if !design.supports(event_type) {
                    return Err(EditorError::DesignNotForEvent {
                        design: id.clone(),
                        event_type,
                    });
                }
            }
            p.events[idx].design_id = design_id;
            Ok(())
        })
    }

    pub fn set_event_theme(&mut self, event_id: &str, theme_id: Option<String>) -> Result<(), EditorError> {
        self.update(|p, _| {
            let idx = event_index(p, event_id)?;
            if let Some(id) = &theme_id {
                check_theme(id, p.plan_type)?;
            }
            p.events[idx].theme_id = theme_id;
            Ok(())
        })
    }

    pub fn set_decoration(
        &mut self,
        event_id: &str,
        decoration: DecorationKind,
        enabled: bool,
    ) -> Result<(), EditorError> {
        self.update(|p, _| {
            let idx = event_index(p, event_id)?;
            let event = &mut p.events[idx];
            let toggles = &mut event.decorations;
            match decoration {
                DecorationKind::Lord => {
                    if is_lord_mandatory_for_event(event.event_type) && !enabled {
                        return Err(EditorError::LordMandatory(event.event_type));
                    }
                    if !is_lord_allowed_for_event(event.event_type) && enabled {
                        return Err(EditorError::LordProhibited(event.event_type));
                    }
                    toggles.lord = enabled;
                }
                DecorationKind::Bells => toggles.bells = enabled,
                DecorationKind::Lamps => toggles.lamps = enabled,
                DecorationKind::Flowers => toggles.flowers = enabled,
            }
            Ok(())
        })
    }

    pub fn set_engagement(&mut self, event_id: &str, toggles: EngagementToggles) -> Result<(), EditorError> {
        self.update(|p, flags| {
            let idx = event_index(p, event_id)?;
            if toggles.wishes && !flags.guest_wishes {
                return Err(EditorError::FeatureLocked(Feature::GuestWishes));
            }
            let event = &mut p.events[idx];
            event.wishes_enabled = toggles.wishes;
            event.reactions_enabled = toggles.reactions;
            event.countdown_enabled = toggles.countdown;
            Ok(())
        })
    }

    pub fn set_event_attachments(
        &mut self,
        event_id: &str,
        video_url: Option<String>,
        music_url: Option<String>,
    ) -> Result<(), EditorError> {
        self.update(|p, flags| {
            let idx = event_index(p, event_id)?;
            if video_url.is_some() && !flags.hero_video {
                return Err(EditorError::FeatureLocked(Feature::HeroVideo));
            }
            if music_url.is_some() && !flags.background_music {
                return Err(EditorError::FeatureLocked(Feature::BackgroundMusic));
            }
            check_link("video_url", video_url.as_deref())?;
            check_link("music_url", music_url.as_deref())?;
            let event = &mut p.events[idx];
            event.video_url = video_url;
            event.music_url = music_url;
            Ok(())
        })
    }

    // ── Media ─────────────────────────────────────────

    pub fn add_media(&mut self, item: MediaItem) -> Result<(), EditorError> {
        self.update(|p, flags| {
            check_link("url", Some(&item.url))?;
            match item.kind {
                MediaKind::Image => {
                    if !flags.gallery_limited && !flags.gallery_unlimited {
                        return Err(EditorError::FeatureLocked(Feature::GalleryLimited));
                    }
                    let images = p.media.iter().filter(|m| m.kind == MediaKind::Image).count();
                    if let Some(max) = flags.max_gallery_images {
                        if images >= max as usize {
                            return Err(EditorError::GalleryFull(max));
                        }
                    }
                }
                MediaKind::Video if !flags.hero_video => {
                    return Err(EditorError::FeatureLocked(Feature::HeroVideo));
                }
                MediaKind::Audio if !flags.background_music => {
                    return Err(EditorError::FeatureLocked(Feature::BackgroundMusic));
                }
                _ => {}
            }
            let mut item = item;
            item.order = p.media.len() as u32;
            p.media.push(item);
            Ok(())
        })
    }

    pub fn remove_media(&mut self, media_id: &str) -> Result<(), EditorError> {
        self.update(|p, _| {
            let idx = media_index(p, media_id)?;
            p.media.remove(idx);
            renumber_media(&mut p.media);
            Ok(())
        })
    }

    pub fn move_media(&mut self, media_id: &str, to: usize) -> Result<(), EditorError> {
        self.update(|p, _| {
            p.media.sort_by_key(|m| m.order);
            let from = media_index(p, media_id)?;
            let len = p.media.len();
            if to >= len {
                return Err(EditorError::InvalidMove { to, len });
            }
            let item = p.media.remove(from);
            p.media.insert(to, item);
            renumber_media(&mut p.media);
            Ok(())
        })
    }

    // ── Settings ──────────────────────────────────────

    pub fn enable_language(&mut self, code: &str) -> Result<(), EditorError> {
        self.update(|p, flags| {
            if !is_supported(code) {
                return Err(EditorError::UnsupportedLanguage(code.to_string()));
            }
            if code != ENGLISH && !flags.multi_language {
                return Err(EditorError::FeatureLocked(Feature::MultiLanguage));
            }
            if !p.enabled_languages.iter().any(|l| l == code) {
                p.enabled_languages.push(code.to_string());
            }
            Ok(())
        })
    }

    pub fn disable_language(&mut self, code: &str) -> Result<(), EditorError> {
        self.update(|p, _| {
            if code == ENGLISH {
                return Err(EditorError::EnglishRequired);
            }
            p.enabled_languages.retain(|l| l != code);
            Ok(())
        })
    }

    /// Override one `section.key` for one language. Empty text clears it.
    pub fn set_custom_text(&mut self, lang: &str, key: &str, text: &str) -> Result<(), EditorError> {
        if text.trim().is_empty() {
            return self.clear_custom_text(lang, key);
        }
        self.update(|p, flags| {
            if !flags.custom_texts {
                return Err(EditorError::FeatureLocked(Feature::CustomTexts));
            }
            if !p.enabled_languages.iter().any(|l| l == lang) {
                return Err(EditorError::UnsupportedLanguage(lang.to_string()));
            }
            check_len(key, text, MAX_CUSTOM_TEXT_LEN)?;
            p.custom_texts
                .entry(lang.to_string())
                .or_default()
                .insert(key.to_string(), text.to_string());
            Ok(())
        })
    }

    pub fn clear_custom_text(&mut self, lang: &str, key: &str) -> Result<(), EditorError> {
        self.update(|p, _| {
            if let Some(texts) = p.custom_texts.get_mut(lang) {
                texts.remove(key);
                if texts.is_empty() {
                    p.custom_texts.remove(lang);
                }
            }
            Ok(())
        })
    }

    pub fn set_section(&mut self, section: Section, enabled: bool) -> Result<(), EditorError> {
        self.update(|p, _| {
            p.sections.set(section, enabled);
            Ok(())
        })
    }

    // ── Persistence ───────────────────────────────────

    /// Validate locally, then create or update through the API. Nothing is
    /// sent when validation fails.
    pub fn save(
        &mut self,
        backend: &dyn InvitationBackend,
        token: Option<&str>,
    ) -> Result<&Profile, EditorError> {
        let errors = self.draft.validate();
        if !errors.is_empty() {
            return Err(EditorError::Invalid(errors));
        }

        let saved = match self.draft.id.as_deref() {
            Some(id) => backend.update_profile(id, &self.draft, token)?,
            None => backend.create_profile(&self.draft, token)?,
        };
        log::info!(
            "[editor] Saved profile {}",
            saved.id.as_deref().unwrap_or("(unassigned)")
        );
        self.draft = saved;
        self.dirty = false;
        Ok(&self.draft)
    }
}

/// A new event with the ceremony's defaults; lord artwork starts on where
/// the ceremony requires it.
pub fn default_event(event_type: EventType, order: u32) -> Event {
    let mut event = Event::new(uuid::Uuid::new_v4().to_string(), event_type, order);
    event.name = default_event_name(event_type).to_string();
    event.decorations.lord = is_lord_mandatory_for_event(event_type);
    if event_type == EventType::Marriage {
        event.decorations.bells = true;
        event.decorations.lamps = true;
    }
    if event_type == EventType::Haldi {
        event.decorations.lamps = true;
    }
    event
}

fn default_event_name(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Engagement => "Engagement",
        EventType::Haldi => "Haldi Ceremony",
        EventType::Mehendi => "Mehendi Night",
        EventType::Marriage => "Wedding Ceremony",
        EventType::Reception => "Reception",
    }
}

fn couple_slug(profile: &Profile) -> String {
    slug::slugify(format!("{} weds {}", profile.bride_name, profile.groom_name))
}

fn checked_name(field: &str, value: &str) -> Result<String, EditorError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EditorError::Required { field: field.to_string() });
    }
    check_len(field, value, MAX_NAME_LEN)?;
    Ok(value.to_string())
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), EditorError> {
    if char_len(value) > max {
        return Err(EditorError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn check_link(field: &str, link: Option<&str>) -> Result<(), EditorError> {
    match link {
        Some(l) if !is_web_url(l) => Err(EditorError::UnsafeLink {
            field: field.to_string(),
        }),
        _ => Ok(()),
    }
}

fn check_theme(id: &str, plan: PlanTier) -> Result<(), EditorError> {
    let theme = find_theme(id).ok_or_else(|| EditorError::UnknownTheme(id.to_string()))?;
    if !can_use_theme(id, plan) {
        return Err(EditorError::ThemeLocked {
            theme: id.to_string(),
            required: theme.plan,
        });
    }
    Ok(())
}

fn event_index(profile: &Profile, event_id: &str) -> Result<usize, EditorError> {
    profile
        .events
        .iter()
        .position(|e| e.event_id == event_id)
        .ok_or_else(|| EditorError::UnknownEvent(event_id.to_string()))
}

fn media_index(profile: &Profile, media_id: &str) -> Result<usize, EditorError> {
    profile
        .media
        .iter()
        .position(|m| m.id == media_id)
        .ok_or_else(|| EditorError::UnknownMedia(media_id.to_string()))
}

fn renumber_media(media: &mut [MediaItem]) {
    for (i, item) in media.iter_mut().enumerate() {
        item.order = i as u32;
    }
}
