use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::event::{Event, EventType};
use crate::models::media::{is_web_url, MediaItem};
use crate::models::plan::PlanTier;
use crate::models::{char_len, FieldError};

pub const MAX_EVENTS: usize = 7;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EVENT_NAME_LEN: usize = 80;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_CUSTOM_TEXT_LEN: usize = 500;

/// `{lang: {"section.key": text}}` overrides typed by the admin.
pub type CustomTexts = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Hero,
    Events,
    Gallery,
    Rsvp,
    Wishes,
    Countdown,
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsEnabled {
    pub hero: bool,
    pub events: bool,
    pub gallery: bool,
    pub rsvp: bool,
    pub wishes: bool,
    pub countdown: bool,
    pub map: bool,
}

impl Default for SectionsEnabled {
    fn default() -> Self {
        SectionsEnabled {
            hero: true,
            events: true,
            gallery: true,
            rsvp: true,
            wishes: true,
            countdown: true,
            map: true,
        }
    }
}

impl SectionsEnabled {
    pub fn is_enabled(&self, section: Section) -> bool {
        match section {
            Section::Hero => self.hero,
            Section::Events => self.events,
            Section::Gallery => self.gallery,
            Section::Rsvp => self.rsvp,
            Section::Wishes => self.wishes,
            Section::Countdown => self.countdown,
            Section::Map => self.map,
        }
    }

    pub fn set(&mut self, section: Section, enabled: bool) {
        let slot = match section {
            Section::Hero => &mut self.hero,
            Section::Events => &mut self.events,
            Section::Gallery => &mut self.gallery,
            Section::Rsvp => &mut self.rsvp,
            Section::Wishes => &mut self.wishes,
            Section::Countdown => &mut self.countdown,
            Section::Map => &mut self.map,
        };
        *slot = enabled;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub slug: String,
    pub bride_name: String,
    pub groom_name: String,
    pub event_type: EventType,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub design_id: Option<String>,
    #[serde(default)]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub lord_id: Option<String>,
    #[serde(default = "default_languages")]
    pub enabled_languages: Vec<String>,
    #[serde(default)]
    pub custom_texts: CustomTexts,
    #[serde(default)]
    pub sections: SectionsEnabled,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(default)]
    pub plan_type: PlanTier,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub is_deleted: bool,
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

impl Profile {
    /// An unsaved profile with nothing but the couple and the main ceremony.
    pub fn new(bride_name: &str, groom_name: &str, event_type: EventType) -> Self {
        Profile {
            id: None,
            slug: String::new(),
            bride_name: bride_name.to_string(),
            groom_name: groom_name.to_string(),
            event_type,
            event_date: None,
            venue: String::new(),
            design_id: None,
            theme_id: None,
            lord_id: None,
            enabled_languages: default_languages(),
            custom_texts: CustomTexts::new(),
            sections: SectionsEnabled::default(),
            events: Vec::new(),
            media: Vec::new(),
            plan_type: PlanTier::Free,
            expires_at: None,
            timezone: default_timezone(),
            is_deleted: false,
        }
    }

    /// Visible events in display order.
    pub fn visible_events(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().filter(|e| e.visible).collect();
        events.sort_by_key(|e| e.order);
        events
    }

    pub fn visible_count(&self) -> usize {
        self.events.iter().filter(|e| e.visible).count()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }

    /// `order` values form exactly `0..n`.
    pub fn has_dense_order(&self) -> bool {
        let mut orders: Vec<u32> = self.events.iter().map(|e| e.order).collect();
        orders.sort_unstable();
        orders.iter().enumerate().all(|(i, o)| *o as usize == i)
    }

    /// Renumber `order` to `0..n`, keeping the current relative order.
    pub fn normalize_order(&mut self) {
        self.events.sort_by_key(|e| e.order);
        for (i, event) in self.events.iter_mut().enumerate() {
            event.order = i as u32;
        }
    }

    pub fn couple_display(&self) -> String {
        format!("{} & {}", self.bride_name.trim(), self.groom_name.trim())
    }

    /// Everything that must hold before a save request is sent.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for (field, value) in [("bride_name", &self.bride_name), ("groom_name", &self.groom_name)] {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, "Name is required"));
            } else if char_len(value) > MAX_NAME_LEN {
                errors.push(FieldError::new(
                    field,
                    format!("Name must be at most {} characters", MAX_NAME_LEN),
                ));
            }
        }

        if !self.enabled_languages.iter().any(|l| l == "en") {
            errors.push(FieldError::new("enabled_languages", "English must stay enabled"));
        }

        if self.events.len() > MAX_EVENTS {
            errors.push(FieldError::new(
                "events",
                format!("A profile can have at most {} events", MAX_EVENTS),
            ));
        }
        if self.visible_count() == 0 {
            errors.push(FieldError::new("events", "At least one event must be visible"));
        }
        if !self.has_dense_order() {
            errors.push(FieldError::new("events", "Event order must run from 0 without gaps"));
        }

        for (i, event) in self.events.iter().enumerate() {
            let prefix = format!("events[{}]", i);
            if event.name.trim().is_empty() {
                errors.push(FieldError::new(format!("{}.name", prefix), "Event name is required"));
            } else if char_len(&event.name) > MAX_EVENT_NAME_LEN {
                errors.push(FieldError::new(
                    format!("{}.name", prefix),
                    format!("Event name must be at most {} characters", MAX_EVENT_NAME_LEN),
                ));
            }
            if event.date.is_none() {
                errors.push(FieldError::new(format!("{}.date", prefix), "Event date is required"));
            }
            if char_len(&event.description) > MAX_DESCRIPTION_LEN {
                errors.push(FieldError::new(
                    format!("{}.description", prefix),
                    format!("Description must be at most {} characters", MAX_DESCRIPTION_LEN),
                ));
            }
            for (field, link) in [
                ("map_link", &event.map_link),
                ("video_url", &event.video_url),
                ("music_url", &event.music_url),
            ] {
                if link.as_deref().is_some_and(|l| !is_web_url(l)) {
                    errors.push(FieldError::new(
                        format!("{}.{}", prefix, field),
                        "Link must start with http:// or https://",
                    ));
                }
            }
        }

        for (i, item) in self.media.iter().enumerate() {
            if !is_web_url(&item.url) {
                errors.push(FieldError::new(
                    format!("media[{}].url", i),
                    "Link must start with http:// or https://",
                ));
            }
        }

        for (lang, texts) in &self.custom_texts {
            for (key, text) in texts {
                if char_len(text) > MAX_CUSTOM_TEXT_LEN {
                    errors.push(FieldError::new(
                        format!("custom_texts.{}.{}", lang, key),
                        format!("Custom text must be at most {} characters", MAX_CUSTOM_TEXT_LEN),
                    ));
                }
            }
        }

        errors
    }
}
