use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rand::Rng;
use serde::Serialize;

use crate::api::ApiError;
use crate::event_content::{resolve_event, EventRenderPlan};
use crate::features::FeatureFlags;
use crate::i18n::{language_info, Translator, ENGLISH};
use crate::models::event::EventType;
use crate::models::media::{MediaItem, MediaKind};
use crate::models::profile::Profile;
use crate::themes::{animation_variants, can_use_theme, default_theme, theme_by_id, MotionPreset, Theme};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageOption {
    pub code: String,
    pub native_name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Countdown {
    pub event_name: String,
    pub date: NaiveDate,
    pub days: i64,
}

/// Which optional blocks of the page render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleSections {
    pub hero: bool,
    pub events: bool,
    pub gallery: bool,
    pub rsvp: bool,
    pub wishes: bool,
    pub countdown: bool,
    pub map: bool,
}

/// A profile resolved against its plan, language and the clock.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationPage<'a> {
    pub profile: &'a Profile,
    #[serde(skip)]
    pub translator: &'a Translator,
    pub site_name: String,
    pub theme: &'static Theme,
    pub motion: MotionPreset,
    pub glass: bool,
    pub sections: VisibleSections,
    pub events: Vec<EventRenderPlan<'a>>,
    pub gallery: Vec<&'a MediaItem>,
    pub hero_video: Option<&'a str>,
    pub music: Option<&'a str>,
    pub countdown: Option<Countdown>,
    pub watermark: bool,
    pub languages: Vec<LanguageOption>,
}

/// The language to render in: the requested one when the profile has it
/// enabled and the plan allows more than English, otherwise English.
pub fn pick_language(profile: &Profile, flags: &FeatureFlags, requested: Option<&str>) -> String {
    match requested {
        Some(code) if code == ENGLISH => ENGLISH.to_string(),
        Some(code) if flags.multi_language && profile.enabled_languages.iter().any(|l| l == code) => {
            code.to_string()
        }
        _ => ENGLISH.to_string(),
    }
}

/// Profile theme when the plan covers it, the default otherwise.
pub fn page_theme(profile: &Profile) -> &'static Theme {
    profile
        .theme_id
        .as_deref()
        .filter(|id| can_use_theme(id, profile.plan_type))
        .map(theme_by_id)
        .unwrap_or_else(default_theme)
}

pub fn compose_page<'a, R: Rng>(
    profile: &'a Profile,
    flags: &FeatureFlags,
    translator: &'a Translator,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<InvitationPage<'a>, ApiError> {
    compose(profile, flags, translator, None, now, rng)
}

/// Like `compose_page`, restricted to the events of one ceremony.
pub fn compose_event_page<'a, R: Rng>(
    profile: &'a Profile,
    flags: &FeatureFlags,
    translator: &'a Translator,
    event_type: EventType,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<InvitationPage<'a>, ApiError> {
    compose(profile, flags, translator, Some(event_type), now, rng)
}

fn compose<'a, R: Rng>(
    profile: &'a Profile,
    flags: &FeatureFlags,
    translator: &'a Translator,
    only: Option<EventType>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<InvitationPage<'a>, ApiError> {
    if profile.is_deleted {
        return Err(ApiError::NotFound);
    }
    // The API should answer 410 itself; a stale record is still refused here.
    if profile.is_expired_at(now) {
        return Err(ApiError::Expired);
    }

    let theme = page_theme(profile);
    let enabled = &profile.sections;

    let events: Vec<EventRenderPlan<'a>> = profile
        .visible_events()
        .into_iter()
        .filter(|e| only.map(|t| e.event_type == t).unwrap_or(true))
        .map(|e| resolve_event(e, profile, flags, rng))
        .collect();

    let mut gallery: Vec<&MediaItem> = profile
        .media
        .iter()
        .filter(|m| m.kind == MediaKind::Image)
        .collect();
    gallery.sort_by_key(|m| m.order);
    gallery.truncate(flags.gallery_cap(gallery.len()));

    let hero_video = first_of_kind(profile, MediaKind::Video).filter(|_| flags.hero_video);
    let music = first_of_kind(profile, MediaKind::Audio)
        .or_else(|| events.iter().find_map(|plan| plan.music))
        .filter(|_| flags.background_music);

    let sections = VisibleSections {
        hero: enabled.hero,
        events: enabled.events && !events.is_empty(),
        gallery: enabled.gallery && !gallery.is_empty(),
        rsvp: enabled.rsvp && flags.rsvp,
        wishes: enabled.wishes && flags.guest_wishes,
        countdown: enabled.countdown && flags.countdown,
        map: enabled.map,
    };

    let countdown = if sections.countdown {
        next_countdown(&events, &profile.timezone, now)
    } else {
        None
    };

    Ok(InvitationPage {
        profile,
        translator,
        site_name: String::new(),
        theme,
        motion: animation_variants(theme.animation),
        glass: theme.glass_effect,
        sections,
        events,
        gallery,
        hero_video,
        music,
        countdown,
        watermark: flags.requires_watermark,
        languages: language_options(profile, flags, &translator.lang),
    })
}

fn first_of_kind(profile: &Profile, kind: MediaKind) -> Option<&str> {
    profile
        .media
        .iter()
        .filter(|m| m.kind == kind)
        .min_by_key(|m| m.order)
        .map(|m| m.url.as_str())
}

/// Days until the earliest upcoming event, counted in the couple's timezone.
fn next_countdown(events: &[EventRenderPlan<'_>], timezone: &str, now: DateTime<Utc>) -> Option<Countdown> {
    let tz: Tz = timezone.parse().unwrap_or(chrono_tz::Asia::Kolkata);
    let today = now.with_timezone(&tz).date_naive();

    events
        .iter()
        .filter(|plan| plan.show_countdown)
        .filter_map(|plan| plan.event.date.map(|d| (plan, d)))
        .filter(|(_, date)| *date >= today)
        .min_by_key(|(_, date)| *date)
        .map(|(plan, date)| Countdown {
            event_name: plan.event.name.clone(),
            date,
            days: (date - today).num_days(),
        })
}

fn language_options(profile: &Profile, flags: &FeatureFlags, active: &str) -> Vec<LanguageOption> {
    if !flags.multi_language {
        return Vec::new();
    }
    let mut codes: Vec<&str> = vec![ENGLISH];
    codes.extend(
        profile
            .enabled_languages
            .iter()
            .map(|c| c.as_str())
            .filter(|c| *c != ENGLISH),
    );
    if codes.len() < 2 {
        return Vec::new();
    }
    codes
        .into_iter()
        .filter_map(|code| {
            language_info(code).map(|info| LanguageOption {
                code: code.to_string(),
                native_name: info.native_name.to_string(),
                active: code == active,
            })
        })
        .collect()
}
