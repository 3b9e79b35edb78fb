use rand::Rng;
use serde::Serialize;

use crate::designs::decorations::{background_layers, expand_spec, BackgroundLayer, Placement};
use crate::designs::lords::{resolve_lord, Lord};
use crate::designs::{
    default_design_for_event, design_by_id, is_lord_allowed_for_event, is_lord_mandatory_for_event,
    Design,
};
use crate::features::FeatureFlags;
use crate::models::event::{ContentField, Event};
use crate::models::media::MediaItem;
use crate::models::profile::Profile;
use crate::themes::{can_use_theme, default_theme, theme_by_id, Theme};

const FLOWER_SIZE: u32 = 48;
const BELL_SIZE: u32 = 40;
const LAMP_SIZE: u32 = 36;

/// Which level of the profile supplied the design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignSource {
    Event,
    Profile,
    EventTypeDefault,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedField {
    pub field: ContentField,
    pub value: String,
}

/// Everything needed to draw one event card.
#[derive(Debug, Clone, Serialize)]
pub struct EventRenderPlan<'a> {
    pub event: &'a Event,
    pub design: Option<&'static Design>,
    pub design_source: DesignSource,
    pub theme: &'a Theme,
    pub background: Vec<BackgroundLayer>,
    pub lord: Option<&'static Lord>,
    pub flowers: Vec<Placement>,
    pub bells: Vec<Placement>,
    pub lamps: Vec<Placement>,
    pub content: Vec<ResolvedField>,
    pub gallery: Vec<&'a MediaItem>,
    pub hero_video: Option<&'a str>,
    pub music: Option<&'a str>,
    pub show_wishes: bool,
    pub show_reactions: bool,
    pub show_countdown: bool,
}

/// Event override, then the profile's design, then the ceremony's default.
/// A candidate that is not meant for this ceremony is passed over.
pub fn resolve_design(event: &Event, profile: &Profile) -> (Option<&'static Design>, DesignSource) {
    let candidates = [
        (event.design_id.as_deref(), DesignSource::Event),
        (profile.design_id.as_deref(), DesignSource::Profile),
    ];

    for (id, source) in candidates {
        let Some(id) = id else { continue };
        match design_by_id(id) {
            Some(design) if design.supports(event.event_type) => return (Some(design), source),
            Some(_) => log::debug!(
                "[designs] {} does not cover {}, skipping",
                id,
                event.event_type
            ),
            None => log::debug!("[designs] Unknown design {}, skipping", id),
        }
    }

    match default_design_for_event(event.event_type) {
        Some(design) => (Some(design), DesignSource::EventTypeDefault),
        None => (None, DesignSource::None),
    }
}

/// Event theme, then profile theme, then the default. Themes above the
/// profile's plan are passed over.
pub fn resolve_theme(event: &Event, profile: &Profile) -> &'static Theme {
    [event.theme_id.as_deref(), profile.theme_id.as_deref()]
        .into_iter()
        .flatten()
        .find(|id| can_use_theme(id, profile.plan_type))
        .map(theme_by_id)
        .unwrap_or_else(default_theme)
}

/// Lord artwork shows only when the ceremony allows it, the design allows it,
/// and either the admin switched it on or the ceremony requires it.
pub fn lord_visible(event: &Event, design: Option<&Design>) -> bool {
    let event_type = event.event_type;
    let design_allows = design.map(|d| d.lord_allowed).unwrap_or(true);
    let design_requires = design.map(|d| d.lord_mandatory).unwrap_or(false);
    is_lord_allowed_for_event(event_type)
        && design_allows
        && (event.decorations.lord || is_lord_mandatory_for_event(event_type) || design_requires)
}

/// Non-empty content for the fields this ceremony defines, in schema order.
/// Keys belonging to other ceremonies are dropped.
pub fn resolve_content(event: &Event) -> Vec<ResolvedField> {
    event
        .event_type
        .content_fields()
        .iter()
        .filter_map(|field| {
            let value = event.content.get(field.key())?.trim();
            if value.is_empty() {
                None
            } else {
                Some(ResolvedField {
                    field: *field,
                    value: value.to_string(),
                })
            }
        })
        .collect()
}

pub fn resolve_event<'a, R: Rng>(
    event: &'a Event,
    profile: &'a Profile,
    flags: &FeatureFlags,
    rng: &mut R,
) -> EventRenderPlan<'a> {
    let (design, design_source) = resolve_design(event, profile);
    let theme = resolve_theme(event, profile);

    let lord = if lord_visible(event, design) {
        Some(resolve_lord(profile.lord_id.as_deref()))
    } else {
        None
    };

    let toggles = &event.decorations;
    let (flowers, bells, lamps) = match design {
        Some(d) => (
            if toggles.flowers { expand_spec(&d.flowers, FLOWER_SIZE, rng) } else { Vec::new() },
            if toggles.bells { expand_spec(&d.bells, BELL_SIZE, rng) } else { Vec::new() },
            if toggles.lamps { expand_spec(&d.lamps, LAMP_SIZE, rng) } else { Vec::new() },
        ),
        None => (Vec::new(), Vec::new(), Vec::new()),
    };

    let mut gallery: Vec<&MediaItem> = event.gallery.iter().collect();
    gallery.sort_by_key(|m| m.order);
    gallery.truncate(flags.gallery_cap(gallery.len()));

    EventRenderPlan {
        event,
        design,
        design_source,
        theme,
        background: design.map(background_layers).unwrap_or_default(),
        lord,
        flowers,
        bells,
        lamps,
        content: resolve_content(event),
        gallery,
        hero_video: event.video_url.as_deref().filter(|_| flags.hero_video),
        music: event.music_url.as_deref().filter(|_| flags.background_music),
        show_wishes: event.wishes_enabled && flags.guest_wishes,
        show_reactions: event.reactions_enabled,
        show_countdown: event.countdown_enabled && flags.countdown,
    }
}
