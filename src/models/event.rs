use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::models::media::MediaItem;

/// The ceremonies an invitation can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Engagement,
    Haldi,
    Mehendi,
    Marriage,
    Reception,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Engagement,
        EventType::Haldi,
        EventType::Mehendi,
        EventType::Marriage,
        EventType::Reception,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Engagement => "engagement",
            Self::Haldi => "haldi",
            Self::Mehendi => "mehendi",
            Self::Marriage => "marriage",
            Self::Reception => "reception",
        }
    }

    /// Content fields that mean something for this ceremony, in display order.
    pub fn content_fields(&self) -> &'static [ContentField] {
        use ContentField::*;
        match self {
            Self::Engagement => &[CoupleNames, VenueDetails],
            Self::Haldi => &[BrideName, GroomName, CeremonyTime, DressCode],
            Self::Mehendi => &[BrideName, MehendiTime, VenueDetails],
            Self::Marriage => &[
                BrideFullName,
                GroomFullName,
                BrideParents,
                GroomParents,
                MuhuratTime,
                Rituals,
                DressCode,
            ],
            Self::Reception => &[CoupleNames, ReceptionTime, VenueDetails, DressCode],
        }
    }

    pub fn accepts_field(&self, key: &str) -> bool {
        self.content_fields().iter().any(|f| f.key() == key)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "engagement" => Ok(Self::Engagement),
            "haldi" => Ok(Self::Haldi),
            "mehendi" => Ok(Self::Mehendi),
            "marriage" => Ok(Self::Marriage),
            "reception" => Ok(Self::Reception),
            other => Err(format!("unknown event type: {}", other)),
        }
    }
}

/// Every event-type-specific content key. The sparse content map of an
/// event is keyed by `ContentField::key()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentField {
    CoupleNames,
    VenueDetails,
    BrideName,
    GroomName,
    CeremonyTime,
    DressCode,
    MehendiTime,
    BrideFullName,
    GroomFullName,
    BrideParents,
    GroomParents,
    MuhuratTime,
    Rituals,
    ReceptionTime,
}

impl ContentField {
    pub fn key(&self) -> &'static str {
        match self {
            Self::CoupleNames => "couple_names",
            Self::VenueDetails => "venue_details",
            Self::BrideName => "bride_name",
            Self::GroomName => "groom_name",
            Self::CeremonyTime => "ceremony_time",
            Self::DressCode => "dress_code",
            Self::MehendiTime => "mehendi_time",
            Self::BrideFullName => "bride_full_name",
            Self::GroomFullName => "groom_full_name",
            Self::BrideParents => "bride_parents",
            Self::GroomParents => "groom_parents",
            Self::MuhuratTime => "muhurat_time",
            Self::Rituals => "rituals",
            Self::ReceptionTime => "reception_time",
        }
    }
}

/// Per-event decoration switches set by the admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationToggles {
    pub lord: bool,
    pub bells: bool,
    pub lamps: bool,
    pub flowers: bool,
}

impl Default for DecorationToggles {
    fn default() -> Self {
        DecorationToggles {
            lord: false,
            bells: false,
            lamps: false,
            flowers: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub event_type: EventType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub venue_name: String,
    #[serde(default)]
    pub venue_address: String,
    #[serde(default)]
    pub map_link: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub design_id: Option<String>,
    #[serde(default)]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub decorations: DecorationToggles,
    #[serde(default)]
    pub content: BTreeMap<String, String>,
    #[serde(default)]
    pub gallery: Vec<MediaItem>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub music_url: Option<String>,
    #[serde(default = "default_true")]
    pub wishes_enabled: bool,
    #[serde(default = "default_true")]
    pub reactions_enabled: bool,
    #[serde(default = "default_true")]
    pub countdown_enabled: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub order: u32,
}

fn default_true() -> bool {
    true
}

impl Event {
    /// A fresh event with the defaults an admin starts from.
    pub fn new(event_id: String, event_type: EventType, order: u32) -> Self {
        Event {
            event_id,
            event_type,
            name: String::new(),
            date: None,
            start_time: None,
            end_time: None,
            venue_name: String::new(),
            venue_address: String::new(),
            map_link: None,
            description: String::new(),
            design_id: None,
            theme_id: None,
            decorations: DecorationToggles::default(),
            content: BTreeMap::new(),
            gallery: Vec::new(),
            video_url: None,
            music_url: None,
            wishes_enabled: true,
            reactions_enabled: true,
            countdown_enabled: true,
            visible: true,
            order,
        }
    }
}
