pub mod decorations;
pub mod lords;

use serde::Serialize;

use crate::models::event::EventType;

// ── Types ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DesignColors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GradientBackground {
    pub base: &'static str,
    pub overlay: Option<&'static str>,
}

/// Repeating SVG pattern drawn over the gradient.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Texture {
    pub svg: &'static str,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DecorationSpec {
    pub enabled: bool,
    pub color: &'static str,
    /// Symbolic tokens, expanded by `decorations::expand_position`.
    pub positions: &'static [&'static str],
}

const NO_DECORATION: DecorationSpec = DecorationSpec {
    enabled: false,
    color: "",
    positions: &[],
};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HeroOpening {
    pub duration_ms: u32,
    pub show_flowers: bool,
    pub show_bells: bool,
    pub show_lamps: bool,
    pub show_lord: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LordPolicy {
    Prohibited,
    Optional,
    Mandatory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LordRule {
    pub allowed: bool,
    pub mandatory: bool,
}

impl LordRule {
    pub fn policy(&self) -> LordPolicy {
        match (self.allowed, self.mandatory) {
            (true, true) => LordPolicy::Mandatory,
            (true, false) => LordPolicy::Optional,
            _ => LordPolicy::Prohibited,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Design {
    pub id: &'static str,
    pub name: &'static str,
    pub event_types: &'static [EventType],
    pub colors: DesignColors,
    pub background: GradientBackground,
    pub texture: Option<Texture>,
    pub flowers: DecorationSpec,
    pub bells: DecorationSpec,
    pub lamps: DecorationSpec,
    pub lord_allowed: bool,
    pub lord_mandatory: bool,
    pub hero: HeroOpening,
}

impl Design {
    pub fn supports(&self, event_type: EventType) -> bool {
        self.event_types.contains(&event_type)
    }

    pub fn lord_policy(&self) -> LordPolicy {
        LordRule {
            allowed: self.lord_allowed,
            mandatory: self.lord_mandatory,
        }
        .policy()
    }
}

// ── Textures ──────────────────────────────────────────

const PAISLEY_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="80" height="80" viewBox="0 0 80 80"><path d="M40 10c12 0 20 10 20 22s-10 24-24 28c6-8 6-16 0-22s-16-4-16-14 8-14 20-14z" fill="none" stroke="#ffffff" stroke-width="1.2"/></svg>"##;
const MANDALA_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="96" height="96" viewBox="0 0 96 96"><g fill="none" stroke="#ffffff" stroke-width="1"><circle cx="48" cy="48" r="30"/><circle cx="48" cy="48" r="18"/><path d="M48 8v80M8 48h80M20 20l56 56M76 20L20 76"/></g></svg>"##;
const VINE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64"><path d="M0 32c16-16 32 16 64 0" fill="none" stroke="#ffffff" stroke-width="1.5"/><circle cx="16" cy="26" r="3" fill="#ffffff"/><circle cx="48" cy="36" r="3" fill="#ffffff"/></svg>"##;
const STAR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="60" height="60" viewBox="0 0 60 60"><path d="M30 6l4 12 12 4-12 4-4 12-4-12-12-4 12-4z" fill="#ffffff"/></svg>"##;

// ── Registry ──────────────────────────────────────────

pub static DESIGNS: [Design; 8] = [
    Design {
        id: "engagement-rose-gold",
        name: "Rose Gold Promise",
        event_types: &[EventType::Engagement],
        colors: DesignColors { primary: "#b76e79", secondary: "#f7e7ce", accent: "#d4a373" },
        background: GradientBackground {
            base: "linear-gradient(160deg, #fdf2f0 0%, #f7d9d4 55%, #e8b4b8 100%)",
            overlay: Some("radial-gradient(circle at 50% 0%, rgba(255,255,255,0.6) 0%, rgba(255,255,255,0) 60%)"),
        },
        texture: None,
        flowers: DecorationSpec { enabled: true, color: "#e8a0a8", positions: &["all-corners"] },
        bells: NO_DECORATION,
        lamps: NO_DECORATION,
        lord_allowed: true,
        lord_mandatory: false,
        hero: HeroOpening { duration_ms: 2200, show_flowers: true, show_bells: false, show_lamps: false, show_lord: true },
    },
    Design {
        id: "engagement-pastel-bloom",
        name: "Pastel Bloom",
        event_types: &[EventType::Engagement],
        colors: DesignColors { primary: "#8e7cc3", secondary: "#fef6ff", accent: "#f4a7b9" },
        background: GradientBackground {
            base: "linear-gradient(180deg, #fef6ff 0%, #e9e4f7 100%)",
            overlay: None,
        },
        texture: Some(Texture { svg: VINE_SVG, opacity: 0.12 }),
        flowers: DecorationSpec { enabled: true, color: "#f4a7b9", positions: &["scattered"] },
        bells: NO_DECORATION,
        lamps: NO_DECORATION,
        lord_allowed: true,
        lord_mandatory: false,
        hero: HeroOpening { duration_ms: 1800, show_flowers: true, show_bells: false, show_lamps: false, show_lord: false },
    },
    Design {
        id: "haldi-marigold-sunshine",
        name: "Marigold Sunshine",
        event_types: &[EventType::Haldi],
        colors: DesignColors { primary: "#e8a317", secondary: "#fff8dc", accent: "#f28c28" },
        background: GradientBackground {
            base: "linear-gradient(135deg, #fff3b0 0%, #ffd166 50%, #f8a531 100%)",
            overlay: Some("radial-gradient(circle at 80% 20%, rgba(255,255,255,0.5) 0%, rgba(255,255,255,0) 50%)"),
        },
        texture: Some(Texture { svg: PAISLEY_SVG, opacity: 0.15 }),
        flowers: DecorationSpec { enabled: true, color: "#f28c28", positions: &["top-left", "top-right", "scattered"] },
        bells: NO_DECORATION,
        lamps: DecorationSpec { enabled: true, color: "#ffb703", positions: &["bottom-left", "bottom-right"] },
        lord_allowed: true,
        lord_mandatory: false,
        hero: HeroOpening { duration_ms: 2000, show_flowers: true, show_bells: false, show_lamps: true, show_lord: true },
    },
    Design {
        id: "mehendi-emerald-vines",
        name: "Emerald Vines",
        event_types: &[EventType::Mehendi],
        colors: DesignColors { primary: "#2d6a4f", secondary: "#d8f3dc", accent: "#95d5b2" },
        background: GradientBackground {
            base: "linear-gradient(160deg, #d8f3dc 0%, #95d5b2 60%, #52b788 100%)",
            overlay: None,
        },
        texture: Some(Texture { svg: VINE_SVG, opacity: 0.2 }),
        flowers: DecorationSpec { enabled: true, color: "#40916c", positions: &["sides"] },
        bells: NO_DECORATION,
        lamps: NO_DECORATION,
        lord_allowed: false,
        lord_mandatory: false,
        hero: HeroOpening { duration_ms: 1600, show_flowers: true, show_bells: false, show_lamps: false, show_lord: false },
    },
    Design {
        id: "mehendi-henna-paisley",
        name: "Henna Paisley",
        event_types: &[EventType::Mehendi, EventType::Haldi],
        colors: DesignColors { primary: "#8b4513", secondary: "#fdf0d5", accent: "#c0392b" },
        background: GradientBackground {
            base: "linear-gradient(180deg, #fdf0d5 0%, #f4d1a6 100%)",
            overlay: Some("linear-gradient(0deg, rgba(139,69,19,0.08) 0%, rgba(139,69,19,0) 40%)"),
        },
        texture: Some(Texture { svg: PAISLEY_SVG, opacity: 0.18 }),
        flowers: DecorationSpec { enabled: true, color: "#c0392b", positions: &["top-center", "bottom-center"] },
        bells: NO_DECORATION,
        lamps: NO_DECORATION,
        lord_allowed: false,
        lord_mandatory: false,
        hero: HeroOpening { duration_ms: 1800, show_flowers: true, show_bells: false, show_lamps: false, show_lord: false },
    },
    Design {
        id: "marriage-temple-gold",
        name: "Temple Gold",
        event_types: &[EventType::Marriage],
        colors: DesignColors { primary: "#9c1c1c", secondary: "#fff4d6", accent: "#d4af37" },
        background: GradientBackground {
            base: "linear-gradient(180deg, #7b1113 0%, #9c1c1c 45%, #5a0b0d 100%)",
            overlay: Some("radial-gradient(circle at 50% 30%, rgba(212,175,55,0.35) 0%, rgba(212,175,55,0) 65%)"),
        },
        texture: Some(Texture { svg: MANDALA_SVG, opacity: 0.1 }),
        flowers: DecorationSpec { enabled: true, color: "#f4a261", positions: &["top-left", "top-right"] },
        bells: DecorationSpec { enabled: true, color: "#d4af37", positions: &["top-left", "top-right"] },
        lamps: DecorationSpec { enabled: true, color: "#ffb703", positions: &["bottom-left", "bottom-right"] },
        lord_allowed: true,
        lord_mandatory: true,
        hero: HeroOpening { duration_ms: 3000, show_flowers: true, show_bells: true, show_lamps: true, show_lord: true },
    },
    Design {
        id: "marriage-royal-maroon",
        name: "Royal Maroon",
        event_types: &[EventType::Marriage],
        colors: DesignColors { primary: "#800020", secondary: "#fbeee6", accent: "#c9a227" },
        background: GradientBackground {
            base: "linear-gradient(135deg, #4a0010 0%, #800020 55%, #a4133c 100%)",
            overlay: None,
        },
        texture: Some(Texture { svg: PAISLEY_SVG, opacity: 0.08 }),
        flowers: DecorationSpec { enabled: true, color: "#e5989b", positions: &["all-corners"] },
        bells: DecorationSpec { enabled: true, color: "#c9a227", positions: &["top-center"] },
        lamps: DecorationSpec { enabled: true, color: "#ffb703", positions: &["left-center", "right-center"] },
        lord_allowed: true,
        lord_mandatory: true,
        hero: HeroOpening { duration_ms: 2800, show_flowers: true, show_bells: true, show_lamps: true, show_lord: true },
    },
    Design {
        id: "reception-midnight-glam",
        name: "Midnight Glam",
        event_types: &[EventType::Reception, EventType::Engagement],
        colors: DesignColors { primary: "#1b263b", secondary: "#e0e1dd", accent: "#c9a227" },
        background: GradientBackground {
            base: "linear-gradient(180deg, #0d1b2a 0%, #1b263b 60%, #415a77 100%)",
            overlay: Some("radial-gradient(circle at 50% 100%, rgba(201,162,39,0.25) 0%, rgba(201,162,39,0) 60%)"),
        },
        texture: Some(Texture { svg: STAR_SVG, opacity: 0.12 }),
        flowers: NO_DECORATION,
        bells: NO_DECORATION,
        lamps: NO_DECORATION,
        lord_allowed: false,
        lord_mandatory: false,
        hero: HeroOpening { duration_ms: 1500, show_flowers: false, show_bells: false, show_lamps: false, show_lord: false },
    },
];

/// Recommended design ids per ceremony; the first one is the default.
fn recommended_ids(event_type: EventType) -> &'static [&'static str] {
    match event_type {
        EventType::Engagement => &[
            "engagement-rose-gold",
            "engagement-pastel-bloom",
            "reception-midnight-glam",
        ],
        EventType::Haldi => &["haldi-marigold-sunshine", "mehendi-henna-paisley"],
        EventType::Mehendi => &["mehendi-emerald-vines", "mehendi-henna-paisley"],
        EventType::Marriage => &["marriage-temple-gold", "marriage-royal-maroon"],
        EventType::Reception => &["reception-midnight-glam"],
    }
}

pub fn lord_rule(event_type: EventType) -> LordRule {
    match event_type {
        EventType::Engagement => LordRule { allowed: true, mandatory: false },
        EventType::Haldi => LordRule { allowed: true, mandatory: false },
        EventType::Mehendi => LordRule { allowed: false, mandatory: false },
        EventType::Marriage => LordRule { allowed: true, mandatory: true },
        EventType::Reception => LordRule { allowed: false, mandatory: false },
    }
}

pub fn is_lord_allowed_for_event(event_type: EventType) -> bool {
    lord_rule(event_type).allowed
}

/// Mandatory implies allowed: a rule that demands artwork it forbids is
/// treated as forbidding it.
pub fn is_lord_mandatory_for_event(event_type: EventType) -> bool {
    let rule = lord_rule(event_type);
    rule.mandatory && rule.allowed
}

// ── Lookups ───────────────────────────────────────────

pub fn design_by_id(id: &str) -> Option<&'static Design> {
    DESIGNS.iter().find(|d| d.id == id)
}

pub fn all_designs() -> &'static [Design] {
    &DESIGNS
}

pub fn designs_for_event(event_type: EventType) -> Vec<&'static Design> {
    recommended_ids(event_type)
        .iter()
        .filter_map(|id| design_by_id(id))
        .collect()
}

pub fn default_design_for_event(event_type: EventType) -> Option<&'static Design> {
    designs_for_event(event_type).into_iter().next()
}

/// A design may be stricter than the ceremony's rule, never looser.
pub fn design_respects_rule(design: &Design, event_type: EventType) -> bool {
    if design.lord_mandatory && !design.lord_allowed {
        return false;
    }
    match lord_rule(event_type).policy() {
        LordPolicy::Prohibited => design.lord_policy() == LordPolicy::Prohibited,
        LordPolicy::Mandatory => design.lord_policy() == LordPolicy::Mandatory,
        LordPolicy::Optional => true,
    }
}
