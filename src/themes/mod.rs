pub mod catalog;

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::models::plan::PlanTier;

pub const DEFAULT_THEME_ID: &str = "classic-ivory";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeTypography {
    pub heading: String,
    pub body: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePalette {
    pub primary: String,
    pub accent: String,
    pub background: String,
    pub background_variant: String,
    pub text: String,
    pub text_light: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationLevel {
    None,
    Subtle,
    Festive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub category: String,
    pub typography: ThemeTypography,
    pub colors: ThemePalette,
    pub animation: AnimationLevel,
    #[serde(default)]
    pub glass_effect: bool,
    pub plan: PlanTier,
    #[serde(default)]
    pub order: u32,
}

// ── Motion presets ────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionState {
    pub opacity: f32,
    pub y: f32,
    pub scale: f32,
}

const REST: MotionState = MotionState {
    opacity: 1.0,
    y: 0.0,
    scale: 1.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionPreset {
    pub initial: MotionState,
    pub animate: MotionState,
    pub duration_secs: f32,
}

/// Entry animation for a section at the given level.
pub fn animation_variants(level: AnimationLevel) -> MotionPreset {
    match level {
        AnimationLevel::None => MotionPreset {
            initial: REST,
            animate: REST,
            duration_secs: 0.0,
        },
        AnimationLevel::Subtle => MotionPreset {
            initial: MotionState { opacity: 0.0, y: 20.0, scale: 1.0 },
            animate: REST,
            duration_secs: 0.5,
        },
        AnimationLevel::Festive => MotionPreset {
            initial: MotionState { opacity: 0.0, y: 30.0, scale: 0.9 },
            animate: REST,
            duration_secs: 0.8,
        },
    }
}

// ── Registry ──────────────────────────────────────────

fn theme(
    id: &str,
    name: &str,
    category: &str,
    fonts: [&str; 3],
    colors: [&str; 6],
    animation: AnimationLevel,
    glass_effect: bool,
    plan: PlanTier,
    order: u32,
) -> Theme {
    let [heading, body, accent] = fonts;
    let [primary, accent_color, background, background_variant, text, text_light] = colors;
    Theme {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        typography: ThemeTypography {
            heading: heading.to_string(),
            body: body.to_string(),
            accent: accent.to_string(),
        },
        colors: ThemePalette {
            primary: primary.to_string(),
            accent: accent_color.to_string(),
            background: background.to_string(),
            background_variant: background_variant.to_string(),
            text: text.to_string(),
            text_light: text_light.to_string(),
        },
        animation,
        glass_effect,
        plan,
        order,
    }
}

fn registry() -> &'static [Theme] {
    static THEMES: OnceLock<Vec<Theme>> = OnceLock::new();
    THEMES.get_or_init(|| {
        let mut themes = vec![
            theme(
                "royal-heritage",
                "Royal Heritage",
                "traditional",
                ["Cinzel Decorative", "Lora", "Great Vibes"],
                ["#7b1113", "#d4af37", "#fff8e7", "#f6e7c1", "#3b1d0f", "#7a5c45"],
                AnimationLevel::Festive,
                false,
                PlanTier::Silver,
                3,
            ),
            theme(
                DEFAULT_THEME_ID,
                "Classic Ivory",
                "classic",
                ["Playfair Display", "Lato", "Dancing Script"],
                ["#8b5e3c", "#c9a227", "#fffdf7", "#f5efe0", "#2f2a24", "#6f675c"],
                AnimationLevel::Subtle,
                false,
                PlanTier::Free,
                1,
            ),
            theme(
                "minimal-blush",
                "Minimal Blush",
                "modern",
                ["Poppins", "Inter", "Parisienne"],
                ["#c06c84", "#f8b195", "#fffafa", "#fbe9ec", "#2d2d2d", "#7d7d7d"],
                AnimationLevel::Subtle,
                false,
                PlanTier::Free,
                2,
            ),
            theme(
                "garden-pastel",
                "Garden Pastel",
                "floral",
                ["Cormorant Garamond", "Nunito", "Sacramento"],
                ["#6a994e", "#f2c6de", "#fbfff7", "#e9f5db", "#283618", "#606c38"],
                AnimationLevel::Subtle,
                false,
                PlanTier::Silver,
                4,
            ),
            theme(
                "temple-gold",
                "Temple Gold",
                "traditional",
                ["Yatra One", "Mukta", "Kaushan Script"],
                ["#9c1c1c", "#d4af37", "#fff4d6", "#fde8b0", "#3d0c02", "#8a5a44"],
                AnimationLevel::Festive,
                false,
                PlanTier::Gold,
                5,
            ),
            theme(
                "midnight-glam",
                "Midnight Glam",
                "luxury",
                ["Bodoni Moda", "Montserrat", "Pinyon Script"],
                ["#c9a227", "#e0e1dd", "#0d1b2a", "#1b263b", "#f1f1f1", "#a9b4c2"],
                AnimationLevel::Subtle,
                true,
                PlanTier::Gold,
                6,
            ),
            theme(
                "palace-luxe",
                "Palace Luxe",
                "luxury",
                ["Cinzel", "Cormorant", "Alex Brush"],
                ["#5b2a86", "#d4af37", "#fbf7ff", "#efe5fb", "#2a1440", "#6f5a86"],
                AnimationLevel::Festive,
                true,
                PlanTier::Platinum,
                7,
            ),
            theme(
                "celestial-glass",
                "Celestial Glass",
                "modern",
                ["Marcellus", "Raleway", "Great Vibes"],
                ["#3a86ff", "#ffbe0b", "#f7fbff", "#e3efff", "#0b1d3a", "#51607a"],
                AnimationLevel::Festive,
                true,
                PlanTier::Platinum,
                8,
            ),
        ];
        themes.sort_by_key(|t| t.order);
        themes
    })
}

// ── Lookups ───────────────────────────────────────────

pub fn default_theme() -> &'static Theme {
    let themes = registry();
    themes
        .iter()
        .find(|t| t.id == DEFAULT_THEME_ID)
        .unwrap_or(&themes[0])
}

/// Never absent: unknown ids resolve to the default theme.
pub fn theme_by_id(id: &str) -> &'static Theme {
    registry()
        .iter()
        .find(|t| t.id == id)
        .unwrap_or_else(default_theme)
}

pub fn find_theme(id: &str) -> Option<&'static Theme> {
    registry().iter().find(|t| t.id == id)
}

/// Every built-in theme, in display order.
pub fn all_themes() -> &'static [Theme] {
    registry()
}

pub fn themes_for_plan(plan: PlanTier) -> Vec<&'static Theme> {
    all_themes().iter().filter(|t| plan.includes(t.plan)).collect()
}

/// False for unknown ids as well as locked ones.
pub fn can_use_theme(theme_id: &str, plan: PlanTier) -> bool {
    find_theme(theme_id).is_some_and(|t| plan.includes(t.plan))
}
