use serde::{Deserialize, Serialize};

use crate::api::InvitationBackend;
use crate::models::plan::PlanTier;

/// Gallery size for SILVER; GOLD and above are uncapped.
pub const SILVER_GALLERY_LIMIT: u32 = 20;

/// Capabilities a plan unlocks. Advisory on this side: the API enforces the
/// same rules when a write arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub rsvp: bool,
    pub countdown: bool,
    pub gallery_limited: bool,
    pub gallery_unlimited: bool,
    pub background_music: bool,
    pub guest_wishes: bool,
    pub multi_language: bool,
    pub analytics_basic: bool,
    pub hero_video: bool,
    pub custom_texts: bool,
    pub premium_themes: bool,
    pub analytics_advanced: bool,
    pub requires_watermark: bool,
    /// `None` means no cap.
    pub max_gallery_images: Option<u32>,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        FeatureFlags::fail_closed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Rsvp,
    Countdown,
    GalleryLimited,
    GalleryUnlimited,
    BackgroundMusic,
    GuestWishes,
    MultiLanguage,
    AnalyticsBasic,
    HeroVideo,
    CustomTexts,
    PremiumThemes,
    AnalyticsAdvanced,
    RequiresWatermark,
}

impl Feature {
    pub const ALL: [Feature; 13] = [
        Feature::Rsvp,
        Feature::Countdown,
        Feature::GalleryLimited,
        Feature::GalleryUnlimited,
        Feature::BackgroundMusic,
        Feature::GuestWishes,
        Feature::MultiLanguage,
        Feature::AnalyticsBasic,
        Feature::HeroVideo,
        Feature::CustomTexts,
        Feature::PremiumThemes,
        Feature::AnalyticsAdvanced,
        Feature::RequiresWatermark,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rsvp => "rsvp",
            Self::Countdown => "countdown",
            Self::GalleryLimited => "gallery_limited",
            Self::GalleryUnlimited => "gallery_unlimited",
            Self::BackgroundMusic => "background_music",
            Self::GuestWishes => "guest_wishes",
            Self::MultiLanguage => "multi_language",
            Self::AnalyticsBasic => "analytics_basic",
            Self::HeroVideo => "hero_video",
            Self::CustomTexts => "custom_texts",
            Self::PremiumThemes => "premium_themes",
            Self::AnalyticsAdvanced => "analytics_advanced",
            Self::RequiresWatermark => "requires_watermark",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl FeatureFlags {
    /// What a guest sees when the plan could not be determined: nothing
    /// optional, watermark on.
    pub fn fail_closed() -> Self {
        FeatureFlags {
            rsvp: false,
            countdown: false,
            gallery_limited: false,
            gallery_unlimited: false,
            background_music: false,
            guest_wishes: false,
            multi_language: false,
            analytics_basic: false,
            hero_video: false,
            custom_texts: false,
            premium_themes: false,
            analytics_advanced: false,
            requires_watermark: true,
            max_gallery_images: Some(0),
        }
    }

    pub fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::Rsvp => self.rsvp,
            Feature::Countdown => self.countdown,
            Feature::GalleryLimited => self.gallery_limited,
            Feature::GalleryUnlimited => self.gallery_unlimited,
            Feature::BackgroundMusic => self.background_music,
            Feature::GuestWishes => self.guest_wishes,
            Feature::MultiLanguage => self.multi_language,
            Feature::AnalyticsBasic => self.analytics_basic,
            Feature::HeroVideo => self.hero_video,
            Feature::CustomTexts => self.custom_texts,
            Feature::PremiumThemes => self.premium_themes,
            Feature::AnalyticsAdvanced => self.analytics_advanced,
            Feature::RequiresWatermark => self.requires_watermark,
        }
    }

    /// String lookup for callers holding a feature name. Unknown names are off.
    pub fn has_named(&self, name: &str) -> bool {
        Feature::from_name(name).map(|f| self.has(f)).unwrap_or(false)
    }

    /// How many of `available` gallery items may be shown.
    pub fn gallery_cap(&self, available: usize) -> usize {
        if !self.gallery_limited && !self.gallery_unlimited {
            return 0;
        }
        match self.max_gallery_images {
            Some(max) => available.min(max as usize),
            None => available,
        }
    }
}

/// Capabilities of a plan. A fixed table, not derived from usage.
pub fn compute_feature_flags(plan: PlanTier) -> FeatureFlags {
    let silver = plan.includes(PlanTier::Silver);
    let gold = plan.includes(PlanTier::Gold);
    let platinum = plan.includes(PlanTier::Platinum);

    FeatureFlags {
        rsvp: true,
        countdown: true,
        gallery_limited: silver,
        gallery_unlimited: gold,
        background_music: silver,
        guest_wishes: silver,
        multi_language: silver,
        analytics_basic: silver,
        hero_video: gold,
        custom_texts: gold,
        premium_themes: gold,
        analytics_advanced: platinum,
        requires_watermark: plan == PlanTier::Free,
        max_gallery_images: match plan {
            PlanTier::Free => Some(0),
            PlanTier::Silver => Some(SILVER_GALLERY_LIMIT),
            PlanTier::Gold | PlanTier::Platinum => None,
        },
    }
}

/// Flags for a live profile as the API reports them. Any failure fails
/// closed; the page still renders, with nothing gated unlocked.
pub fn fetch_flags(backend: &dyn InvitationBackend, profile_id: &str) -> FeatureFlags {
    match backend.fetch_features(profile_id) {
        Ok(flags) => flags,
        Err(e) => {
            log::warn!(
                "[features] Could not load features for {}: {}; failing closed",
                profile_id,
                e
            );
            FeatureFlags::fail_closed()
        }
    }
}
