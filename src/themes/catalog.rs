use serde::Serialize;

use crate::api::InvitationBackend;
use crate::models::plan::PlanTier;

use super::{themes_for_plan, Theme};

/// Where a theme list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    Remote,
    LocalFallback,
}

/// Themes a plan may pick from. Asks the API first and falls back to the
/// built-in table when the call fails or comes back empty.
pub fn themes_for_plan_remote(
    backend: &dyn InvitationBackend,
    plan: PlanTier,
) -> (Vec<Theme>, CatalogSource) {
    match backend.fetch_themes(plan) {
        Ok(mut themes) if !themes.is_empty() => {
            themes.sort_by_key(|t| t.order);
            (themes, CatalogSource::Remote)
        }
        Ok(_) => {
            log::warn!("[themes] API returned no themes for {}, using built-in table", plan);
            (local(plan), CatalogSource::LocalFallback)
        }
        Err(e) => {
            log::warn!("[themes] Theme fetch failed for {}: {}; using built-in table", plan, e);
            (local(plan), CatalogSource::LocalFallback)
        }
    }
}

fn local(plan: PlanTier) -> Vec<Theme> {
    themes_for_plan(plan).into_iter().cloned().collect()
}
