use rocket::request::{FromRequest, Outcome, Request};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::features::FeatureFlags;

/// What we know about the guest making a request. Never fails; missing
/// headers are simply absent.
#[derive(Debug, Clone, Default)]
pub struct VisitorInfo {
    pub path: String,
    pub ip_hash: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for VisitorInfo {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let ip = request
            .client_ip()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Outcome::Success(VisitorInfo {
            path: request.uri().path().to_string(),
            ip_hash: hash_ip(&ip),
            user_agent: request.headers().get_one("User-Agent").map(|s| s.to_string()),
            referrer: request.headers().get_one("Referer").map(extract_domain),
        })
    }
}

/// The view beacon sent to the profile API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub profile_id: String,
    pub path: String,
    pub lang: String,
    pub ip_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

/// Build the beacon this plan is entitled to, if any. Basic analytics records
/// the view; advanced adds device, browser and referrer.
pub fn page_view(
    profile_id: &str,
    lang: &str,
    visitor: &VisitorInfo,
    flags: &FeatureFlags,
) -> Option<PageView> {
    if !flags.analytics_basic {
        return None;
    }

    let mut view = PageView {
        profile_id: profile_id.to_string(),
        path: visitor.path.clone(),
        lang: lang.to_string(),
        ip_hash: visitor.ip_hash.clone(),
        device: None,
        browser: None,
        referrer: None,
    };

    if flags.analytics_advanced {
        let (device, browser) = parse_user_agent(visitor.user_agent.as_deref().unwrap_or(""));
        view.device = Some(device.to_string());
        view.browser = Some(browser.to_string());
        view.referrer = visitor.referrer.clone();
    }

    Some(view)
}

pub fn hash_ip(ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    hex::encode(hasher.finalize())
}

fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| url.to_string())
}

fn parse_user_agent(ua: &str) -> (&str, &str) {
    let device = if ua.contains("iPad") || ua.contains("Tablet") {
        "tablet"
    } else if ua.contains("Mobile") || ua.contains("Android") {
        "mobile"
    } else {
        "desktop"
    };

    let browser = if ua.contains("Firefox") {
        "Firefox"
    } else if ua.contains("Edg/") {
        "Edge"
    } else if ua.contains("OPR") || ua.contains("Opera") {
        "Opera"
    } else if ua.contains("Chrome") {
        "Chrome"
    } else if ua.contains("Safari") {
        "Safari"
    } else {
        "Other"
    };

    (device, browser)
}
