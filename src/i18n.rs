use dashmap::DashMap;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::models::profile::CustomTexts;

pub const ENGLISH: &str = "en";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LanguageInfo {
    pub code: &'static str,
    pub native_name: &'static str,
}

/// Languages an admin can enable. English first; it is always on.
pub static SUPPORTED_LANGUAGES: [LanguageInfo; 9] = [
    LanguageInfo { code: "en", native_name: "English" },
    LanguageInfo { code: "hi", native_name: "हिन्दी" },
    LanguageInfo { code: "te", native_name: "తెలుగు" },
    LanguageInfo { code: "ta", native_name: "தமிழ்" },
    LanguageInfo { code: "kn", native_name: "ಕನ್ನಡ" },
    LanguageInfo { code: "ml", native_name: "മലയാളം" },
    LanguageInfo { code: "mr", native_name: "मराठी" },
    LanguageInfo { code: "gu", native_name: "ગુજરાતી" },
    LanguageInfo { code: "bn", native_name: "বাংলা" },
];

pub fn language_info(code: &str) -> Option<&'static LanguageInfo> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.code == code)
}

pub fn is_supported(code: &str) -> bool {
    language_info(code).is_some()
}

#[derive(Debug, thiserror::Error)]
pub enum LanguageError {
    #[error("unsupported language code: {0}")]
    Unsupported(String),
    #[error("language bundle not found: {0}")]
    Missing(String),
    #[error("could not read bundle {code}: {reason}")]
    Unreadable { code: String, reason: String },
    #[error("malformed bundle {code}: {reason}")]
    Malformed { code: String, reason: String },
}

/// `{section: {key: text}}` for one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageBundle {
    pub code: String,
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl LanguageBundle {
    pub fn new(code: &str, sections: HashMap<String, HashMap<String, String>>) -> Self {
        LanguageBundle {
            code: code.to_string(),
            sections,
        }
    }

    pub fn from_json(code: &str, raw: &str) -> Result<Self, LanguageError> {
        let sections = serde_json::from_str(raw).map_err(|e| LanguageError::Malformed {
            code: code.to_string(),
            reason: e.to_string(),
        })?;
        Ok(LanguageBundle::new(code, sections))
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(|s| s.as_str())
    }

    /// Every `section.key` the bundle defines.
    pub fn keys(&self) -> BTreeSet<String> {
        self.sections
            .iter()
            .flat_map(|(section, entries)| entries.keys().map(move |k| format!("{}.{}", section, k)))
            .collect()
    }
}

// ── Sources ───────────────────────────────────────────

/// Where bundles come from.
pub trait BundleSource: Send + Sync {
    fn fetch(&self, code: &str) -> Result<LanguageBundle, LanguageError>;
}

/// Reads `<dir>/<code>.json`.
pub struct FileBundleSource {
    dir: PathBuf,
}

impl FileBundleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBundleSource { dir: dir.into() }
    }
}

impl BundleSource for FileBundleSource {
    fn fetch(&self, code: &str) -> Result<LanguageBundle, LanguageError> {
        // Codes become file names, so only plain language tags get through.
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(LanguageError::Unsupported(code.to_string()));
        }
        let path = self.dir.join(format!("{}.json", code));
        if !path.exists() {
            return Err(LanguageError::Missing(code.to_string()));
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| LanguageError::Unreadable {
            code: code.to_string(),
            reason: e.to_string(),
        })?;
        LanguageBundle::from_json(code, &raw)
    }
}

// ── Loader ────────────────────────────────────────────

/// Loads bundles on demand and keeps them for the life of the process.
pub struct LanguageLoader {
    source: Arc<dyn BundleSource>,
    cache: DashMap<String, Arc<LanguageBundle>>,
}

impl LanguageLoader {
    pub fn new(source: Arc<dyn BundleSource>) -> Self {
        LanguageLoader {
            source,
            cache: DashMap::new(),
        }
    }

    /// Repeated calls for the same code return the same bundle.
    pub fn load(&self, code: &str) -> Result<Arc<LanguageBundle>, LanguageError> {
        if let Some(bundle) = self.cache.get(code) {
            return Ok(bundle.value().clone());
        }
        let bundle = Arc::new(self.source.fetch(code)?);
        let entry = self.cache.entry(code.to_string()).or_insert(bundle);
        Ok(entry.value().clone())
    }

    pub fn cached(&self, code: &str) -> Option<Arc<LanguageBundle>> {
        self.cache.get(code).map(|b| b.value().clone())
    }

    /// The requested bundle, or English when it cannot be loaded.
    pub fn load_or_english(&self, code: &str) -> Option<Arc<LanguageBundle>> {
        match self.load(code) {
            Ok(bundle) => Some(bundle),
            Err(e) => {
                if code != ENGLISH {
                    log::warn!("[i18n] {}; falling back to English", e);
                }
                self.load(ENGLISH)
                    .map_err(|e| log::error!("[i18n] English bundle unavailable: {}", e))
                    .ok()
            }
        }
    }

    /// Load every code concurrently. Failures are logged and skipped; the
    /// return value is how many of the codes are warm afterwards.
    pub fn preload(&self, codes: &[String]) -> usize {
        std::thread::scope(|scope| {
            let handles: Vec<_> = codes
                .iter()
                .map(|code| (code, scope.spawn(move || self.load(code))))
                .collect();

            handles
                .into_iter()
                .map(|(code, handle)| match handle.join() {
                    Ok(Ok(_)) => 1,
                    Ok(Err(e)) => {
                        log::warn!("[i18n] Preload of {} failed: {}", code, e);
                        0
                    }
                    Err(_) => {
                        log::warn!("[i18n] Preload of {} panicked", code);
                        0
                    }
                })
                .sum()
        })
    }
}

// ── Lookup ────────────────────────────────────────────

/// Resolve one piece of text: the admin's override for `lang`, then the
/// bundle, then the key itself. Never fails.
pub fn get_text(
    bundle: Option<&LanguageBundle>,
    section: &str,
    key: &str,
    custom: &CustomTexts,
    lang: &str,
) -> String {
    let path = format!("{}.{}", section, key);
    if let Some(text) = custom.get(lang).and_then(|texts| texts.get(&path)) {
        return text.clone();
    }
    if let Some(text) = bundle.and_then(|b| b.get(section, key)) {
        return text.to_string();
    }
    key.to_string()
}

/// Keys English defines that `bundle` lacks, as `section.key`.
pub fn missing_keys(bundle: &LanguageBundle, english: &LanguageBundle) -> Vec<String> {
    let have = bundle.keys();
    english
        .keys()
        .into_iter()
        .filter(|k| !have.contains(k))
        .collect()
}

/// Text lookup bound to one language and one profile's overrides.
#[derive(Debug, Clone)]
pub struct Translator {
    pub lang: String,
    bundle: Option<Arc<LanguageBundle>>,
    custom: CustomTexts,
}

impl Translator {
    pub fn new(lang: &str, bundle: Option<Arc<LanguageBundle>>, custom: CustomTexts) -> Self {
        Translator {
            lang: lang.to_string(),
            bundle,
            custom,
        }
    }

    pub fn text(&self, section: &str, key: &str) -> String {
        get_text(self.bundle.as_deref(), section, key, &self.custom, &self.lang)
    }

    /// Like `text`, but with a caller default instead of the bare key.
    pub fn text_or(&self, section: &str, key: &str, default: &str) -> String {
        let path = format!("{}.{}", section, key);
        self.custom
            .get(&self.lang)
            .and_then(|texts| texts.get(&path))
            .map(|s| s.to_string())
            .or_else(|| {
                self.bundle
                    .as_deref()
                    .and_then(|b| b.get(section, key))
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| default.to_string())
    }
}

// ── Language switching ────────────────────────────────

/// Handed out when a switch starts; only the newest ticket can install a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchTicket {
    generation: u64,
    pub code: String,
}

#[derive(Debug, Default)]
struct DisplayState {
    latest: u64,
    unmounted: bool,
    current: Option<Arc<LanguageBundle>>,
}

/// The language a view is showing. Loads complete out of order; a load
/// that was superseded by a newer switch, or that lands after the view went
/// away, is dropped instead of overwriting the newer state.
#[derive(Debug, Default)]
pub struct DisplayedLanguage {
    state: Mutex<DisplayState>,
}

impl DisplayedLanguage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_switch(&self, code: &str) -> SwitchTicket {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.latest += 1;
        SwitchTicket {
            generation: state.latest,
            code: code.to_string(),
        }
    }

    /// Install `bundle` if `ticket` is still the newest switch. Returns whether it was applied.
    pub fn complete(&self, ticket: &SwitchTicket, bundle: Arc<LanguageBundle>) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.unmounted || ticket.generation != state.latest {
            log::debug!("[i18n] Dropping stale bundle for {}", ticket.code);
            return false;
        }
        state.current = Some(bundle);
        true
    }

    pub fn current(&self) -> Option<Arc<LanguageBundle>> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    pub fn unmount(&self) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).unmounted = true;
    }
}
