use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::AppConfig;
use crate::i18n::{missing_keys, BundleSource, FileBundleSource, ENGLISH};

/// Required directories that will be created if missing
const REQUIRED_DIRS: &[&str] = &["website", "website/static", "website/static/lords"];

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about incomplete translations, and
/// aborts if the English bundle is absent.
pub fn run(config: &AppConfig) {
    info!("[boot] Vivah boot check starting...");

    let report = check(config);

    if report.errors > 0 {
        error!(
            "[boot] Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            report.errors, report.warnings
        );
        process::exit(1);
    }

    if report.warnings > 0 {
        warn!(
            "[boot] Boot check passed with {} warning(s). Some pages may show untranslated keys.",
            report.warnings
        );
    } else {
        info!("[boot] Boot check passed. All systems go.");
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BootReport {
    pub errors: u32,
    pub warnings: u32,
}

pub fn check(config: &AppConfig) -> BootReport {
    let mut report = BootReport::default();

    // ── 1. Directories ─────────────────────────────────
    let locales_dir = config.locales.dir.as_str();
    for dir in REQUIRED_DIRS.iter().copied().chain(std::iter::once(locales_dir)) {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("[boot]   Created directory: {}", dir),
                Err(e) => {
                    error!("[boot]   FAILED to create directory {}: {}", dir, e);
                    report.errors += 1;
                }
            }
        }
    }

    // ── 2. English bundle ──────────────────────────────
    let source = FileBundleSource::new(locales_dir);
    let english = match source.fetch(ENGLISH) {
        Ok(bundle) => bundle,
        Err(e) => {
            error!("[boot]   English bundle unusable: {}", e);
            report.errors += 1;
            return report;
        }
    };

    // ── 3. Preloaded bundles complete ──────────────────
    for code in config.locales.preload.iter().filter(|c| c.as_str() != ENGLISH) {
        match source.fetch(code) {
            Ok(bundle) => {
                let missing = missing_keys(&bundle, &english);
                if !missing.is_empty() {
                    warn!(
                        "[boot]   {} is missing {} key(s), e.g. {}",
                        code,
                        missing.len(),
                        missing[0]
                    );
                    report.warnings += 1;
                }
            }
            Err(e) => {
                warn!("[boot]   {} will fall back to English: {}", code, e);
                report.warnings += 1;
            }
        }
    }

    // ── 4. Rocket.toml exists ───────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("[boot]   Rocket.toml not found, using default config");
        report.warnings += 1;
    }

    report
}
