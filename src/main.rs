#[macro_use]
extern crate rocket;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::{FileServer, Options};
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::{Build, Request, Rocket};
use std::sync::Arc;

mod analytics;
mod api;
mod boot;
mod config;
mod designs;
mod editor;
mod event_content;
mod features;
mod i18n;
mod invitation;
mod models;
mod notifier;
mod rate_limit;
mod render;
mod routes;
mod tasks;
mod themes;
mod typography;

#[cfg(test)]
mod tests;

use api::{ApiClient, ErrorKind, InvitationBackend};
use config::AppConfig;
use i18n::{FileBundleSource, LanguageLoader, Translator, ENGLISH};
use models::profile::CustomTexts;
use notifier::Notifier;
use rate_limit::RateLimiter;

pub struct NoCacheAdmin;

#[rocket::async_trait]
impl Fairing for NoCacheAdmin {
    fn info(&self) -> Info {
        Info { name: "No-Cache Admin API", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        if req.uri().path().starts_with("/admin") {
            res.set_header(Header::new("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
    }
}

fn catcher_page(req: &Request<'_>, kind: ErrorKind) -> RawHtml<String> {
    let bundle = req
        .rocket()
        .state::<Arc<LanguageLoader>>()
        .and_then(|l| l.load_or_english(ENGLISH));
    let translator = Translator::new(ENGLISH, bundle, CustomTexts::new());
    RawHtml(render::render_error_page(kind, &translator))
}

#[catch(400)]
fn bad_request(req: &Request<'_>) -> RawHtml<String> {
    catcher_page(req, ErrorKind::InvalidRequest)
}

#[catch(401)]
fn unauthorized() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>401</h1><p>Sign in to the admin console first.</p></body></html>".to_string())
}

#[catch(404)]
fn not_found(req: &Request<'_>) -> RawHtml<String> {
    catcher_page(req, ErrorKind::NotFound)
}

#[catch(500)]
fn server_error(req: &Request<'_>) -> RawHtml<String> {
    catcher_page(req, ErrorKind::Unexpected)
}

/// Assemble the server around a backend and a language loader.
pub fn build_rocket(
    config: AppConfig,
    backend: Arc<dyn InvitationBackend>,
    languages: Arc<LanguageLoader>,
) -> Rocket<Build> {
    let notifier = Notifier::start(Arc::clone(&backend), config.notifier.queue_capacity);

    rocket::build()
        .manage(config)
        .manage(backend)
        .manage(languages)
        .manage(Arc::new(RateLimiter::new()))
        .manage(notifier)
        .attach(tasks::BackgroundTasks)
        .attach(NoCacheAdmin)
        .mount("/static", FileServer::new("website/static", Options::Missing))
        .mount("/", routes::public::routes())
        .mount("/api", routes::api::routes())
        .mount("/admin/api", routes::admin_api::routes())
        .register("/", catchers![bad_request, unauthorized, not_found, server_error])
}

fn main() {
    env_logger::init();

    let config = AppConfig::load();

    // Boot check: directories and language bundles
    boot::run(&config);

    let client = match ApiClient::new(&config.api.base_url, config.api.timeout(), config.api.token.clone()) {
        Ok(c) => c,
        Err(e) => {
            log::error!("[api] {}", e);
            std::process::exit(1);
        }
    };
    log::info!("[api] Profile API at {}", config.api.base_url);
    let backend: Arc<dyn InvitationBackend> = Arc::new(client);

    let languages = Arc::new(LanguageLoader::new(Arc::new(FileBundleSource::new(&config.locales.dir))));
    let warm = languages.preload(&config.locales.preload);
    log::info!(
        "[i18n] {} of {} language bundle(s) preloaded",
        warm,
        config.locales.preload.len()
    );

    // The blocking HTTP client must be dropped outside the async runtime.
    let keep_alive = Arc::clone(&backend);
    let result = rocket::execute(build_rocket(config, backend, languages).launch());
    if let Err(e) = result {
        log::error!("Rocket failed: {}", e);
        drop(keep_alive);
        std::process::exit(1);
    }
    drop(keep_alive);
}
