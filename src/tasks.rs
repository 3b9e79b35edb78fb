use rocket::fairing::{Fairing, Info, Kind};
use rocket::tokio;
use rocket::{Orbit, Rocket};
use std::sync::Arc;
use std::time::Duration;

use crate::rate_limit::{RateLimiter, HOUR};

const LIMITER_SWEEP_EVERY: Duration = Duration::from_secs(10 * 60);

pub struct BackgroundTasks;

#[rocket::async_trait]
impl Fairing for BackgroundTasks {
    fn info(&self) -> Info {
        Info {
            name: "Background Tasks",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let Some(limiter) = rocket.state::<Arc<RateLimiter>>() else {
            log::warn!("[task] Rate limiter not managed; sweep disabled");
            return;
        };

        // Rate limiter sweep
        let limiter = Arc::clone(limiter);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(LIMITER_SWEEP_EVERY).await;
                let removed = limiter.cleanup(HOUR);
                if removed > 0 {
                    log::info!("[task] Forgot {} idle rate-limit keys", removed);
                }
            }
        });

        log::info!("[task] Background tasks started");
    }
}
