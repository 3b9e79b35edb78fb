use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::Arc;

use crate::analytics::PageView;
use crate::api::{ApiError, InvitationBackend};
use crate::models::rsvp::ReactionForm;

/// A side effect nobody waits for.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    PageView(PageView),
    Reaction {
        profile_id: String,
        event_id: String,
        form: ReactionForm,
    },
}

impl Notification {
    fn label(&self) -> &'static str {
        match self {
            Notification::PageView(_) => "page view",
            Notification::Reaction { .. } => "reaction",
        }
    }
}

pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: &Notification) -> Result<(), ApiError>;
}

impl<T: InvitationBackend + ?Sized> NotificationSink for T {
    fn deliver(&self, notification: &Notification) -> Result<(), ApiError> {
        match notification {
            Notification::PageView(view) => self.track_view(view),
            Notification::Reaction {
                profile_id,
                event_id,
                form,
            } => self.send_reaction(profile_id, event_id, form),
        }
    }
}

/// Fire-and-forget delivery on a worker thread. `enqueue` never blocks and
/// never fails; a full queue drops the notification.
pub struct Notifier {
    tx: SyncSender<Notification>,
    dropped: Arc<AtomicU64>,
}

impl Notifier {
    pub fn start<S>(sink: Arc<S>, capacity: usize) -> Self
    where
        S: NotificationSink + ?Sized + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<Notification>(capacity.max(1));

        let spawned = std::thread::Builder::new()
            .name("vivah-notifier".into())
            .spawn(move || {
                for notification in rx {
                    if let Err(e) = sink.deliver(&notification) {
                        log::debug!("[notifier] {} not delivered: {}", notification.label(), e);
                    }
                }
                log::debug!("[notifier] Queue closed, worker exiting");
            });

        if let Err(e) = spawned {
            // The receiver is gone with the closure; every enqueue becomes a no-op.
            log::error!("[notifier] Could not start worker thread: {}", e);
        }

        Notifier {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn enqueue(&self, notification: Notification) {
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(n)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                log::debug!("[notifier] Queue full, dropping {}", n.label());
            }
            Err(TrySendError::Disconnected(n)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                log::debug!("[notifier] Worker gone, dropping {}", n.label());
            }
        }
    }

    /// Notifications dropped so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::Receiver;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ChannelSink {
        seen: Mutex<mpsc::Sender<Notification>>,
        fail: bool,
    }

    impl NotificationSink for ChannelSink {
        fn deliver(&self, notification: &Notification) -> Result<(), ApiError> {
            let _ = self.seen.lock().unwrap().send(notification.clone());
            if self.fail {
                Err(ApiError::Unexpected("offline".into()))
            } else {
                Ok(())
            }
        }
    }

    fn sink(fail: bool) -> (Arc<ChannelSink>, Receiver<Notification>) {
        let (tx, rx) = mpsc::channel();
        (
            Arc::new(ChannelSink {
                seen: Mutex::new(tx),
                fail,
            }),
            rx,
        )
    }

    fn reaction(emoji: &str) -> Notification {
        Notification::Reaction {
            profile_id: "p1".into(),
            event_id: "e1".into(),
            form: ReactionForm { emoji: emoji.into() },
        }
    }

    #[test]
    fn test_delivers_in_order() {
        let (sink, rx) = sink(false);
        let notifier = Notifier::start(sink, 8);
        notifier.enqueue(reaction("🎉"));
        notifier.enqueue(reaction("🙏"));

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first, reaction("🎉"));
        assert_eq!(second, reaction("🙏"));
    }

    #[test]
    fn test_delivery_failure_is_swallowed() {
        let (sink, rx) = sink(true);
        let notifier = Notifier::start(sink, 8);
        notifier.enqueue(reaction("❤️"));
        notifier.enqueue(reaction("👏"));
        // The worker keeps going after the first failure.
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
    }
}
