use crate::domain::Gig;
use crate::error::Result;
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Observers receive incremental discovery results. The transport layer owns
/// delivery guarantees to remote clients; delivery here is synchronous,
/// at-most-once per event, best effort.
pub trait GigObserver: Send + Sync {
    /// A newly accepted gig, pushed once per record in discovery order.
    fn gig_found(&self, gig: &Gig) -> Result<()>;

    /// A full sweep accepted nothing new; no more records are coming until a
    /// new run starts.
    fn search_exhausted(&self) -> Result<()> {
        Ok(())
    }

    /// The active run was superseded; previously pushed records are stale.
    fn cleared(&self) -> Result<()> {
        Ok(())
    }
}

/// Subscriber registry for discovery notifications. A failing observer is
/// logged and skipped; it never aborts the pass or starves other observers.
#[derive(Default)]
pub struct ObserverSet {
    observers: RwLock<Vec<Arc<dyn GigObserver>>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn GigObserver>) {
        self.observers.write().unwrap().push(observer);
    }

    pub fn notify_gig(&self, gig: &Gig) {
        for observer in self.observers.read().unwrap().iter() {
            if let Err(e) = observer.gig_found(gig) {
                warn!("Observer failed on gig notification: {}", e);
            }
        }
    }

    pub fn notify_exhausted(&self) {
        for observer in self.observers.read().unwrap().iter() {
            if let Err(e) = observer.search_exhausted() {
                warn!("Observer failed on exhaustion notification: {}", e);
            }
        }
    }

    pub fn notify_cleared(&self) {
        for observer in self.observers.read().unwrap().iter() {
            if let Err(e) = observer.cleared() {
                warn!("Observer failed on clear notification: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgendaError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing;

    impl GigObserver for Failing {
        fn gig_found(&self, _gig: &Gig) -> Result<()> {
            Err(AgendaError::Config("broken pipe".to_string()))
        }
    }

    struct Counting {
        gigs: AtomicUsize,
    }

    impl GigObserver for Counting {
        fn gig_found(&self, _gig: &Gig) -> Result<()> {
            self.gigs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn failing_observer_does_not_starve_others() {
        let set = ObserverSet::new();
        let counting = Arc::new(Counting {
            gigs: AtomicUsize::new(0),
        });
        set.subscribe(Arc::new(Failing));
        set.subscribe(counting.clone());

        let gig = Gig {
            artist: "Artist".to_string(),
            venue: None,
            location: None,
            starts_at: chrono::DateTime::parse_from_rfc3339("2026-09-01T20:00:00+02:00").unwrap(),
            event_url: None,
            image_url: None,
            status: None,
        };
        set.notify_gig(&gig);
        assert_eq!(counting.gigs.load(Ordering::SeqCst), 1);
    }
}
