use crate::domain::{ArtistSelection, Gig, GigSet};
use crate::error::{AgendaError, Result};
use crate::normalize;
use crate::observer::ObserverSet;
use crate::sources::GigSource;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// One discovery pass over a set of selected artists.
///
/// The run owns the accumulated gig set exclusively; a superseding start
/// cancels the old run before a new one is constructed, so no two runs ever
/// mutate the same set. Passes are externally triggered and guarded by an
/// atomic try-acquire: a trigger that arrives while a pass is running is
/// dropped, not queued.
pub struct DiscoveryRun {
    selection: ArtistSelection,
    source: Arc<dyn GigSource>,
    observers: Arc<ObserverSet>,
    gigs: Mutex<GigSet>,
    newly_found: AtomicUsize,
    cancelled: AtomicBool,
    pass_in_progress: AtomicBool,
    exhausted: AtomicBool,
}

impl DiscoveryRun {
    /// Creates a run for a non-empty selection. The newly-found counter
    /// starts at 1 so the first pass is always eligible.
    pub fn new(
        selection: ArtistSelection,
        source: Arc<dyn GigSource>,
        observers: Arc<ObserverSet>,
    ) -> Result<Self> {
        if selection.is_empty() {
            return Err(AgendaError::NoArtistsSelected);
        }
        Ok(Self {
            selection,
            source,
            observers,
            gigs: Mutex::new(GigSet::default()),
            newly_found: AtomicUsize::new(1),
            cancelled: AtomicBool::new(false),
            pass_in_progress: AtomicBool::new(false),
            exhausted: AtomicBool::new(false),
        })
    }

    /// One sweep over all selected artists, in selection order.
    ///
    /// Cancellation is checked before the sweep and between artists; an
    /// in-flight lookup always completes. A sweep that accepts zero new gigs
    /// marks the run exhausted and emits the exhaustion notification exactly
    /// once; no further sweep runs until a new start.
    pub async fn run_pass(&self) {
        if self.cancelled.load(Ordering::SeqCst) || self.exhausted.load(Ordering::SeqCst) {
            return;
        }
        // Drop, not queue: concurrent triggers collapse to a no-op.
        if self
            .pass_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Pass already in progress, dropping trigger");
            return;
        }

        info!(
            "Searching for new gigs via {} across {} artists",
            self.source.source_name(),
            self.selection.len()
        );
        self.newly_found.store(0, Ordering::SeqCst);

        for artist in self.selection.iter() {
            if self.cancelled.load(Ordering::SeqCst) {
                info!("Discovery cancelled, stopping sweep");
                break;
            }

            match self.source.lookup(artist).await {
                Ok(candidates) => {
                    for raw in &candidates {
                        match normalize::normalize(raw, artist) {
                            Ok(gig) => self.accept(gig),
                            Err(e) => warn!("Dropping candidate for {}: {}", artist, e),
                        }
                    }
                }
                // A single artist's failure never aborts the sweep.
                Err(e) => warn!("Lookup failed for {}: {}", artist, e),
            }
        }

        if !self.cancelled.load(Ordering::SeqCst) && self.newly_found.load(Ordering::SeqCst) == 0 {
            self.exhausted.store(true, Ordering::SeqCst);
            info!("Search exhausted - try selecting more artists from the library");
            self.observers.notify_exhausted();
        }

        self.pass_in_progress.store(false, Ordering::SeqCst);
    }

    /// Requests cooperative cancellation. Idempotent, safe from any state;
    /// an exhausted run is unaffected.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn accept(&self, gig: Gig) {
        let inserted = self.gigs.lock().unwrap().insert(gig.clone());
        if !inserted {
            debug!(
                "Duplicate gig dropped: {} @ {}",
                gig.artist,
                gig.starts_at.to_rfc3339()
            );
            return;
        }
        self.newly_found.fetch_add(1, Ordering::SeqCst);
        self.observers.notify_gig(&gig);
    }

    pub fn selection(&self) -> &ArtistSelection {
        &self.selection
    }

    /// Snapshot of the accumulated set, in discovery order.
    pub fn gigs(&self) -> Vec<Gig> {
        self.gigs.lock().unwrap().to_vec()
    }

    /// Gigs accepted by the most recent (or current) sweep.
    pub fn newly_found(&self) -> usize {
        self.newly_found.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::SeqCst)
    }
}
