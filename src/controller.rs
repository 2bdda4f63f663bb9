use crate::discovery::DiscoveryRun;
use crate::domain::{ArtistSelection, Gig};
use crate::error::Result;
use crate::observer::ObserverSet;
use crate::sources::GigSource;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Owns the single-flight execution policy: at most one discovery run is
/// active per controller. Starting a new run supersedes (cancels) the prior
/// one; a stop request cancels whatever run is active.
pub struct RunController {
    source: Arc<dyn GigSource>,
    observers: Arc<ObserverSet>,
    active: Mutex<Option<Arc<DiscoveryRun>>>,
}

impl RunController {
    pub fn new(source: Arc<dyn GigSource>, observers: Arc<ObserverSet>) -> Self {
        Self {
            source,
            observers,
            active: Mutex::new(None),
        }
    }

    pub fn observers(&self) -> &Arc<ObserverSet> {
        &self.observers
    }

    /// Starts a discovery run for the given names and spawns its first pass.
    /// An empty selection fails with `NoArtistsSelected` and leaves any prior
    /// run untouched; superseding happens only on a successful start.
    pub fn start<I, S>(&self, names: I) -> Result<Arc<DiscoveryRun>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let run = self.install(names)?;
        Self::spawn_pass(&run);
        Ok(run)
    }

    /// Triggers another pass on the active run ("load more"). A no-op when no
    /// run is active; a trigger racing an in-flight pass is dropped by the
    /// run's own guard.
    pub fn trigger_pass(&self) {
        if let Some(run) = self.active_run() {
            Self::spawn_pass(&run);
        }
    }

    /// Cancels the active run, if any.
    pub fn stop(&self) {
        if let Some(run) = self.active_run() {
            info!("Stop requested, cancelling active discovery run");
            run.cancel();
        }
    }

    pub fn active_run(&self) -> Option<Arc<DiscoveryRun>> {
        self.active.lock().unwrap().clone()
    }

    /// Installs a run and drives one full sweep inline, returning the
    /// accumulated set. This is the calendar-feed path; `start` is the
    /// fire-and-forget path.
    pub async fn collect<I, S>(&self, names: I) -> Result<Vec<Gig>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let run = self.install(names)?;
        run.run_pass().await;
        Ok(run.gigs())
    }

    fn install<I, S>(&self, names: I) -> Result<Arc<DiscoveryRun>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selection = ArtistSelection::new(names);
        let run = Arc::new(DiscoveryRun::new(
            selection,
            self.source.clone(),
            self.observers.clone(),
        )?);

        let mut active = self.active.lock().unwrap();
        if let Some(prev) = active.take() {
            info!("Superseding active discovery run");
            prev.cancel();
        }
        self.observers.notify_cleared();
        *active = Some(run.clone());
        Ok(run)
    }

    fn spawn_pass(run: &Arc<DiscoveryRun>) {
        let run = run.clone();
        tokio::spawn(async move {
            run.run_pass().await;
        });
    }
}
