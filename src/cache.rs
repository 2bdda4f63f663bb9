use crate::error::Result;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use tracing::{debug, info};

/// Computes the stable cache key for one (filters, artists, day) request.
///
/// Filter and artist lists are lowercased and sorted so equivalent requests
/// hash identically regardless of ordering; the calendar day rolls all keys
/// over at midnight.
pub fn fingerprint(countries: &[String], artists: &[String], day: NaiveDate) -> String {
    let mut countries: Vec<String> = countries.iter().map(|c| c.to_lowercase()).collect();
    countries.sort();
    let mut artists: Vec<String> = artists.iter().map(|a| a.to_lowercase()).collect();
    artists.sort();

    let mut s = String::new();
    for c in &countries {
        s.push_str(c);
        s.push('\x1f');
    }
    s.push('|');
    for a in &artists {
        s.push_str(a);
        s.push('\x1f');
    }
    s.push('|');
    s.push_str(&day.format("%Y-%m-%d").to_string());

    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

/// Memoizes finished aggregation artifacts by fingerprint for the process
/// lifetime. The compute future runs outside the cache lock; two concurrent
/// computations for the same fingerprint may both run, with the later store
/// winning. Single-flight is the run controller's concern, not the cache's.
#[derive(Default)]
pub struct ArtifactCache {
    entries: Mutex<HashMap<String, String>>,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_compute<F, Fut>(&self, fingerprint: &str, compute: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        {
            let entries = self.entries.lock().unwrap();
            if let Some(artifact) = entries.get(fingerprint) {
                info!("Returning cached artifact for {}", fingerprint);
                return Ok(artifact.clone());
            }
        }

        debug!("Cache miss for {}", fingerprint);
        let artifact = compute().await?;
        self.entries
            .lock()
            .unwrap()
            .insert(fingerprint.to_string(), artifact.clone());
        Ok(artifact)
    }
}
