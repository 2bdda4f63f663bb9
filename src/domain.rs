use chrono::{DateTime, FixedOffset};
use deunicode::deunicode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single upcoming concert for a tracked artist.
///
/// The source assigns no identifier of its own; two gigs are the same gig
/// when artist, start timestamp and venue all match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gig {
    pub artist: String,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<FixedOffset>,
    pub event_url: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

/// Identity tuple used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GigKey {
    pub artist: String,
    pub starts_at: DateTime<FixedOffset>,
    pub venue: Option<String>,
}

impl Gig {
    pub fn dedup_key(&self) -> GigKey {
        GigKey {
            artist: self.artist.to_lowercase(),
            starts_at: self.starts_at,
            venue: self.venue.as_ref().map(|v| v.to_lowercase()),
        }
    }
}

/// The ordered set of artist names a discovery run was started with.
///
/// Names are ASCII-folded; duplicates (case-insensitive) collapse to the
/// first occurrence. Immutable for the duration of a run.
#[derive(Debug, Clone, Default)]
pub struct ArtistSelection {
    names: Vec<String>,
}

impl ArtistSelection {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut folded = Vec::new();
        for raw in names {
            let name = deunicode(raw.as_ref().trim());
            if name.is_empty() {
                continue;
            }
            if seen.insert(name.to_lowercase()) {
                folded.push(name);
            }
        }
        Self { names: folded }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Accumulated result set of a discovery run. Insertion order is preserved;
/// a gig whose key is already present is rejected.
#[derive(Debug, Default)]
pub struct GigSet {
    seen: HashSet<GigKey>,
    items: Vec<Gig>,
}

impl GigSet {
    pub fn insert(&mut self, gig: Gig) -> bool {
        if self.seen.insert(gig.dedup_key()) {
            self.items.push(gig);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Gig] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<Gig> {
        self.items.clone()
    }
}
