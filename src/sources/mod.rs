pub mod songkick;

pub use songkick::SongkickSource;

use crate::error::Result;
use crate::normalize::RawGigData;

/// A source of raw gig candidates, queried one artist at a time.
///
/// Implementations are pure functions of the artist name: they hold no run
/// state. A lookup failure covers that artist only; the discovery run treats
/// it as zero candidates and moves on.
#[async_trait::async_trait]
pub trait GigSource: Send + Sync {
    /// Unique identifier for this source
    fn source_name(&self) -> &'static str;

    /// Look up upcoming gigs for a single artist. An artist that cannot be
    /// resolved at the source yields an empty list, not an error.
    async fn lookup(&self, artist: &str) -> Result<Vec<RawGigData>>;
}
