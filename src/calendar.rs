use crate::cache::{self, ArtifactCache};
use crate::controller::RunController;
use crate::domain::Gig;
use crate::error::Result;
use crate::filter;
use chrono::Utc;
use icalendar::{Calendar, Component, Event, EventLike};
use std::sync::Arc;
use tracing::info;

/// Renders the accumulated gig set as iCalendar text, one VEVENT per gig.
pub fn render(gigs: &[Gig]) -> String {
    let mut calendar = Calendar::new();
    calendar.name("Upcoming gigs");

    for gig in gigs {
        let venue = gig.venue.as_deref().unwrap_or("TBA");
        let mut event = Event::new();
        event.summary(&format!("{} at {}", gig.artist, venue));
        event.starts(gig.starts_at.with_timezone(&Utc));
        event.ends(gig.starts_at.with_timezone(&Utc));

        let location = match gig.location.as_deref() {
            Some(loc) => format!("{}, {}", venue, loc),
            None => venue.to_string(),
        };
        event.location(&location);

        if let Some(url) = &gig.event_url {
            event.add_property("URL", url);
        }
        if let Some(status) = &gig.status {
            event.description(status);
        }
        calendar.push(event.done());
    }

    calendar.to_string()
}

/// Caller-facing facade for the calendar feed: discovery, filtering and
/// rendering behind a daily content-addressed cache. Repeated requests for
/// the same selection on the same day are served without re-scraping.
pub struct CalendarFeed {
    controller: Arc<RunController>,
    cache: ArtifactCache,
}

impl CalendarFeed {
    pub fn new(controller: Arc<RunController>) -> Self {
        Self {
            controller,
            cache: ArtifactCache::new(),
        }
    }

    pub async fn agenda(&self, countries: &[String], artists: &[String]) -> Result<String> {
        let fingerprint = cache::fingerprint(countries, artists, Utc::now().date_naive());
        self.cache
            .get_or_compute(&fingerprint, || async {
                let gigs = self.controller.collect(artists.iter()).await?;
                let kept: Vec<Gig> = gigs
                    .into_iter()
                    .filter(|gig| filter::passes(gig, countries))
                    .collect();
                info!("Rendering {} gigs into calendar feed", kept.len());
                Ok(render(&kept))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gig(artist: &str, venue: Option<&str>, location: Option<&str>) -> Gig {
        Gig {
            artist: artist.to_string(),
            venue: venue.map(str::to_string),
            location: location.map(str::to_string),
            starts_at: chrono::DateTime::parse_from_rfc3339("2026-09-01T20:00:00+02:00").unwrap(),
            event_url: Some("https://www.songkick.com/concerts/1".to_string()),
            image_url: None,
            status: None,
        }
    }

    #[test]
    fn renders_one_vevent_per_gig() {
        let ical = render(&[
            gig("Radiohead", Some("Waldbuehne"), Some("Berlin, Germany")),
            gig("Bjork", None, None),
        ]);

        assert!(ical.contains("BEGIN:VCALENDAR"));
        assert_eq!(ical.matches("BEGIN:VEVENT").count(), 2);
        assert!(ical.contains("SUMMARY:Radiohead at Waldbuehne"));
        assert!(ical.contains("LOCATION:"));
        assert!(ical.contains("SUMMARY:Bjork at TBA"));
    }

    #[test]
    fn empty_set_renders_empty_calendar() {
        let ical = render(&[]);
        assert!(ical.contains("BEGIN:VCALENDAR"));
        assert!(!ical.contains("BEGIN:VEVENT"));
    }
}
