use crate::domain::Gig;
use crate::error::{AgendaError, Result};
use chrono::DateTime;
use deunicode::deunicode;

/// Raw gig candidate as extracted from the events source.
pub type RawGigData = serde_json::Value;

/// Converts a raw candidate into the canonical [`Gig`] record.
///
/// Every field is extracted defensively and individually optional, except the
/// event start timestamp: a candidate without a parseable `evt_date` is
/// rejected. Text fields are ASCII-folded so deduplication and search
/// matching behave consistently across locales.
pub fn normalize(raw: &RawGigData, artist: &str) -> Result<Gig> {
    let date_str = raw
        .get("evt_date")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AgendaError::MalformedRecord("missing evt_date".to_string()))?;
    let starts_at = parse_event_date(date_str)?;

    Ok(Gig {
        artist: deunicode(artist.trim()),
        venue: text_field(raw, "venue"),
        location: text_field(raw, "location"),
        starts_at,
        event_url: link_field(raw, "evt_link"),
        image_url: link_field(raw, "img_link"),
        status: text_field(raw, "status"),
    })
}

fn text_field(raw: &RawGigData, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(|v| v.as_str())
        .map(|s| deunicode(s.trim()))
        .filter(|s| !s.is_empty())
}

// Links are kept verbatim; folding would corrupt percent-encoded URLs.
fn link_field(raw: &RawGigData, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_event_date(s: &str) -> Result<chrono::DateTime<chrono::FixedOffset>> {
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .map_err(|e| AgendaError::MalformedRecord(format!("bad evt_date '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_full_candidate() {
        let raw = json!({
            "evt_date": "2026-09-01T20:00:00+0200",
            "venue": "Kantine am Berghain",
            "location": "Berlin, Germany",
            "evt_link": "https://www.songkick.com/concerts/1",
            "img_link": "https://images.sk-static.com/a.jpg",
            "status": "cancelled",
        });

        let gig = normalize(&raw, "Motörhead").unwrap();
        assert_eq!(gig.artist, "Motorhead");
        assert_eq!(gig.venue.as_deref(), Some("Kantine am Berghain"));
        assert_eq!(gig.location.as_deref(), Some("Berlin, Germany"));
        assert_eq!(gig.status.as_deref(), Some("cancelled"));
        assert_eq!(gig.starts_at.to_rfc3339(), "2026-09-01T20:00:00+02:00");
    }

    #[test]
    fn missing_timestamp_rejects_candidate() {
        let raw = json!({ "venue": "Somewhere" });
        let err = normalize(&raw, "Artist").unwrap_err();
        assert!(matches!(err, AgendaError::MalformedRecord(_)));
    }

    #[test]
    fn unparseable_timestamp_rejects_candidate() {
        let raw = json!({ "evt_date": "next friday" });
        assert!(normalize(&raw, "Artist").is_err());

        // Date-only strings carry no offset and are rejected too
        let raw = json!({ "evt_date": "2026-09-01" });
        assert!(normalize(&raw, "Artist").is_err());
    }

    #[test]
    fn rfc3339_timestamps_accepted() {
        let raw = json!({ "evt_date": "2026-09-01T20:00:00+02:00" });
        assert!(normalize(&raw, "Artist").is_ok());
    }

    #[test]
    fn blank_fields_become_absent() {
        let raw = json!({
            "evt_date": "2026-09-01T20:00:00+0200",
            "venue": "   ",
            "location": null,
        });
        let gig = normalize(&raw, "Artist").unwrap();
        assert!(gig.venue.is_none());
        assert!(gig.location.is_none());
    }
}
