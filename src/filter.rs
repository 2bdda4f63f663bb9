use crate::domain::Gig;

/// Decides per-gig inclusion for a location filter.
///
/// Filters are country names/codes as they appear at the end of a free-text
/// location string, matched case-insensitively as suffixes. An empty filter
/// passes everything; a gig without a location fails any non-empty filter.
pub fn passes(gig: &Gig, countries: &[String]) -> bool {
    if countries.is_empty() {
        return true;
    }
    let Some(location) = gig.location.as_deref() else {
        return false;
    };
    let location = location.to_lowercase();
    countries
        .iter()
        .any(|country| location.ends_with(&country.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gig_at(location: Option<&str>) -> Gig {
        Gig {
            artist: "Artist".to_string(),
            venue: None,
            location: location.map(str::to_string),
            starts_at: chrono::DateTime::parse_from_rfc3339("2026-09-01T20:00:00+02:00").unwrap(),
            event_url: None,
            image_url: None,
            status: None,
        }
    }

    #[test]
    fn empty_filter_passes_everything() {
        assert!(passes(&gig_at(Some("Berlin, Germany")), &[]));
        assert!(passes(&gig_at(None), &[]));
    }

    #[test]
    fn suffix_match_is_case_insensitive() {
        let gig = gig_at(Some("Berlin, Germany"));
        assert!(passes(&gig, &["germany".to_string()]));
        assert!(passes(&gig, &["GERMANY".to_string()]));
        assert!(!passes(&gig, &["France".to_string()]));
    }

    #[test]
    fn any_filter_entry_suffices() {
        let gig = gig_at(Some("Lyon, France"));
        assert!(passes(
            &gig,
            &["Germany".to_string(), "France".to_string()]
        ));
    }

    #[test]
    fn missing_location_fails_nonempty_filter() {
        assert!(!passes(&gig_at(None), &["Germany".to_string()]));
    }

    #[test]
    fn prefix_or_infix_matches_do_not_pass() {
        let gig = gig_at(Some("Germany Town, Elsewhere"));
        assert!(!passes(&gig, &["Germany".to_string()]));
    }
}
