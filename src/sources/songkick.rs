use super::GigSource;
use crate::config::SourceConfig;
use crate::error::{AgendaError, Result};
use crate::normalize::RawGigData;
use scraper::{Html, Selector};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Crawler for the Songkick public site. Resolving one artist takes two
/// fetches: a search-page fetch for the artist's canonical page, then a
/// calendar-page fetch for the event listings. A fixed delay follows each
/// fetch to stay inside the site's informal rate tolerance.
pub struct SongkickSource {
    client: reqwest::Client,
    base_url: String,
    fetch_delay: Duration,
}

impl SongkickSource {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fetch_delay: Duration::from_millis(config.fetch_delay_ms),
        }
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AgendaError::SourceUnavailable(e.to_string()))?
            .text()
            .await
            .map_err(|e| AgendaError::SourceUnavailable(e.to_string()))?;
        tokio::time::sleep(self.fetch_delay).await;
        Ok(body)
    }
}

#[async_trait::async_trait]
impl GigSource for SongkickSource {
    fn source_name(&self) -> &'static str {
        "songkick"
    }

    async fn lookup(&self, artist: &str) -> Result<Vec<RawGigData>> {
        info!("Searching for new gigs of {}", artist);
        let search_url = format!(
            "{}/search?query={}&type=",
            self.base_url,
            urlencoding::encode(artist)
        );
        let body = self.fetch(&search_url).await?;

        let Some(artist_path) = extract_artist_path(&body) else {
            info!("  nothing for {}", artist);
            return Ok(Vec::new());
        };

        let calendar_url = format!("{}{}/calendar", self.base_url, artist_path);
        info!("  fetching {}", calendar_url);
        let body = self.fetch(&calendar_url).await?;

        let gigs = extract_gigs(&body, &self.base_url);
        info!("  {} gigs found for {}", gigs.len(), artist);
        Ok(gigs)
    }
}

/// Pulls the artist's canonical page path out of the search results, if any.
fn extract_artist_path(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let artist_link_selector = Selector::parse(".artist .thumb.search-link").unwrap();
    document
        .select(&artist_link_selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string)
}

/// Extracts raw gig candidates from an artist calendar page. Each candidate
/// is a flat map; missing markup simply leaves the field out.
fn extract_gigs(body: &str, base_url: &str) -> Vec<RawGigData> {
    let document = Html::parse_document(body);

    let image_selector = Selector::parse(".profile-picture-wrap img.artist-profile-image").unwrap();
    let listing_selector =
        Selector::parse("ol.event-listings.tour-calendar-summary li.event-listing").unwrap();
    let link_selector = Selector::parse("a").unwrap();
    let date_selector = Selector::parse("a time").unwrap();
    let state_selector = Selector::parse(".event-details .item-state-tag").unwrap();
    let venue_selector = Selector::parse(".event-details .secondary-detail").unwrap();
    let location_selector = Selector::parse(".event-details .primary-detail").unwrap();

    let img_link = document
        .select(&image_selector)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(str::to_string);

    let mut gigs = Vec::new();
    for listing in document.select(&listing_selector) {
        let mut gig = serde_json::Map::new();

        if let Some(href) = listing
            .select(&link_selector)
            .next()
            .and_then(|el| el.value().attr("href"))
        {
            gig.insert(
                "evt_link".to_string(),
                Value::String(format!("{}{}", base_url, href)),
            );
        }

        if let Some(datetime) = listing
            .select(&date_selector)
            .next()
            .and_then(|el| el.value().attr("datetime"))
        {
            gig.insert("evt_date".to_string(), Value::String(datetime.to_string()));
        }

        for (key, selector) in [
            ("status", &state_selector),
            ("venue", &venue_selector),
            ("location", &location_selector),
        ] {
            if let Some(el) = listing.select(selector).next() {
                let text = el.text().collect::<String>().trim().to_string();
                if !text.is_empty() {
                    gig.insert(key.to_string(), Value::String(text));
                }
            }
        }

        if let Some(img) = &img_link {
            gig.insert("img_link".to_string(), Value::String(img.clone()));
        }

        debug!("  candidate: {:?}", gig);
        gigs.push(Value::Object(gig));
    }

    gigs
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_PAGE: &str = r#"
        <html><body>
          <ul class="search-results">
            <li class="artist">
              <a class="thumb search-link" href="/artists/29835-radiohead"><img src="x.jpg"/></a>
            </li>
          </ul>
        </body></html>"#;

    const CALENDAR_PAGE: &str = r#"
        <html><body>
          <div class="profile-picture-wrap">
            <img class="artist-profile-image" src="https://images.sk-static.com/radiohead.jpg"/>
          </div>
          <ol class="event-listings tour-calendar-summary">
            <li class="event-listing">
              <a href="/concerts/41149471">
                <time datetime="2026-09-01T20:00:00+0200"></time>
              </a>
              <div class="event-details">
                <p class="primary-detail">Berlin, Germany</p>
                <p class="secondary-detail">Waldbuehne</p>
              </div>
            </li>
            <li class="event-listing">
              <a href="/concerts/41149472">
                <time datetime="2026-09-03T19:30:00+0100"></time>
              </a>
              <div class="event-details">
                <span class="item-state-tag">cancelled</span>
                <p class="primary-detail">London, UK</p>
                <p class="secondary-detail">O2 Arena</p>
              </div>
            </li>
          </ol>
        </body></html>"#;

    #[test]
    fn finds_artist_path_in_search_results() {
        assert_eq!(
            extract_artist_path(SEARCH_PAGE).as_deref(),
            Some("/artists/29835-radiohead")
        );
        assert_eq!(extract_artist_path("<html><body></body></html>"), None);
    }

    #[test]
    fn extracts_gig_candidates_from_calendar() {
        let gigs = extract_gigs(CALENDAR_PAGE, "https://www.songkick.com");
        assert_eq!(gigs.len(), 2);

        let first = &gigs[0];
        assert_eq!(
            first["evt_link"].as_str(),
            Some("https://www.songkick.com/concerts/41149471")
        );
        assert_eq!(first["evt_date"].as_str(), Some("2026-09-01T20:00:00+0200"));
        assert_eq!(first["venue"].as_str(), Some("Waldbuehne"));
        assert_eq!(first["location"].as_str(), Some("Berlin, Germany"));
        assert_eq!(
            first["img_link"].as_str(),
            Some("https://images.sk-static.com/radiohead.jpg")
        );
        assert!(first.get("status").is_none());

        let second = &gigs[1];
        assert_eq!(second["status"].as_str(), Some("cancelled"));
    }

    #[test]
    fn page_without_listings_yields_no_candidates() {
        let gigs = extract_gigs("<html><body><p>no shows</p></body></html>", "https://x");
        assert!(gigs.is_empty());
    }
}
