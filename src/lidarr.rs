use crate::config::LidarrConfig;
use crate::error::Result;
use deunicode::deunicode_with_tofu;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Read-only client for the music-library manager. The library is consumed
/// at selection-build time only; adding artists back is a separate workflow.
pub struct LidarrClient {
    client: reqwest::Client,
    address: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct LidarrArtist {
    #[serde(rename = "artistName")]
    artist_name: String,
}

impl LidarrClient {
    pub fn new(config: &LidarrConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            address: config.address.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Lists artist display names known to the library, ASCII-folded and
    /// sorted case-insensitively. Glyphs with no ASCII counterpart fold to a
    /// space rather than a replacement marker.
    pub async fn artist_names(&self) -> Result<Vec<String>> {
        info!("Getting artists from Lidarr");
        let endpoint = format!("{}/api/v1/artist", self.address);
        let artists: Vec<LidarrArtist> = self
            .client
            .get(&endpoint)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut names: Vec<String> = artists
            .into_iter()
            .map(|artist| deunicode_with_tofu(artist.artist_name.trim(), " "))
            .filter(|name| !name.is_empty())
            .collect();
        names.sort_by_key(|name| name.to_lowercase());

        info!("{} artists known to Lidarr", names.len());
        Ok(names)
    }
}
