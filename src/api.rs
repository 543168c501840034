use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// The catalog could not be reached or did not produce a usable response.
/// The variants exist for diagnostics only; callers treat them uniformly.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog returned HTTP {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Image {
    pub medium: Option<String>,
    pub original: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Rating {
    pub average: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Show {
    pub id: u64,
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub status: String,
    pub runtime: Option<u32>,
    pub premiered: Option<String>,
    #[serde(default)]
    pub rating: Rating,
    pub image: Option<Image>,
    pub summary: Option<String>,
}

// Episode summaries are always present in practice; shows are the ones that
// sometimes lack them.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Episode {
    pub id: u64,
    pub url: String,
    pub name: String,
    pub season: u32,
    pub number: u32,
    pub airdate: Option<String>,
    pub image: Option<Image>,
    pub summary: String,
}

/// Read access to the show/episode catalog. Implemented by [`CatalogClient`]
/// and by in-memory stubs in tests.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    async fn fetch_shows(&self) -> Result<Vec<Show>, CatalogError>;
    async fn fetch_episodes(&self, show_id: u64) -> Result<Vec<Episode>, CatalogError>;
}

pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, CatalogError> {
        debug!(%url, "catalog request");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status { status, url });
        }
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Catalog for CatalogClient {
    async fn fetch_shows(&self) -> Result<Vec<Show>, CatalogError> {
        self.get_json(format!("{}/shows", self.base_url)).await
    }

    async fn fetch_episodes(&self, show_id: u64) -> Result<Vec<Episode>, CatalogError> {
        self.get_json(format!("{}/shows/{}/episodes", self.base_url, show_id))
            .await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_record() {
        let json = r#"{
            "id": 82,
            "url": "https://www.tvmaze.com/shows/82/game-of-thrones",
            "name": "Game of Thrones",
            "genres": ["Drama", "Adventure"],
            "status": "Ended",
            "runtime": 60,
            "premiered": "2011-04-17",
            "rating": {"average": 9.1},
            "image": {"medium": "https://example.org/m.jpg", "original": null},
            "summary": "<p>Seven noble families.</p>"
        }"#;

        let show: Show = serde_json::from_str(json).expect("show should parse");
        assert_eq!(show.id, 82);
        assert_eq!(show.genres, vec!["Drama", "Adventure"]);
        assert_eq!(show.rating.average, Some(9.1));
        assert_eq!(
            show.image.as_ref().and_then(|i| i.medium.as_deref()),
            Some("https://example.org/m.jpg")
        );
        assert!(show.image.as_ref().is_some_and(|i| i.original.is_none()));
    }

    #[test]
    fn show_optional_fields_default() {
        let json = r#"{
            "id": 1,
            "url": "https://www.tvmaze.com/shows/1",
            "name": "Bare",
            "status": "Running",
            "runtime": null,
            "premiered": null,
            "image": null,
            "summary": null
        }"#;

        let show: Show = serde_json::from_str(json).expect("sparse show should parse");
        assert!(show.genres.is_empty());
        assert!(show.rating.average.is_none());
        assert!(show.summary.is_none());
    }

    #[test]
    fn parses_episode_record() {
        let json = r#"{
            "id": 4952,
            "url": "https://www.tvmaze.com/episodes/4952/winter-is-coming",
            "name": "Winter is Coming",
            "season": 1,
            "number": 1,
            "airdate": "2011-04-17",
            "image": null,
            "summary": "<p>Lord Stark is troubled.</p>"
        }"#;

        let ep: Episode = serde_json::from_str(json).expect("episode should parse");
        assert_eq!(ep.season, 1);
        assert_eq!(ep.number, 1);
        assert_eq!(ep.airdate.as_deref(), Some("2011-04-17"));
    }

    #[test]
    fn status_error_carries_diagnostics() {
        let err = CatalogError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            url: "https://api.tvmaze.com/shows".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("/shows"));
    }
}
