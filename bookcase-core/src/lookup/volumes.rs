//! Client for the remote volumes search endpoint

use crate::config::LookupConfig;
use crate::error::LookupError;
use crate::types::{Book, Cover, PLACEHOLDER_ISBN};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

/// The usable part of the first volume in a search response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMatch {
    pub title: String,
    pub authors: Vec<String>,
    pub thumbnail: Option<String>,
}

impl VolumeMatch {
    /// Book carrying the remote title and authors. Rating, ISBN and notes
    /// are left for the caller to fill in.
    pub fn to_book(&self) -> Book {
        Book::new(self.title.clone(), self.authors.join(",")).with_isbn(PLACEHOLDER_ISBN)
    }
}

/// Extract `items[0].volumeInfo` from a response body.
///
/// Only a body that is not JSON at all is an error. Returns `Ok(None)` when
/// the body holds no usable volume: no items, or a first item whose title or
/// authors are missing or of the wrong type. With `require_thumbnail` set, a
/// missing thumbnail link also counts as no usable volume.
pub fn parse_volumes(
    body: &[u8],
    require_thumbnail: bool,
) -> Result<Option<VolumeMatch>, LookupError> {
    let response: Value =
        serde_json::from_slice(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    let Some(info) = response
        .get("items")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("volumeInfo"))
    else {
        return Ok(None);
    };

    let Some(title) = info.get("title").and_then(Value::as_str) else {
        return Ok(None);
    };
    let Some(authors) = info
        .get("authors")
        .and_then(Value::as_array)
        .and_then(|authors| {
            authors
                .iter()
                .map(|a| a.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
    else {
        return Ok(None);
    };

    let thumbnail = info
        .get("imageLinks")
        .and_then(|links| links.get("thumbnail"))
        .and_then(Value::as_str)
        .map(str::to_string);
    if require_thumbnail && thumbnail.is_none() {
        debug!("Volume '{}' has no thumbnail link", title);
        return Ok(None);
    }

    Ok(Some(VolumeMatch {
        title: title.to_string(),
        authors,
        thumbnail,
    }))
}

/// HTTP client for metadata and cover requests
#[derive(Debug, Clone)]
pub struct VolumesClient {
    client: Client,
    endpoint: Url,
    require_thumbnail: bool,
}

impl VolumesClient {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| LookupError::InvalidUrl(format!("{}: {}", config.endpoint, e)))?;
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            require_thumbnail: config.require_cover_link,
        })
    }

    /// Query the endpoint with `identifier` as the free-text `q` parameter
    pub async fn find_volume(&self, identifier: &str) -> Result<Option<VolumeMatch>, LookupError> {
        debug!("Volumes request: {} q={}", self.endpoint, identifier);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", identifier)])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Volumes endpoint returned status {}", status);
            return Err(LookupError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.bytes().await?;
        parse_volumes(&body, self.require_thumbnail)
    }

    /// Download and recognize a cover image
    pub async fn download_cover(&self, thumbnail: &str) -> Result<Cover, LookupError> {
        let url = Url::parse(thumbnail)
            .map_err(|e| LookupError::InvalidUrl(format!("{}: {}", thumbnail, e)))?;
        debug!("Cover request: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(Cover::from_bytes(bytes.to_vec())?)
    }
}
