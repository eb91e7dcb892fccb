//! Photo API search client.

use super::types::{Photo, PhotoPage, SearchResponse};
use crate::constants::flickr;
use crate::error::{Error, Result};
use reqwest::Client;
use tracing::debug;

/// Client for the photo API's REST search method.
///
/// Searches are restricted to public photos under redistribution-friendly
/// licenses, sorted by relevance.
#[derive(Debug, Clone)]
pub struct FlickrClient {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl FlickrClient {
    /// Create a client against the public REST endpoint.
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self::with_endpoint(http, api_key, flickr::REST_URL)
    }

    /// Create a client against a custom endpoint (used by tests).
    pub fn with_endpoint(
        http: Client,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Fetch one page of public photo results for a free-text query.
    pub async fn search(&self, text: &str, licenses: &str, per_page: u32, page: u32) -> Result<PhotoPage> {
        let params = [
            ("method", flickr::METHOD_SEARCH.to_string()),
            ("api_key", self.api_key.clone()),
            ("text", text.to_string()),
            ("privacy_filter", flickr::PRIVACY_PUBLIC.to_string()),
            ("content_types", flickr::CONTENT_TYPE_PHOTOS.to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
            ("sort", flickr::SORT_RELEVANCE.to_string()),
            ("license", licenses.to_string()),
            ("extras", flickr::EXTRAS.to_string()),
            ("format", "json".to_string()),
            ("nojsoncallback", "1".to_string()),
        ];

        let response = self
            .http
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::HttpRequest {
                url: self.endpoint.clone(),
                source: e,
            })?;

        let envelope: SearchResponse =
            response.json().await.map_err(|e| Error::HttpRequest {
                url: self.endpoint.clone(),
                source: e,
            })?;

        envelope.into_page()
    }

    /// Walk search pages until `limit` photos are collected or results run out.
    pub async fn walk(&self, text: &str, licenses: &str, limit: u32) -> Result<Vec<Photo>> {
        let per_page = limit.min(flickr::PAGE_SIZE);
        let mut photos: Vec<Photo> = Vec::with_capacity(limit as usize);
        let mut page = 1;

        loop {
            let result = self.search(text, licenses, per_page, page).await?;
            debug!(
                query = text,
                page = result.page,
                pages = result.pages,
                count = result.photo.len(),
                "fetched search page"
            );

            let empty = result.photo.is_empty();
            photos.extend(result.photo);

            if photos.len() >= limit as usize || page >= result.pages || empty {
                break;
            }
            page += 1;
        }

        photos.truncate(limit as usize);
        Ok(photos)
    }
}
