//! Data structures for photo API responses.

use crate::error::{Error, Result};
use serde::Deserialize;

/// Single photo entry in a search result.
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    /// Photo id.
    pub id: String,
    /// Photo secret used in static URLs.
    pub secret: String,
    /// Server the photo is hosted on.
    pub server: String,
    /// Server farm number.
    pub farm: u32,
    /// Photo title.
    #[serde(default)]
    pub title: String,
    /// Original-size URL, present when the owner exposes it.
    #[serde(default)]
    pub url_o: Option<String>,
}

impl Photo {
    /// URL to fetch: the original-size URL when available, otherwise the
    /// static farm URL built from id, secret, server and farm.
    pub fn source_url(&self) -> String {
        self.url_o.clone().unwrap_or_else(|| {
            format!(
                "https://farm{}.staticflickr.com/{}/{}_{}.jpg",
                self.farm, self.server, self.id, self.secret
            )
        })
    }
}

/// One page of search results.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoPage {
    /// Current page number (1-based).
    pub page: u32,
    /// Total pages available.
    pub pages: u32,
    /// Photos on this page.
    pub photo: Vec<Photo>,
}

/// Raw search response envelope.
///
/// The API returns HTTP 200 for its own failures and signals them through
/// `stat`, so the envelope carries both shapes.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    photos: Option<PhotoPage>,
    stat: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

impl SearchResponse {
    /// Unwrap the envelope, mapping `stat=fail` to an API error.
    pub(crate) fn into_page(self) -> Result<PhotoPage> {
        if self.stat == "ok" {
            self.photos.ok_or_else(|| Error::Internal {
                message: "search response missing photos".to_string(),
            })
        } else {
            Err(Error::FlickrApi {
                code: self.code.unwrap_or(0),
                message: self
                    .message
                    .unwrap_or_else(|| "unknown API error".to_string()),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_source_url_prefers_original() {
        let photo = Photo {
            id: "123".into(),
            secret: "abc".into(),
            server: "65535".into(),
            farm: 66,
            title: "Mallard".into(),
            url_o: Some("https://live.staticflickr.com/65535/123_orig.jpg".into()),
        };
        assert_eq!(
            photo.source_url(),
            "https://live.staticflickr.com/65535/123_orig.jpg"
        );
    }

    #[test]
    fn test_source_url_farm_fallback() {
        let photo = Photo {
            id: "123".into(),
            secret: "abc".into(),
            server: "65535".into(),
            farm: 66,
            title: String::new(),
            url_o: None,
        };
        assert_eq!(
            photo.source_url(),
            "https://farm66.staticflickr.com/65535/123_abc.jpg"
        );
    }

    #[test]
    fn test_envelope_ok_decodes() {
        let raw = r#"{
            "photos": {
                "page": 1,
                "pages": 3,
                "photo": [
                    {"id": "1", "secret": "s", "server": "srv", "farm": 9, "title": "t"}
                ]
            },
            "stat": "ok"
        }"#;

        let envelope: SearchResponse = serde_json::from_str(raw).unwrap();
        let page = envelope.into_page().unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 3);
        assert_eq!(page.photo.len(), 1);
        assert!(page.photo[0].url_o.is_none());
    }

    #[test]
    fn test_envelope_fail_maps_to_api_error() {
        let raw = r#"{"stat": "fail", "code": 100, "message": "Invalid API Key"}"#;

        let envelope: SearchResponse = serde_json::from_str(raw).unwrap();
        let err = envelope.into_page().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("100"));
        assert!(message.contains("Invalid API Key"));
    }
}
