//! Integration tests for the dataset scrape loop.

use birdspot::error::Error;
use birdspot::flickr::FlickrClient;
use birdspot::scrape::{ScrapeOptions, run_scrape};
use httpmock::prelude::*;
use image::{ImageBuffer, Rgb};
use serde_json::json;
use std::io::Cursor;
use std::path::Path;

fn jpeg_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    ImageBuffer::from_pixel(8, 8, Rgb([30u8, 90, 200]))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .unwrap();
    bytes
}

fn search_body(server: &MockServer, id: &str) -> serde_json::Value {
    json!({
        "photos": {
            "page": 1,
            "pages": 1,
            "photo": [{
                "id": id,
                "secret": "s",
                "server": "65535",
                "farm": 66,
                "title": "bird",
                "url_o": server.url(format!("/photos/{id}.jpg"))
            }]
        },
        "stat": "ok"
    })
}

fn options(dataset_dir: &Path, max_rounds: u32) -> ScrapeOptions {
    ScrapeOptions {
        dataset_dir: dataset_dir.to_path_buf(),
        per_species: 1,
        concurrency: 2,
        max_rounds,
        licenses: "1,2,3,4,5".to_string(),
        quiet: true,
    }
}

fn client_for(server: &MockServer) -> FlickrClient {
    FlickrClient::with_endpoint(reqwest::Client::new(), "test-key", server.url("/rest"))
}

#[test]
fn test_scrape_round_ends_clean() {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(GET).path("/rest");
        then.status(200).json_body(search_body(&server, "7"));
    });
    let photo = server.mock(|when, then| {
        when.method(GET).path("/photos/7.jpg");
        then.status(200)
            .header("content-type", "image/jpeg")
            .body(jpeg_bytes());
    });

    let temp = tempfile::tempdir().unwrap();
    let species = vec!["Mallard".to_string()];
    let rt = tokio::runtime::Runtime::new().unwrap();

    let summary = rt
        .block_on(run_scrape(
            &client_for(&server),
            &options(temp.path(), 3),
            &species,
        ))
        .unwrap();

    assert_eq!(summary.species, 1);
    assert_eq!(summary.images_downloaded, 1);
    assert_eq!(summary.rounds, 1);
    search.assert();
    photo.assert();
    assert!(temp.path().join("Mallard").join("Mallard_0.jpg").exists());
}

#[test]
fn test_scrape_refetches_until_rounds_exhausted() {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(GET).path("/rest");
        then.status(200).json_body(search_body(&server, "7"));
    });
    // Zero-byte downloads are flagged by the verify pass and removed
    let photo = server.mock(|when, then| {
        when.method(GET).path("/photos/7.jpg");
        then.status(200).body("");
    });

    let temp = tempfile::tempdir().unwrap();
    let species = vec!["Mallard".to_string()];
    let rt = tokio::runtime::Runtime::new().unwrap();

    let err = rt
        .block_on(run_scrape(
            &client_for(&server),
            &options(temp.path(), 2),
            &species,
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::DatasetIncomplete {
            defects: 1,
            rounds: 2
        }
    ));
    assert_eq!(search.hits(), 2);
    assert_eq!(photo.hits(), 2);
    assert!(!temp.path().join("Mallard").join("Mallard_0.jpg").exists());
}

#[test]
fn test_scrape_refetches_only_defective_species() {
    let server = MockServer::start();
    let grebe_search = server.mock(|when, then| {
        when.method(GET).path("/rest").query_param("text", "Grebe");
        then.status(200).json_body(search_body(&server, "1"));
    });
    let mallard_search = server.mock(|when, then| {
        when.method(GET)
            .path("/rest")
            .query_param("text", "Mallard");
        then.status(200).json_body(search_body(&server, "2"));
    });
    let good_photo = server.mock(|when, then| {
        when.method(GET).path("/photos/1.jpg");
        then.status(200)
            .header("content-type", "image/jpeg")
            .body(jpeg_bytes());
    });
    let bad_photo = server.mock(|when, then| {
        when.method(GET).path("/photos/2.jpg");
        then.status(200).body("");
    });

    let temp = tempfile::tempdir().unwrap();
    let species = vec!["Grebe".to_string(), "Mallard".to_string()];
    let rt = tokio::runtime::Runtime::new().unwrap();

    let err = rt
        .block_on(run_scrape(
            &client_for(&server),
            &options(temp.path(), 2),
            &species,
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::DatasetIncomplete {
            defects: 1,
            rounds: 2
        }
    ));
    // The clean species is fetched once; only the defective one again.
    assert_eq!(grebe_search.hits(), 1);
    assert_eq!(good_photo.hits(), 1);
    assert_eq!(mallard_search.hits(), 2);
    assert_eq!(bad_photo.hits(), 2);
    assert!(temp.path().join("Grebe").join("Grebe_0.jpg").exists());
}

#[test]
fn test_scrape_surfaces_search_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest");
        then.status(200)
            .json_body(json!({"stat": "fail", "code": 100, "message": "Invalid API Key"}));
    });

    let temp = tempfile::tempdir().unwrap();
    let species = vec!["Mallard".to_string()];
    let rt = tokio::runtime::Runtime::new().unwrap();

    let err = rt
        .block_on(run_scrape(
            &client_for(&server),
            &options(temp.path(), 2),
            &species,
        ))
        .unwrap_err();

    assert!(matches!(err, Error::FlickrApi { .. }));
}
