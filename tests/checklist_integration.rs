//! Integration tests for checklist compilation.

use assert_cmd::cargo::cargo_bin_cmd;
use birdspot::checklist::read_species_file;
use httpmock::prelude::*;
use predicates::prelude::*;

const CHECKLIST_PAGE: &str = r#"<html><body>
<h1>State checklist</h1>
<p class="species"><strong>Snow Goose</strong> <em>Anser caerulescens</em></p>
<p class="species">Ross&#39;s Goose <em>Anser rossii</em> (review list)</p>
<p class="intro">Not a species entry.</p>
</body></html>"#;

#[test]
fn test_checklist_saves_species_csv() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/checklist");
        then.status(200)
            .header("content-type", "text/html")
            .body(CHECKLIST_PAGE);
    });

    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("species.csv");

    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("checklist")
        .arg("--url")
        .arg(server.url("/checklist"))
        .arg("--output")
        .arg(&output);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Saved 2 species"));

    page.assert();
    let species = read_species_file(&output).unwrap();
    assert_eq!(species, vec!["Snow Goose", "Ross's Goose"]);
}

#[test]
fn test_checklist_rejects_page_without_species() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/checklist");
        then.status(200)
            .body("<html><body><p>Nothing here.</p></body></html>");
    });

    let temp = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("checklist")
        .arg("--url")
        .arg(server.url("/checklist"))
        .arg("--output")
        .arg(temp.path().join("species.csv"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no species entries found"));
}

#[test]
fn test_checklist_surfaces_http_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/checklist");
        then.status(404);
    });

    let temp = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("checklist")
        .arg("--url")
        .arg(server.url("/checklist"))
        .arg("--output")
        .arg(temp.path().join("species.csv"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("request to"));
}
