//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing and posting pages and run the
//! full load → plan → crawl → finalize cycle end-to-end.

use job_harvest::config::{
    CategoryEntry, Config, CrawlerConfig, OutputConfig, PacingMode, RegionEntry, SiteConfig,
    UserAgentConfig,
};
use job_harvest::crawler::{Coordinator, CrawlPhase, QR_CODE_ARTIFACT};
use job_harvest::state::JobRecord;
use job_harvest::storage::{CsvRecordStore, RecordStore};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{any, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(
    base_url: &str,
    regions: &[&str],
    target: usize,
    interval: usize,
    dir: &Path,
) -> Config {
    Config {
        crawler: CrawlerConfig {
            target_count: target,
            checkpoint_interval: interval,
            min_delay_ms: 0, // No politeness delay in tests
            max_delay_ms: 0,
            request_timeout_secs: 5,
            pacing: PacingMode::RandomDelay,
        },
        user_agent: UserAgentConfig::default(),
        site: SiteConfig {
            origin_template: format!("{}/{{region}}/", base_url),
            listing_path: "search/{category}".to_string(),
        },
        output: OutputConfig {
            records_path: dir.join("jobs.csv").display().to_string(),
            progress_path: dir.join("jobs_progress.csv").display().to_string(),
        },
        regions: regions
            .iter()
            .map(|code| RegionEntry {
                code: code.to_string(),
            })
            .collect(),
        categories: vec![CategoryEntry {
            code: "sof".to_string(),
            label: "software/web/info design".to_string(),
        }],
    }
}

fn records_path(dir: &TempDir) -> PathBuf {
    dir.path().join("jobs.csv")
}

fn progress_path(dir: &TempDir) -> PathBuf {
    dir.path().join("jobs_progress.csv")
}

fn listing_page(hrefs: &[String]) -> String {
    let cards: String = hrefs
        .iter()
        .map(|href| format!(r#"<div class="result-info"><a href="{}">Job</a></div>"#, href))
        .collect();
    format!("<html><head><title>listing</title></head><body>{}</body></html>", cards)
}

fn detail_page(title: &str) -> String {
    format!(
        r#"<html><body>
        <span class="postingtitletext"><span id="titletextonly">{}</span><span>(Downtown)</span></span>
        <div class="attrgroup"><span class="employment_type"><span class="valu">full-time</span></span></div>
        <section id="postingbody"><p>{}</p>We are hiring.</section>
        <p class="postinginfo"><time datetime="2024-05-01T09:00:00-0500">May 1</time></p>
        </body></html>"#,
        title, QR_CODE_ARTIFACT
    )
}

fn hrefs(region: &str, range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| format!("/{}/post/{}.html", region, i)).collect()
}

async fn mount_listing(server: &MockServer, region: &str, hrefs: &[String]) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/search/sof", region)))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(hrefs)))
        .mount(server)
        .await;
}

async fn mount_details(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/[a-z]+/post/\d+\.html$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("Rust Developer")))
        .mount(server)
        .await;
}

fn prior_records(base_url: &str, region: &str, range: std::ops::Range<usize>) -> Vec<JobRecord> {
    range
        .map(|i| JobRecord {
            url: format!("{}/{}/post/{}.html", base_url, region, i),
            title: format!("Prior {}", i),
            partition_region: region.to_string(),
            partition_category: "software/web/info design".to_string(),
            ..JobRecord::default()
        })
        .collect()
}

fn assert_unique(records: &[JobRecord]) {
    let urls: HashSet<&str> = records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls.len(), records.len(), "duplicate URLs in output");
}

#[tokio::test]
async fn test_resume_with_quota_per_partition() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = TempDir::new().unwrap();

    // Ten prior records: chicago posts 0..5 and 20..25
    let mut prior = prior_records(&base_url, "chicago", 0..5);
    prior.extend(prior_records(&base_url, "chicago", 20..25));
    CsvRecordStore::new(&records_path(&dir)).save(&prior).unwrap();

    // Chicago lists 8 posts, 5 already known; seattle lists 8 new posts
    mount_listing(&server, "chicago", &hrefs("chicago", 0..8)).await;
    mount_listing(&server, "seattle", &hrefs("seattle", 0..8)).await;

    // Known posts must never be requested again
    for i in 0..5 {
        Mock::given(method("GET"))
            .and(path(format!("/chicago/post/{}.html", i)))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
    }
    mount_details(&server).await;

    let config = create_test_config(&base_url, &["chicago", "seattle"], 20, 25, dir.path());
    let mut coordinator = Coordinator::new(config, false).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    // quota = 10 / 2 = 5: chicago contributes its 3 new posts, seattle 5
    assert_eq!(summary.loaded_records, 10);
    assert_eq!(summary.added_records, 8);
    assert_eq!(summary.total_records, 18);
    assert_eq!(coordinator.phase(), CrawlPhase::Done);

    let output = CsvRecordStore::new(&records_path(&dir)).load().unwrap();
    assert_eq!(output.len(), 18);
    assert_unique(&output);

    // Prior rows are kept first and untouched
    assert_eq!(&output[..10], &prior[..]);

    let seattle = output
        .iter()
        .filter(|r| r.partition_region == "seattle")
        .count();
    assert_eq!(seattle, 5);

    let new_record = output
        .iter()
        .find(|r| r.partition_region == "seattle")
        .unwrap();
    assert_eq!(new_record.title, "Rust Developer");
    assert_eq!(new_record.compensation, "");
    assert_eq!(new_record.employment_type, "full-time");
    assert_eq!(new_record.location, "Downtown");
    assert_eq!(new_record.description, "We are hiring.");
    assert_eq!(new_record.post_date, "2024-05-01T09:00:00-0500");
    assert_eq!(new_record.label, "");
}

#[tokio::test]
async fn test_target_already_met_makes_no_requests() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let prior = prior_records(&base_url, "austin", 0..7);
    CsvRecordStore::new(&records_path(&dir)).save(&prior).unwrap();
    let before = std::fs::read_to_string(records_path(&dir)).unwrap();

    let config = create_test_config(&base_url, &["austin"], 5, 25, dir.path());
    let mut coordinator = Coordinator::new(config, false).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.total_records, 7);
    assert_eq!(summary.added_records, 0);
    assert_eq!(coordinator.phase(), CrawlPhase::Done);

    let after = std::fs::read_to_string(records_path(&dir)).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_checkpoint_matches_in_memory_count() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = TempDir::new().unwrap();

    mount_listing(&server, "boston", &hrefs("boston", 0..5)).await;
    mount_details(&server).await;

    let config = create_test_config(&base_url, &["boston"], 5, 2, dir.path());
    let mut coordinator = Coordinator::new(config, false).unwrap();
    let summary = coordinator.run().await.unwrap();
    assert_eq!(summary.total_records, 5);

    // Last checkpoint happened at 4 records; the final write has all 5
    let progress = CsvRecordStore::new(&progress_path(&dir)).load().unwrap();
    let output = CsvRecordStore::new(&records_path(&dir)).load().unwrap();
    assert_eq!(progress.len(), 4);
    assert_eq!(output.len(), 5);
    assert_eq!(&output[..4], &progress[..]);
}

#[tokio::test]
async fn test_failed_listing_and_postings_do_not_abort() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/miami/search/sof"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    mount_listing(&server, "dallas", &hrefs("dallas", 0..4)).await;
    Mock::given(method("GET"))
        .and(path("/dallas/post/1.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dallas/post/2.html"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    mount_details(&server).await;

    let config = create_test_config(&base_url, &["miami", "dallas"], 100, 25, dir.path());
    let mut coordinator = Coordinator::new(config, false).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.total_records, 2);
    assert!(!summary.target_reached());

    let output = CsvRecordStore::new(&records_path(&dir)).load().unwrap();
    let urls: HashSet<String> = output.into_iter().map(|r| r.url).collect();
    assert!(urls.contains(&format!("{}/dallas/post/0.html", base_url)));
    assert!(urls.contains(&format!("{}/dallas/post/3.html", base_url)));
}

#[tokio::test]
async fn test_cross_listed_posts_collected_once() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = TempDir::new().unwrap();

    // Both regions list the same three postings
    let shared = hrefs("shared", 0..3);
    mount_listing(&server, "atlanta", &shared).await;
    mount_listing(&server, "austin", &shared).await;
    mount_details(&server).await;

    let config = create_test_config(&base_url, &["atlanta", "austin"], 10, 25, dir.path());
    let mut coordinator = Coordinator::new(config, false).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.total_records, 3);
    let output = CsvRecordStore::new(&records_path(&dir)).load().unwrap();
    assert_unique(&output);

    let requests = server.received_requests().await.unwrap();
    let detail_requests = requests
        .iter()
        .filter(|r| r.url.path().starts_with("/shared/post/"))
        .count();
    assert_eq!(detail_requests, 3);
}

#[tokio::test]
async fn test_fresh_run_ignores_prior_dataset() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = TempDir::new().unwrap();

    let prior = prior_records(&base_url, "seattle", 0..3);
    CsvRecordStore::new(&records_path(&dir)).save(&prior).unwrap();

    mount_listing(&server, "seattle", &hrefs("seattle", 0..3)).await;
    mount_details(&server).await;

    let config = create_test_config(&base_url, &["seattle"], 3, 25, dir.path());
    let mut coordinator = Coordinator::new(config, true).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.loaded_records, 0);
    assert_eq!(summary.added_records, 3);

    let output = CsvRecordStore::new(&records_path(&dir)).load().unwrap();
    assert!(output.iter().all(|r| r.title == "Rust Developer"));
}
