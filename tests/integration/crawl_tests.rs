//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the listing site and run the
//! full fetch/extract/aggregate/write cycle end-to-end.

use hn_harvest::config::{Config, CrawlMode, CrawlerConfig};
use hn_harvest::crawler::{harvest, Coordinator};
use hn_harvest::output::{load_records, write_records};
use hn_harvest::url::Site;
use hn_harvest::{HarvestError, Record};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration without pacing delays
fn create_test_config(parallelism: u32, mode: CrawlMode) -> Config {
    Config {
        crawler: CrawlerConfig {
            parallelism,
            random_delay_ms: 0,
            retry_delay_ms: 20,
            max_attempts: 5,
            mode,
        },
        ..Config::default()
    }
}

/// Site pointing at the mock server, allow-listed to its host
fn mock_site(server: &MockServer) -> Site {
    Site::new(&format!("{}/news", server.uri()), ["127.0.0.1"]).expect("valid mock site")
}

/// Renders a listing page in the site's markup
fn listing_page(entries: &[(&str, &str)]) -> String {
    let rows: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, (title, link))| {
            format!(
                r#"<tr class="athing submission" id="{id}">
                    <td align="right" valign="top" class="title"><span class="rank">{id}.</span></td>
                    <td class="title"><span class="titleline"><a href="{link}">{title}</a>
                    <span class="sitebit comhead"> (<a href="from?site=x.example"><span class="sitestr">x.example</span></a>)</span></span></td>
                </tr>
                <tr><td colspan="2"></td><td class="subtext">100 points</td></tr>
                <tr class="spacer" style="height:5px"></tr>"#,
                id = i + 1,
            )
        })
        .collect();
    format!(
        "<html><head><title>Hacker News</title></head><body><table>{}</table></body></html>",
        rows.join("\n")
    )
}

/// Mounts a page that answers 200 with `count` generated rows
async fn mount_page(server: &MockServer, page: u32, count: usize) {
    let entries: Vec<(String, String)> = (0..count)
        .map(|i| {
            (
                format!("Page {} story {}", page, i),
                format!("https://p{}.example/{}", page, i),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = entries
        .iter()
        .map(|(t, l)| (t.as_str(), l.as_str()))
        .collect();

    Mock::given(method("GET"))
        .and(path("/news"))
        .and(query_param("p", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&borrowed)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_page_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .and(query_param("p", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&[("Show HN: X", "https://x.example")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(create_test_config(4, CrawlMode::Bounded), mock_site(&server))
        .expect("Failed to create coordinator");
    let report = coordinator.run(1).await.expect("Crawl failed");

    let expected = vec![Record::new("Show HN: X", "https://x.example").unwrap()];
    assert_eq!(report.records, expected);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("hackernews.json");
    write_records(&output, &report.records).expect("Failed to write output");

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "[\n  {\n    \"title\": \"Show HN: X\",\n    \"link\": \"https://x.example\"\n  }\n]\n"
    );
    assert_eq!(load_records(&output).unwrap(), expected);
}

#[tokio::test]
async fn test_retry_after_service_unavailable_contributes_once() {
    let server = MockServer::start().await;

    // First request gets a 503, every later one the real page
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&[("Recovered", "https://recovered.example")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Default retry delay of 3 seconds
    let mut config = create_test_config(4, CrawlMode::Bounded);
    config.crawler.retry_delay_ms = CrawlerConfig::default().retry_delay_ms;

    let coordinator = Coordinator::new(config, mock_site(&server)).unwrap();
    let start = Instant::now();
    let report = coordinator.run(1).await.expect("Crawl failed");

    assert!(start.elapsed() >= Duration::from_secs(3));
    assert_eq!(
        report.records,
        vec![Record::new("Recovered", "https://recovered.example").unwrap()]
    );
    assert_eq!(report.stats.retries, 1);
    assert_eq!(report.stats.pages_done, 1);
    assert_eq!(report.stats.pages_failed, 0);
}

#[tokio::test]
async fn test_result_size_is_sum_of_page_extractions() {
    for parallelism in [1, 3, 8] {
        let server = MockServer::start().await;
        let counts = [30, 0, 17, 30, 5, 12];
        for (i, count) in counts.iter().enumerate() {
            mount_page(&server, i as u32 + 1, *count).await;
        }

        let coordinator = Coordinator::new(
            create_test_config(parallelism, CrawlMode::Bounded),
            mock_site(&server),
        )
        .unwrap();
        let report = coordinator.run(counts.len() as u32).await.unwrap();

        assert_eq!(report.records.len(), counts.iter().sum::<usize>());
        assert_eq!(report.stats.pages_done, counts.len() as u32);

        // Every page's records arrive exactly once
        for (i, count) in counts.iter().enumerate() {
            let prefix = format!("Page {} story", i + 1);
            let found = report
                .records
                .iter()
                .filter(|r| r.title().starts_with(&prefix))
                .count();
            assert_eq!(found, *count, "page {} with parallelism {}", i + 1, parallelism);
        }
    }
}

#[tokio::test]
async fn test_unbounded_mode_fetches_all_pages() {
    let server = MockServer::start().await;
    for page in 1..=5 {
        mount_page(&server, page, 3).await;
    }

    let coordinator = Coordinator::new(
        create_test_config(1, CrawlMode::Unbounded),
        mock_site(&server),
    )
    .unwrap();
    let report = coordinator.run(5).await.unwrap();

    assert_eq!(report.records.len(), 15);
    assert!(report.stats.is_complete());
}

#[tokio::test]
async fn test_permanent_failures_are_dropped_not_fatal() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 4).await;
    Mock::given(method("GET"))
        .and(query_param("p", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("p", "3"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator =
        Coordinator::new(create_test_config(2, CrawlMode::Bounded), mock_site(&server)).unwrap();
    let report = coordinator.run(3).await.unwrap();

    assert_eq!(report.records.len(), 4);
    assert_eq!(report.stats.pages_done, 1);
    assert_eq!(report.stats.pages_failed, 2);
    assert_eq!(report.stats.retries, 0);
}

#[tokio::test]
async fn test_invalid_page_count_issues_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let coordinator =
        Coordinator::new(create_test_config(4, CrawlMode::Bounded), mock_site(&server)).unwrap();
    let result = coordinator.run(0).await;

    assert!(matches!(result, Err(HarvestError::InvalidPageCount(0))));
}

#[tokio::test]
async fn test_concurrency_ceiling_is_respected() {
    let server = MockServer::start().await;
    for page in 1..=6 {
        Mock::given(method("GET"))
            .and(query_param("p", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(listing_page(&[("slow", "https://slow.example")]))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;
    }

    // Six 200ms pages with two slots need at least three rounds
    let coordinator =
        Coordinator::new(create_test_config(2, CrawlMode::Bounded), mock_site(&server)).unwrap();
    let start = Instant::now();
    let report = coordinator.run(6).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(600));
    assert_eq!(report.records.len(), 6);
}

#[tokio::test]
async fn test_harvest_entry_point_runs_full_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 2).await;
    mount_page(&server, 2, 3).await;

    let report = harvest(
        create_test_config(2, CrawlMode::Bounded),
        mock_site(&server),
        2,
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.records.len(), 5);
    assert_eq!(report.stats.pages_done, 2);
}

#[tokio::test]
async fn test_harvest_rejects_invalid_config() {
    let server = MockServer::start().await;
    let mut config = create_test_config(4, CrawlMode::Bounded);
    config.crawler.parallelism = 0;

    let result = harvest(config, mock_site(&server), 1).await;
    assert!(matches!(result, Err(HarvestError::Config(_))));
}
