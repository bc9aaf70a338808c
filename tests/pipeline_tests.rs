//! Pipeline tests against canned pages and a mocked video search

use async_trait::async_trait;
use beatleads::discover::{search_url, QUERY_TEMPLATES};
use beatleads::{
    Extraction, LeadError, LeadsConfig, PageRenderer, Pipeline, ProfileDiscoverer,
    ProfileExtractor, RenderedPage, SeedDiscoverer, SkipReason,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SC: &str = "https://soundcloud.com";

/// Serves fixed HTML per URL and records every render request
#[derive(Default)]
struct FakeRenderer {
    pages: HashMap<String, String>,
    log: Mutex<Vec<String>>,
}

impl FakeRenderer {
    fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn rendered(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn profile_renders(&self) -> Vec<String> {
        self.rendered()
            .into_iter()
            .filter(|u| !u.contains("/search?q="))
            .collect()
    }
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn render(&self, url: &str, _settle: Duration) -> beatleads::Result<RenderedPage> {
        self.log.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(html) => Ok(RenderedPage::new(url, html.clone())),
            None => Err(LeadError::Navigation {
                url: url.to_string(),
                reason: "NETWORK_ERROR".to_string(),
            }),
        }
    }
}

fn test_config() -> LeadsConfig {
    LeadsConfig {
        search_settle_ms: 0,
        profile_settle_ms: 0,
        ..LeadsConfig::default()
    }
}

fn search_page(hrefs: &[String]) -> String {
    let links: String = hrefs
        .iter()
        .map(|h| format!(r#"<li class="userItem"><a href="{}">{}</a></li>"#, h, h))
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", links)
}

fn profile_page(name: &str, bio: &str, extra: &str) -> String {
    format!(
        r#"<html><body>
        <h1 class="profileHeaderInfo__title">{}</h1>
        <div class="profileHeaderInfo__bio">{}</div>
        {}
        </body></html>"#,
        name, bio, extra
    )
}

#[tokio::test]
async fn system_page_is_never_rendered() {
    let renderer = FakeRenderer::default();
    let config = test_config();
    let extractor = ProfileExtractor::new(&renderer, &config);

    let result = extractor
        .extract("https://soundcloud.com/terms-of-use")
        .await
        .unwrap();
    assert_eq!(result, Extraction::NotFound(SkipReason::SystemPage));
    assert!(renderer.rendered().is_empty());
}

#[tokio::test]
async fn error_page_is_not_found() {
    let url = format!("{}/ghost", SC);
    let renderer = FakeRenderer::default().page(
        &url,
        &profile_page("Ghost", "", "<p>Sorry! Something went wrong</p>"),
    );
    let config = test_config();
    let result = ProfileExtractor::new(&renderer, &config)
        .extract(&url)
        .await
        .unwrap();
    assert_eq!(result, Extraction::NotFound(SkipReason::ErrorPage));
}

#[tokio::test]
async fn bio_instagram_without_dom_anchor() {
    let url = format!("{}/realartist", SC);
    let renderer = FakeRenderer::default().page(
        &url,
        &profile_page("Real Artist", "new music fridays<br>ig: @realartist", ""),
    );
    let config = test_config();
    let lead = ProfileExtractor::new(&renderer, &config)
        .extract(&url)
        .await
        .unwrap()
        .into_lead()
        .unwrap();
    assert_eq!(lead.name, "Real Artist");
    assert_eq!(lead.instagram, "https://instagram.com/realartist");
    assert_eq!(lead.url, url);
}

#[tokio::test]
async fn discovery_caps_urls_and_extraction() {
    let config = test_config();
    let producer = "Metro";
    let hrefs: Vec<String> = (0..30).map(|i| format!("/artist-{:02}", i)).collect();

    let mut renderer = FakeRenderer::default().page(
        &search_url(SC, "Metro"),
        &search_page(&hrefs),
    );
    for href in &hrefs {
        let url = format!("{}{}", SC, href);
        renderer = renderer.page(&url, &profile_page(&href[1..], "", ""));
    }

    let discoverer = ProfileDiscoverer::new(&renderer, &config);
    let candidates = discoverer.find_candidates(producer).await;
    assert_eq!(candidates.len(), 20);
    // first template filled the set, no further searches
    assert_eq!(renderer.rendered().len(), 1);

    let leads = discoverer.discover(producer).await;
    assert_eq!(leads.len(), 15);
    let expected: Vec<String> = hrefs[..15].iter().map(|h| format!("{}{}", SC, h)).collect();
    let urls: Vec<String> = leads.iter().map(|l| l.url.clone()).collect();
    assert_eq!(urls, expected);
    assert_eq!(renderer.profile_renders(), expected);
}

#[tokio::test]
async fn discovery_dedups_across_templates_and_skips_failures() {
    let config = test_config();
    let producer = "Wheezy";

    let first = vec![
        "/search?q=wheezy".to_string(),
        "/youngwave".to_string(),
        "/sunset-beats".to_string(),
        "/wheezy-fan/song-one".to_string(),
        "/tracks".to_string(),
        "/12345".to_string(),
    ];
    let second = vec!["/wheezy-fan".to_string(), "/other-fan".to_string()];

    let renderer = FakeRenderer::default()
        .page(&search_url(SC, "Wheezy"), &search_page(&first))
        .page(&search_url(SC, "prod Wheezy"), &search_page(&second))
        .page(
            &format!("{}/other-fan", SC),
            &profile_page("Other Fan", "", ""),
        );

    let discoverer = ProfileDiscoverer::new(&renderer, &config);
    let leads = discoverer.discover(producer).await;

    // every template was searched, in order, since the set never filled up
    let expected_searches: Vec<String> = QUERY_TEMPLATES
        .iter()
        .map(|t| search_url(SC, &t.replace("{name}", producer)))
        .collect();
    let rendered = renderer.rendered();
    assert_eq!(rendered[..QUERY_TEMPLATES.len()], expected_searches[..]);
    assert!(rendered.contains(&format!("{}/search?q=produced%20by%20Wheezy", SC)));
    assert!(rendered.contains(&format!("{}/search?q=x%20Wheezy", SC)));
    assert!(rendered.contains(&format!("{}/search?q=prod.%20Wheezy", SC)));

    // wheezy-fan has no page and fails to render; the batch continues
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].name, "Other Fan");
    assert_eq!(
        renderer.profile_renders(),
        vec![format!("{}/wheezy-fan", SC), format!("{}/other-fan", SC)],
    );
}

#[tokio::test]
async fn seeds_fallback_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = LeadsConfig {
        youtube_url: server.uri(),
        ..test_config()
    };
    let seeds = SeedDiscoverer::new(&config).unwrap();
    let names = seeds.discover("Drake", 5).await;
    assert_eq!(
        names,
        vec!["Drake Beats Producer", "Type Beat Maker", "Drake Style Beats"]
    );
}

#[tokio::test]
async fn seeds_fallback_on_transport_error() {
    let config = LeadsConfig {
        youtube_url: "http://127.0.0.1:1".to_string(),
        http_timeout_ms: 2000,
        ..test_config()
    };
    let seeds = SeedDiscoverer::new(&config).unwrap();
    assert_eq!(seeds.discover("Future", 5).await.len(), 3);
}

fn youtube_body(names: &[&str]) -> String {
    let runs: String = names
        .iter()
        .map(|n| format!(r#"{{"ownerText":{{"runs":[{{"text":"{} Type Beats"}}]}}}},"#, n))
        .collect();
    format!("<script>var ytInitialData = [{}];</script>", runs)
}

#[tokio::test]
async fn seeds_from_search_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("search_query", "Drake Type Beat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(youtube_body(&["Alpha", "Bravo", "Official Charlie", "Alpha", "Delta"])),
        )
        .mount(&server)
        .await;

    let config = LeadsConfig {
        youtube_url: server.uri(),
        ..test_config()
    };
    let seeds = SeedDiscoverer::new(&config).unwrap();
    assert_eq!(seeds.discover("Drake", 5).await, vec!["Alpha", "Bravo", "Delta"]);
    assert_eq!(seeds.discover("Drake", 2).await, vec!["Alpha", "Bravo"]);
}

const PRODUCERS: [&str; 5] = ["ProducerA", "ProducerB", "ProducerC", "ProducerD", "ProducerE"];

async fn mock_youtube(names: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(ResponseTemplate::new(200).set_body_string(youtube_body(names)))
        .mount(&server)
        .await;
    server
}

fn producer_renderer(with_instagram: bool) -> FakeRenderer {
    let mut renderer = FakeRenderer::default();
    for producer in PRODUCERS {
        let slug = producer.to_lowercase();
        let hrefs = vec![format!("/fan-one-{}", slug), format!("/fan-two-{}", slug)];
        renderer = renderer.page(&search_url(SC, producer), &search_page(&hrefs));

        let ig = if with_instagram {
            format!(r#"<a href="https://instagram.com/{}_one">IG</a>"#, slug)
        } else {
            String::new()
        };
        renderer = renderer
            .page(
                &format!("{}{}", SC, hrefs[0]),
                &profile_page(&format!("{} Fan One", producer), "beats", &ig),
            )
            .page(
                &format!("{}{}", SC, hrefs[1]),
                &profile_page(&format!("{} Fan Two", producer), "beats", ""),
            );
    }
    renderer
}

#[tokio::test]
async fn end_to_end_filters_to_instagram_leads() {
    let server = mock_youtube(&PRODUCERS).await;
    let config = LeadsConfig {
        youtube_url: server.uri(),
        ..test_config()
    };
    let renderer = producer_renderer(true);

    let pipeline = Pipeline::new(&renderer, &config).unwrap();
    let response = pipeline.run("Drake").await.unwrap();

    assert!(response.success);
    assert_eq!(response.count, response.data.len());
    assert_eq!(response.count, 5);
    assert!(response.data.iter().all(|l| l.instagram.contains("instagram.com")));
    assert_eq!(response.data[0].name, "ProducerA Fan One");
    assert_eq!(response.data[4].instagram, "https://instagram.com/producere_one");
    // ten profiles were extracted in total
    assert_eq!(renderer.profile_renders().len(), 10);
}

#[tokio::test]
async fn end_to_end_empty_result_is_success() {
    let server = mock_youtube(&PRODUCERS).await;
    let config = LeadsConfig {
        youtube_url: server.uri(),
        ..test_config()
    };
    let renderer = producer_renderer(false);

    let response = Pipeline::new(&renderer, &config)
        .unwrap()
        .run("Drake")
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(response.count, 0);
    assert!(response.data.is_empty());
}

#[tokio::test]
async fn empty_term_is_rejected() {
    let renderer = FakeRenderer::default();
    let config = test_config();
    let pipeline = Pipeline::new(&renderer, &config).unwrap();
    assert!(matches!(
        pipeline.run("   ").await,
        Err(LeadError::EmptySearchTerm)
    ));
    assert!(renderer.rendered().is_empty());
}
