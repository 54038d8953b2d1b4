//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive complete
//! crawls through a `Session`, checking the streamed events.

use std::time::Duration;
use sumi_trawl::config::{CrawlRequest, Settings};
use sumi_trawl::crawler::{DoneEvent, FoundEvent, PageEvent};
use sumi_trawl::{CrawlEvent, JobStatus, Session, TrawlError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast crawl request rooted at the mock server
fn create_request(server: &MockServer, max_pages: usize) -> CrawlRequest {
    let mut request = CrawlRequest::new(format!("{}/", server.uri()));
    request.max_pages = max_pages;
    request.delay_ms = 0;
    request.timeout_ms = 2_000;
    request
}

fn create_session() -> Session {
    Session::new(&Settings::default()).expect("Failed to create session")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn crawl(request: CrawlRequest) -> Vec<CrawlEvent> {
    create_session()
        .start(&request)
        .expect("Failed to start crawl")
        .collect()
        .await
}

fn pages(events: &[CrawlEvent]) -> Vec<PageEvent> {
    events
        .iter()
        .filter_map(|e| match e {
            CrawlEvent::Page(p) => Some(p.clone()),
            _ => None,
        })
        .collect()
}

fn found(events: &[CrawlEvent]) -> Vec<FoundEvent> {
    events
        .iter()
        .filter_map(|e| match e {
            CrawlEvent::Found(f) => Some(f.clone()),
            _ => None,
        })
        .collect()
}

fn done(events: &[CrawlEvent]) -> Option<DoneEvent> {
    events.iter().find_map(|e| match e {
        CrawlEvent::Done(d) => Some(d.clone()),
        _ => None,
    })
}

#[tokio::test]
async fn test_single_page_with_text_and_mailto() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><body>
            <p>Write to contact@example.com</p>
            <a href="mailto:info@example.com">Info</a>
        </body></html>"#,
    )
    .await;

    let request = create_request(&server, 8);
    let seed = format!("{}/", server.uri());
    let events = crawl(request).await;

    assert_eq!(events.len(), 3, "events: {:?}", events);
    assert!(matches!(events[0], CrawlEvent::Page(_)));
    assert!(matches!(events[1], CrawlEvent::Found(_)));
    assert!(matches!(events[2], CrawlEvent::Done(_)));

    let done = done(&events).expect("done event");
    assert_eq!(done.target, seed);
    assert_eq!(done.pages_visited, vec![seed]);
    assert_eq!(done.emails, vec!["contact@example.com", "info@example.com"]);
    assert_eq!(done.total_emails, 2);
    assert_eq!(done.total_phones, 0);
}

#[tokio::test]
async fn test_page_budget_limits_fetches() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/p1">1</a><a href="/p2">2</a><a href="/p3">3</a>"#,
    )
    .await;
    mount_page(&server, "/p1", "<p>one</p>").await;
    for unreachable in ["/p2", "/p3"] {
        Mock::given(method("GET"))
            .and(path(unreachable))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>never</p>"))
            .expect(0)
            .mount(&server)
            .await;
    }

    let events = crawl(create_request(&server, 2)).await;

    let pages = pages(&events);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].url, format!("{}/", server.uri()));
    assert_eq!(pages[1].url, format!("{}/p1", server.uri()));

    let done = done(&events).expect("done event");
    assert_eq!(done.pages_visited.len(), 2);
}

#[tokio::test]
async fn test_repeated_contacts_reported_once() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<p>a@example.com, call +1 555 010 0199</p><a href="/two">next</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/two",
        r#"<p>a@example.com and b@example.com, call +1 555 010 0199</p><a href="/">home</a>"#,
    )
    .await;

    let events = crawl(create_request(&server, 8)).await;

    let found = found(&events);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].emails, vec!["a@example.com"]);
    assert_eq!(found[0].phones, vec!["+1 555 010 0199"]);
    assert_eq!(found[1].emails, vec!["b@example.com"]);
    assert!(found[1].phones.is_empty());

    // The summary is exactly the union of the deltas
    let done = done(&events).expect("done event");
    let mut union_emails: Vec<String> = found.iter().flat_map(|f| f.emails.clone()).collect();
    let mut union_phones: Vec<String> = found.iter().flat_map(|f| f.phones.clone()).collect();
    union_emails.sort();
    union_phones.sort();
    let mut emails = done.emails.clone();
    let mut phones = done.phones.clone();
    emails.sort();
    phones.sort();
    assert_eq!(emails, union_emails);
    assert_eq!(phones, union_phones);
    assert_eq!(done.total_emails, done.emails.len());
    assert_eq!(done.total_phones, done.phones.len());

    // Back-link to the seed is not fetched again
    assert_eq!(done.pages_visited.len(), 2);
}

#[tokio::test]
async fn test_timeout_recorded_as_status_zero() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/slow">slow</a><a href="/fast">fast</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>late@example.com</p>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/fast", "<p>fast@example.com</p>").await;

    let mut request = create_request(&server, 8);
    request.timeout_ms = 300;
    let events = crawl(request).await;

    let pages = pages(&events);
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[1].url, format!("{}/slow", server.uri()));
    assert_eq!(pages[1].status, 0);
    assert_eq!(pages[2].status, 200);

    let found = found(&events);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].emails, vec!["fast@example.com"]);
    assert!(done(&events).is_some());
}

#[tokio::test]
async fn test_http_error_status_reported_without_extraction() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/missing">gone</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<p>oops@example.com</p>"))
        .mount(&server)
        .await;

    let events = crawl(create_request(&server, 8)).await;

    let statuses: Vec<u16> = pages(&events).iter().map(|p| p.status).collect();
    assert_eq!(statuses, vec![200, 404]);
    assert!(found(&events).is_empty());
    assert!(done(&events).expect("done event").emails.is_empty());
}

#[tokio::test]
async fn test_empty_body_yields_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let events = crawl(create_request(&server, 8)).await;

    assert_eq!(events.len(), 2);
    assert_eq!(pages(&events)[0].status, 200);
    assert!(found(&events).is_empty());
    assert_eq!(done(&events).expect("done event").pages_visited.len(), 1);
}

#[tokio::test]
async fn test_cross_origin_links_not_followed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"
            <a href="http://other.invalid/contact">elsewhere</a>
            <a href="https://127.0.0.1/secure">other scheme</a>
            <a href="/local">local</a>
        "#,
    )
    .await;
    mount_page(&server, "/local", "<p>local page</p>").await;

    let events = crawl(create_request(&server, 8)).await;

    let done = done(&events).expect("done event");
    assert_eq!(
        done.pages_visited,
        vec![format!("{}/", server.uri()), format!("{}/local", server.uri())]
    );
    for url in &done.pages_visited {
        assert!(url.starts_with(&server.uri()));
    }
}

#[tokio::test]
async fn test_links_followed_breadth_first_in_markup_order() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/b">b</a><a href="/a">a</a>"#).await;
    mount_page(&server, "/b", r#"<a href="/b/deep">deep</a>"#).await;
    mount_page(&server, "/a", "<p>a</p>").await;
    mount_page(&server, "/b/deep", "<p>deep</p>").await;

    let events = crawl(create_request(&server, 8)).await;

    let base = server.uri();
    let urls: Vec<String> = pages(&events).into_iter().map(|p| p.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/b", base),
            format!("{}/a", base),
            format!("{}/b/deep", base),
        ]
    );
}

#[tokio::test]
async fn test_identifying_user_agent_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "Mozilla/5.0 (compatible; ContactScraperBot/1.0; +https://example.invalid/bot)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ua@example.com</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let events = crawl(create_request(&server, 8)).await;
    assert_eq!(pages(&events)[0].status, 200);
}

#[tokio::test]
async fn test_redirects_followed_within_limit() {
    let server = MockServer::start().await;
    let location = format!("{}/moved", server.uri());
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", location.as_str()))
        .mount(&server)
        .await;
    mount_page(&server, "/moved", "<p>moved@example.com</p>").await;

    let events = crawl(create_request(&server, 8)).await;

    assert_eq!(pages(&events)[0].status, 200);
    assert_eq!(found(&events)[0].emails, vec!["moved@example.com"]);
}

#[tokio::test]
async fn test_redirect_chain_too_long() {
    let server = MockServer::start().await;
    let hops = ["/", "/r1", "/r2", "/r3", "/r4", "/r5"];
    for window in hops.windows(2) {
        let location = format!("{}{}", server.uri(), window[1]);
        Mock::given(method("GET"))
            .and(path(window[0]))
            .respond_with(ResponseTemplate::new(302).insert_header("location", location.as_str()))
            .mount(&server)
            .await;
    }
    mount_page(&server, "/r5", "<p>far@example.com</p>").await;

    let events = crawl(create_request(&server, 8)).await;

    assert_eq!(pages(&events)[0].status, 0);
    assert!(found(&events).is_empty());
    assert!(done(&events).is_some());
}

#[tokio::test]
async fn test_second_start_rejected_and_first_unaffected() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>first@example.com</p>").await;

    let session = create_session();
    let first = session
        .start(&create_request(&server, 8))
        .expect("first start");

    let second = session.start(&create_request(&server, 8));
    assert!(matches!(second, Err(TrawlError::JobAlreadyRunning { .. })));

    let events = first.collect().await;
    assert_eq!(pages(&events).len(), 1);
    assert_eq!(
        done(&events).expect("done event").emails,
        vec!["first@example.com"]
    );
    assert_eq!(session.status(), JobStatus::Completed);

    // The session is free again once the first crawl is over
    let third = session
        .start(&create_request(&server, 8))
        .expect("third start");
    third.collect().await;
}

#[tokio::test]
async fn test_cancel_aborts_in_flight_fetch() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/slow">slow</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>late@example.com</p>")
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let session = create_session();
    let mut request = create_request(&server, 8);
    request.timeout_ms = 30_000;
    let mut job = session.start(&request).expect("start");

    let first = job.next_event().await.expect("seed page event");
    assert!(matches!(first, CrawlEvent::Page(_)));
    job.cancel();

    let rest = tokio::time::timeout(Duration::from_secs(5), job.collect())
        .await
        .expect("cancellation should not wait for the slow page");

    assert!(rest.is_empty(), "unexpected events: {:?}", rest);
    assert_eq!(session.status(), JobStatus::Cancelled);
}

#[tokio::test]
async fn test_cancel_interrupts_politeness_delay() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/next">next</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>next</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let session = create_session();
    let mut request = create_request(&server, 8);
    request.delay_ms = 60_000;
    let mut job = session.start(&request).expect("start");

    assert!(matches!(job.next_event().await, Some(CrawlEvent::Page(_))));
    job.cancel();

    let rest = tokio::time::timeout(Duration::from_secs(5), job.collect())
        .await
        .expect("cancellation should not wait out the delay");

    assert!(rest.is_empty());
}

#[tokio::test]
async fn test_unreachable_seed_still_completes() {
    // Nothing listens on the discard port
    let mut request = CrawlRequest::new("http://127.0.0.1:9/");
    request.delay_ms = 0;
    request.timeout_ms = 1_000;

    let events = crawl(request).await;

    assert_eq!(pages(&events).len(), 1);
    assert_eq!(pages(&events)[0].status, 0);
    let done = done(&events).expect("done event");
    assert_eq!(done.pages_visited, vec!["http://127.0.0.1:9/"]);
    assert_eq!(done.total_emails, 0);
}

#[tokio::test]
async fn test_same_page_anchors_are_followed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r##"<a href="#contact">Contact</a><a href="/#team">Team</a>"##,
    )
    .await;

    let seed = format!("{}/", server.uri());
    let events = crawl(create_request(&server, 8)).await;

    let done = done(&events).expect("done event");
    assert_eq!(
        done.pages_visited,
        vec![
            seed.clone(),
            format!("{}#contact", seed),
            format!("{}#team", seed),
        ]
    );
}

#[tokio::test]
async fn test_target_reports_seed_as_given() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>nothing here</p>").await;

    let mut request = create_request(&server, 8);
    request.start_url = server.uri();
    let events = crawl(request).await;

    let done = done(&events).expect("done event");
    assert_eq!(done.target, server.uri());
    assert_eq!(done.pages_visited, vec![format!("{}/", server.uri())]);
}
