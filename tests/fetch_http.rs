// tests/fetch_http.rs
//
// End-to-end: real HttpFeedSource against an in-process upstream on 127.0.0.1:0.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceExt as _;
use url::Url;

use feed_filter::feed::{parse_feed, FeedSource, HttpFeedSource};
use feed_filter::{api, AppState, FeedError};

const ABG_XML: &str = include_str!("fixtures/alpha_beta_gamma.xml");
const ATOM_XML: &str = include_str!("fixtures/atom_feed.xml");

async fn spawn_upstream() -> SocketAddr {
    let upstream = Router::new()
        .route(
            "/rss.xml",
            get(|| async { ([(header::CONTENT_TYPE, "application/rss+xml")], ABG_XML) }),
        )
        .route(
            "/atom.xml",
            get(|| async { ([(header::CONTENT_TYPE, "application/atom+xml")], ATOM_XML) }),
        )
        .route("/html", get(|| async { "<html><body>hello</body></html>" }))
        .route(
            "/boom",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind upstream");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.expect("serve upstream");
    });
    addr
}

fn proxy() -> Router {
    let source = HttpFeedSource::new("feed-filter-tests", None).expect("client");
    api::router(AppState::new(Arc::new(source)).expect("state"))
}

async fn get_proxy(uri: String) -> (StatusCode, String) {
    let resp = proxy()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn titles(xml: &str) -> Vec<String> {
    parse_feed(xml.as_bytes())
        .expect("rss output parses")
        .items
        .into_iter()
        .map(|i| i.title)
        .collect()
}

#[tokio::test]
async fn fetches_and_parses_rss() {
    let addr = spawn_upstream().await;
    let source = HttpFeedSource::new("feed-filter-tests", None).unwrap();
    let url = Url::parse(&format!("http://{addr}/rss.xml")).unwrap();
    let feed = source.fetch(&url).await.expect("fetch ok");
    assert_eq!(feed.title, "Launch Desk");
    assert_eq!(feed.items.len(), 3);
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    let addr = spawn_upstream().await;
    let source = HttpFeedSource::new("feed-filter-tests", None).unwrap();

    let url = Url::parse(&format!("http://{addr}/does-not-exist")).unwrap();
    let err = source.fetch(&url).await.unwrap_err();
    assert!(
        matches!(err, FeedError::UpstreamStatus { status: 404, .. }),
        "{err:?}"
    );
    assert!(err.is_fetch());

    let url = Url::parse(&format!("http://{addr}/boom")).unwrap();
    let err = source.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FeedError::UpstreamStatus { status: 500, .. }));
}

#[tokio::test]
async fn connection_refused_is_a_fetch_error() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap().port()
    };
    let source = HttpFeedSource::new("feed-filter-tests", None).unwrap();
    let url = Url::parse(&format!("http://127.0.0.1:{port}/rss.xml")).unwrap();
    let err = source.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FeedError::Fetch { .. }), "{err:?}");
}

#[tokio::test]
async fn proxy_filters_rss_upstream() {
    let addr = spawn_upstream().await;
    let (status, body) = get_proxy(format!("/?url=http://{addr}/rss.xml&skip=recall")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(titles(&body), vec!["Alpha launch", "Gamma update"]);
}

#[tokio::test]
async fn proxy_converts_atom_to_rss() {
    let addr = spawn_upstream().await;
    let (status, body) = get_proxy(format!("/?url=http://{addr}/atom.xml&skip=Sponsored:")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body.contains("<rss version=\"2.0\">"));
    assert!(!body.contains("<feed"));
    assert_eq!(
        titles(&body),
        vec!["Release 2.0 is here", "Release 2.0.1 patch notes"]
    );

    let out = parse_feed(body.as_bytes()).unwrap();
    assert_eq!(out.title, "Engineering Blog");
    assert_eq!(out.link, "https://blog.example.org/");
    assert_eq!(out.description, "Notes from the build");
    assert!(body.contains("<managingEditor>platform@example.org (Platform Team)</managingEditor>"));
    // The patch-notes entry only has <updated>; it still gets a date.
    assert!(body.contains("Thu, 03 Jul 2025 09:15:00 +0000"), "{body}");
}

#[tokio::test]
async fn proxy_upstream_404_is_500_without_rss() {
    let addr = spawn_upstream().await;
    let (status, body) = get_proxy(format!("/?url=http://{addr}/missing.xml&re=.")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("404"), "{body}");
    assert!(!body.contains("<rss"));
}

#[tokio::test]
async fn proxy_non_feed_body_is_500() {
    let addr = spawn_upstream().await;
    let (status, body) = get_proxy(format!("/?url=http://{addr}/html&re=.")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("parsing feed"), "{body}");
}
