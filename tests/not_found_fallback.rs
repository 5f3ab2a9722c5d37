//! End-to-end tests for the not-found fallback.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use not_found_pages::config::AppConfig;

mod common;

use common::{MockResponse, SeenRequest};

type Log = Arc<Mutex<Vec<SeenRequest>>>;

/// Upstream serving `pages` (path → body) with 200 and everything else with 404.
async fn upstream(pages: &'static [(&'static str, &'static str)]) -> (SocketAddr, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let seen = log.clone();

    let addr = common::start_programmable_backend(move |req: SeenRequest| {
        seen.lock().unwrap().push(req.clone());
        async move {
            match pages.iter().find(|(path, _)| *path == req.path) {
                Some((_, body)) => MockResponse::new(200, *body),
                None => MockResponse::new(404, "upstream not found"),
            }
        }
    })
    .await;

    (addr, log)
}

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.dimensions = common::language_and_country();
    config
}

fn paths(log: &Log) -> Vec<String> {
    log.lock().unwrap().iter().map(|r| r.path.clone()).collect()
}

#[tokio::test]
async fn test_serves_localized_fallback_page() {
    let (upstream, log) = upstream(&[("/de_fr/404", "<h1>Seite nicht gefunden</h1>")]).await;
    let server = common::start_server(upstream, config()).await;

    let res = common::client()
        .get(format!("http://{}/de_fr/missing", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "<h1>Seite nicht gefunden</h1>");

    assert_eq!(paths(&log), ["/de_fr/missing", "/de_fr/404"]);
    let internal = log.lock().unwrap()[1].user_agent.clone().unwrap();
    assert!(internal.starts_with("NotFoundPages/"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_substitutes_default_segments() {
    let (upstream, log) = upstream(&[("/en_us/404", "default not found page")]).await;
    let server = common::start_server(upstream, config()).await;

    let res = common::client()
        .get(format!("http://{}/de/missing", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "default not found page");
    assert_eq!(paths(&log), ["/de/missing", "/en_us/404"]);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_empty_segment_mode_keeps_known_segments() {
    let (upstream, log) = upstream(&[("/fr/404", "page introuvable"), ("/404", "plain")]).await;
    let mut config = config();
    config.routing.support_empty_segment_for_dimensions = true;
    let server = common::start_server(upstream, config).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/fr/missing", server.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "page introuvable");

    let res = client
        .get(format!("http://{}/xx/missing", server.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "plain");

    assert_eq!(
        paths(&log),
        ["/fr/missing", "/fr/404", "/xx/missing", "/404"]
    );

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_missing_fallback_does_not_loop() {
    let (upstream, log) = upstream(&[]).await;
    let server = common::start_server(upstream, config()).await;

    let res = common::client()
        .get(format!("http://{}/de_fr/missing", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "upstream not found");

    // The original request plus exactly one internal fetch.
    assert_eq!(paths(&log), ["/de_fr/missing", "/de_fr/404"]);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_own_user_agent_passes_through() {
    let (upstream, log) = upstream(&[("/en_us/404", "fallback")]).await;
    let server = common::start_server(upstream, config()).await;

    let res = common::client()
        .get(format!("http://{}/missing", server.addr))
        .header("User-Agent", "NotFoundPages/9.9.9")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "upstream not found");
    assert_eq!(log.lock().unwrap().len(), 1);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_existing_pages_pass_through() {
    let (upstream, log) = upstream(&[("/de/about?tab=team", "Über uns")]).await;
    let server = common::start_server(upstream, config()).await;

    let res = common::client()
        .get(format!("http://{}/de/about?tab=team", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "Über uns");
    assert_eq!(log.lock().unwrap().len(), 1);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_only_get_gets_fallback() {
    let (upstream, log) = upstream(&[("/en_us/404", "fallback")]).await;
    let server = common::start_server(upstream, config()).await;

    let res = common::client()
        .post(format!("http://{}/missing", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "upstream not found");
    assert_eq!(log.lock().unwrap().len(), 1);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_disabled_fallback() {
    let (upstream, log) = upstream(&[("/en_us/404", "fallback")]).await;
    let mut config = config();
    config.fallback.enabled = false;
    let server = common::start_server(upstream, config).await;

    let res = common::client()
        .get(format!("http://{}/missing", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.text().await.unwrap(), "upstream not found");
    assert_eq!(log.lock().unwrap().len(), 1);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let upstream = closed.local_addr().unwrap();
    drop(closed);

    let server = common::start_server(upstream, config()).await;

    let res = common::client()
        .get(format!("http://{}/de/missing", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_reload_replaces_presets() {
    let (upstream, log) = upstream(&[]).await;
    let server = common::start_server(upstream, config()).await;
    let client = common::client();

    client
        .get(format!("http://{}/missing", server.addr))
        .send()
        .await
        .unwrap();

    let mut reloaded = config();
    reloaded.dimensions[0].default_preset = "de".into();
    server.config_tx.send(reloaded).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    client
        .get(format!("http://{}/missing", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(
        paths(&log),
        ["/missing", "/en_us/404", "/missing", "/de_us/404"]
    );

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_fallback_bytes_and_content_type_are_unchanged() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let seen = log.clone();
    let upstream = common::start_programmable_backend(move |req: SeenRequest| {
        seen.lock().unwrap().push(req.clone());
        async move {
            if req.path == "/en_us/404" {
                MockResponse::new(200, b"Caf\xe9".to_vec())
                    .with_content_type("text/html; charset=iso-8859-1")
            } else {
                MockResponse::new(404, "upstream not found")
            }
        }
    })
    .await;
    let server = common::start_server(upstream, config()).await;

    let res = common::client()
        .get(format!("http://{}/missing", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/html; charset=iso-8859-1"
    );
    assert_eq!(&res.bytes().await.unwrap()[..], b"Caf\xe9");
    assert_eq!(paths(&log), ["/missing", "/en_us/404"]);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_foreign_host_header_is_not_fetched() {
    let (upstream, log) = upstream(&[]).await;
    let (other, other_log) = {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let seen = log.clone();
        let addr = common::start_programmable_backend(move |req: SeenRequest| {
            seen.lock().unwrap().push(req);
            async { MockResponse::new(200, "INTERNAL SECRET") }
        })
        .await;
        (addr, log)
    };
    let server = common::start_server(upstream, config()).await;

    let res = common::client()
        .get(format!("http://{}/missing", server.addr))
        .header("Host", other.to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "upstream not found");
    assert!(other_log.lock().unwrap().is_empty());
    // The fallback is fetched from the upstream itself.
    assert_eq!(paths(&log), ["/missing", "/en_us/404"]);

    server.shutdown.trigger();
}
