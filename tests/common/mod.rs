//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use not_found_pages::config::{AppConfig, DimensionConfig, PresetConfig};
use not_found_pages::{HttpServer, Shutdown};

/// A request as seen by the mock upstream.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub user_agent: Option<String>,
}

/// What the mock upstream answers.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl MockResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// `f` maps each request to the response to send.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(SeenRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockResponse> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let (read_half, mut write_half) = socket.into_split();
                let mut reader = BufReader::new(read_half);

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
                    return;
                }
                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();

                let mut user_agent = None;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                        break;
                    }
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("user-agent") {
                            user_agent = Some(value.trim().to_string());
                        }
                    }
                }

                let response = f(SeenRequest { path, user_agent }).await;
                let status_text = match response.status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    _ => "200 OK",
                };

                let mut head = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                    status_text,
                    response.body.len()
                );
                if let Some(content_type) = &response.content_type {
                    head.push_str(&format!("Content-Type: {content_type}\r\n"));
                }
                head.push_str("\r\n");

                let _ = write_half.write_all(head.as_bytes()).await;
                let _ = write_half.write_all(&response.body).await;
                let _ = write_half.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    addr
}

#[allow(dead_code)]
fn preset(segment: &str) -> PresetConfig {
    PresetConfig {
        uri_segment: segment.to_string(),
        label: None,
        values: vec![segment.to_string()],
        metadata: Default::default(),
    }
}

/// `language` (en default, de) and `country` (us default, fr).
#[allow(dead_code)]
pub fn language_and_country() -> Vec<DimensionConfig> {
    vec![
        DimensionConfig {
            name: "language".into(),
            default_preset: "en".into(),
            presets: [("en".to_string(), preset("en")), ("de".to_string(), preset("de"))]
                .into_iter()
                .collect(),
        },
        DimensionConfig {
            name: "country".into(),
            default_preset: "us".into(),
            presets: [("us".to_string(), preset("us")), ("fr".to_string(), preset("fr"))]
                .into_iter()
                .collect(),
        },
    ]
}

/// A running server in front of `upstream`.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub config_tx: mpsc::UnboundedSender<AppConfig>,
    pub shutdown: Shutdown,
}

/// Start the server on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(upstream: SocketAddr, mut config: AppConfig) -> TestServer {
    config.upstream.address = upstream.to_string();
    config.upstream.request_timeout_secs = 5;
    config.fallback.timeout_secs = 5;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    TestServer {
        addr,
        config_tx,
        shutdown,
    }
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
