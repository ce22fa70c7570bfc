#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{Router, http::StatusCode, http::Uri};
use lcsdl::{CrawlConfig, CrawlContext};
use tokio::net::TcpListener;

const LISTING_HEAD: &str = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 3.2 Final//EN">
<html><head><title>Index of /echocontent</title></head><body>
<table>
<tr><th><a href="?C=N;O=D">Name</a></th><th><a href="?C=M;O=A">Last modified</a></th>
<th><a href="?C=S;O=A">Size</a></th><th><a href="?C=D;O=A">Description</a></th></tr>
<tr><td><a href="/echocontent/">Parent Directory</a></td></tr>
"#;

/// An Apache-style directory listing containing `hashes`.
pub fn listing(hashes: &[&str]) -> String {
    let mut body = LISTING_HEAD.to_string();
    for hash in hashes {
        body.push_str(&format!(
            "<tr><td><a href=\"{hash}/\">{hash}/</a></td><td>01-Mar-2021 09:00</td></tr>\n"
        ));
    }
    body.push_str("</table></body></html>\n");
    body
}

pub fn section_xml(year: &str, name: &str, code: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<section>
  <term><name>{year}</name></term>
  <name>{name}</name>
  <course><identifier>{code}</identifier></course>
  <portal><url>http://echo.example/ess/portal/section/{code}</url></portal>
</section>"#
    )
}

pub fn presentation_xml(name: &str, start: &str, location: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<presentation>
  <presentation-properties>
    <name>{name}</name>
    <start-timestamp>{start}</start-timestamp>
    <location>{location}</location>
  </presentation-properties>
</presentation>"#
    )
}

pub struct MediaServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl MediaServer {
    /// Number of requests served so far, 404s included.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serves `routes` (path -> body), 404 for everything else. Paths are expected
/// to live under `/echocontent/`, which is what `base_url` points at.
pub async fn spawn_media_server(routes: HashMap<String, String>) -> MediaServer {
    let routes = Arc::new(routes);
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().fallback(move |uri: Uri| {
        let routes = routes.clone();
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            match routes.get(uri.path()) {
                Some(body) => (StatusCode::OK, body.clone()),
                None => (StatusCode::NOT_FOUND, String::new()),
            }
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    MediaServer {
        base_url: format!("http://{addr}/echocontent/"),
        hits,
    }
}

pub fn context_for(base_url: &str) -> CrawlContext {
    CrawlContext::new(CrawlConfig::with_base_url(base_url)).unwrap()
}
