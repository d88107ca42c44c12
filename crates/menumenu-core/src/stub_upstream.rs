//! A local HTTP listener that stands in for an upstream API in tests.
//!
//! Every request is recorded and answered with one scripted status and
//! JSON body.

use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// One request as the upstream saw it.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub(crate) struct StubUpstream {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubUpstream {
    pub async fn start(status: u16, body: &str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let status = StatusCode::from_u16(status).unwrap();
        let reply = body.to_string();

        let app = Router::new().fallback(
            move |Query(query): Query<HashMap<String, String>>,
                  uri: Uri,
                  headers: HeaderMap,
                  body: String| {
                let recorded = recorded.clone();
                let reply = reply.clone();
                async move {
                    recorded.lock().unwrap().push(Recorded {
                        path: uri.path().to_string(),
                        query,
                        headers,
                        body,
                    });
                    (status, [(header::CONTENT_TYPE, "application/json")], reply)
                }
            },
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// A URL on a port nothing is listening on.
pub(crate) async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
