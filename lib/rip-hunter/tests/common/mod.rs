#![allow(dead_code, missing_docs, clippy::expect_used)]
use std::net::{Ipv4Addr, SocketAddr};

use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use rstest::fixture;
use serde_json::{Value, json};
use tracing::info;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

/// A GraphQL stub server listening on a random local port.
#[derive(Debug)]
pub struct StubServer {
    pub addr: SocketAddr,
}

impl StubServer {
    pub async fn start() -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await?;
        let addr = listener.local_addr()?;

        let app = Router::new()
            .route("/graphql", post(graphql))
            .route("/broken", post(broken));

        tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, app).await {
                tracing::error!(?error, "stub server failed");
            }
        });
        info!(%addr, "stub server started");

        Ok(Self { addr })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

// Answers with the received query, authorization and content type, or an errors envelope
async fn graphql(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default().to_string();
    if query.contains("fail") {
        return Json(json!({
            "errors": [
                {"name": "Test Error", "message": "test_error"},
                {"name": "Other Error", "message": "other_error"}
            ]
        }));
    }

    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    Json(json!({
        "data": {
            "hello": "world",
            "query": query,
            "authorization": header_text(header::AUTHORIZATION),
            "contentType": header_text(header::CONTENT_TYPE),
        }
    }))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

#[fixture]
pub async fn server() -> StubServer {
    init_tracing();
    match StubServer::start().await {
        Ok(server) => server,
        Err(error) => {
            panic!("fail to start stub server: {error:?}");
        }
    }
}
