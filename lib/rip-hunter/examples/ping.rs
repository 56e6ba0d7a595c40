#![allow(dead_code)]

use rip_hunter::{ApiError, ERROR_EVENT, Hunter, to_gql_arguments};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct Country {
    name: String,
    capital: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountryData {
    country: Option<Country>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let hunter = Hunter::builder().with_compact_operations(true).build();
    hunter.on(ERROR_EVENT, |error: &ApiError| {
        warn!(errors = ?error.errors(), "GraphQL errors");
    });

    let url = "https://countries.trevorblades.com/graphql";

    // Embed native values as GraphQL arguments
    let args = to_gql_arguments(&json!({"code": "FR"}))?;
    let query = format!(
        r#"
        {{
            country({args}) {{
                name
                capital
            }}
        }}
        "#
    );
    let result = hunter.query(url, query).data::<CountryData>().await?;
    info!(?result, "country");

    // Invalid field, the endpoint answers with an errors envelope
    let result = hunter.query(url, "{ country { unknown } }").await;
    if let Err(error) = result {
        info!(%error, "expected failure");
    }

    Ok(())
}
