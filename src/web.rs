use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::error;
use warp::http::StatusCode;
use warp::Filter;

use crate::enrich::EnrichmentEngine;
use crate::error::Error;
use crate::interpreter::SentenceInterpreter;
use crate::pipeline;
use crate::upstream::ProductFetcher;

/// Everything a request handler needs, constructed once in `main`.
pub struct App {
    pub interpreter: Box<dyn SentenceInterpreter>,
    pub fetcher: ProductFetcher,
    pub engine: EnrichmentEngine,
}

#[derive(Debug, Deserialize)]
pub struct SentencePayload {
    pub sentence: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub offset: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn serve(app: Arc<App>, addr: SocketAddr) {
    warp::serve(routes(app)).run(addr).await;
}

/// `POST /get?offset=0&limit=10` with a `{"sentence": ...}` body.
pub fn routes(app: Arc<App>) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let app = warp::any().map(move || Arc::clone(&app));
    warp::path("get")
        .and(warp::path::end())
        .and(warp::post())
        .and(app)
        .and(warp::query::<PageQuery>())
        .and(warp::body::json())
        .and_then(get_products_handler)
}

async fn get_products_handler(
    app: Arc<App>,
    page: PageQuery,
    payload: SentencePayload,
) -> Result<impl warp::Reply, Infallible> {
    let result = pipeline::get_products(
        app.interpreter.as_ref(),
        &app.fetcher,
        &app.engine,
        &payload.sentence,
        page.limit,
        page.offset,
    )
    .await;

    let reply = match result {
        Ok(products) => warp::reply::with_status(warp::reply::json(&products), StatusCode::OK),
        Err(err) => {
            error!("Problem while handling search request. {}", err);
            warp::reply::with_status(
                warp::reply::json(&ErrorBody { error: err.to_string() }),
                status_for(&err),
            )
        }
    };
    Ok(reply)
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Validation(_) | Error::InterpretationRefused(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Upstream { .. } | Error::Normalization(_) | Error::Transport(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::tests::StubInterpreter;
    use crate::models::Product;

    fn test_app() -> Arc<App> {
        let client = reqwest::Client::new();
        Arc::new(App {
            interpreter: Box::new(StubInterpreter),
            fetcher: ProductFetcher::new(client.clone(), "http://127.0.0.1:1".to_string()),
            engine: EnrichmentEngine::new(client),
        })
    }

    #[tokio::test]
    async fn get_returns_a_product_array() {
        let routes = routes(test_app());
        let response = warp::test::request()
            .method("POST")
            .path("/get")
            .json(&serde_json::json!({"sentence": "floors please"}))
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let products: Vec<Product> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(products.len(), 5);
    }

    #[tokio::test]
    async fn pipeline_failures_return_an_error_body() {
        let routes = routes(test_app());
        let response = warp::test::request()
            .method("POST")
            .path("/get?limit=3")
            .json(&serde_json::json!({"sentence": "tell me a secret"}))
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert!(body["error"].as_str().unwrap().contains("refused"));
    }
}
