mod catalog;
mod enrich;
mod error;
mod interpreter;
mod models;
mod normalize;
mod pipeline;
mod query;
mod settings;
mod upstream;
mod web;

use std::env;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::enrich::EnrichmentEngine;
use crate::interpreter::OpenRouterInterpreter;
use crate::upstream::ProductFetcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = settings::Args::parse();
    let settings = settings::Settings::load(args.config.as_deref())
        .context("Problem while loading settings")?;
    let api_key = env::var("OPENROUTER_KEY").context("OPENROUTER_KEY is not set")?;

    let client = upstream::build_http_client().context("Problem while building the HTTP client")?;

    let app = Arc::new(web::App {
        interpreter: Box::new(OpenRouterInterpreter::new(
            client.clone(),
            settings.llm.api_url.clone(),
            api_key,
            settings.llm.model.clone(),
        )),
        fetcher: ProductFetcher::new(client.clone(), settings.upstream.base_url.clone()),
        engine: EnrichmentEngine::new(client),
    });

    info!("Listening on {}", settings.web.address);
    web::serve(app, settings.web.address).await;

    Ok(())
}
