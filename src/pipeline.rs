use tracing::info;

use crate::enrich::EnrichmentEngine;
use crate::error::Result;
use crate::interpreter::SentenceInterpreter;
use crate::models::Product;
use crate::normalize::normalize;
use crate::upstream::{FetchOutcome, ProductFetcher};

/// The end-to-end pipeline behind the endpoint: interpret, fetch,
/// normalize, enrich, strictly in that order. Enrichment only starts
/// once the whole batch is normalized, and static outcomes skip it
/// entirely.
pub async fn get_products(
    interpreter: &dyn SentenceInterpreter,
    fetcher: &ProductFetcher,
    engine: &EnrichmentEngine,
    sentence: &str,
    limit: u32,
    offset: u32,
) -> Result<Vec<Product>> {
    let filters = interpreter.interpret(sentence).await?;
    info!("Interpreted sentence. mode: {:?}, floors: {}", filters.search_mode(), filters.is_floors_search);

    match fetcher.fetch(&filters, limit, offset).await? {
        FetchOutcome::Static(products) => Ok(products),
        FetchOutcome::Live(raw) => {
            let mut products = normalize(&raw, filters.search_mode(), fetcher.base_url())?;
            info!("Normalized {} product(s), starting enrichment.", products.len());
            engine.enrich(&mut products).await;
            Ok(products)
        }
    }
}
