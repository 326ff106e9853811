use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{Product, SearchMode};

/// The two response layouts the upstream serves. Product-name search
/// nests its records under a flat `categories.articles`; category search
/// wraps them one level deeper inside the first category node. The
/// asymmetry is structural, so each layout gets its own typed shape.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ProductSearchData {
    categories: ArticleBlock,
}

#[derive(Debug, Deserialize)]
struct CategorySearchData {
    categories: Vec<CategoryNode>,
}

#[derive(Debug, Deserialize)]
struct CategoryNode {
    #[serde(rename = "categoryArticles")]
    category_articles: ArticleBlock,
}

#[derive(Debug, Deserialize)]
struct ArticleBlock {
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    name: String,
    images: Vec<RawImage>,
    prices: RawPrices,
    url: String,
    brand: RawBrand,
    ratings: RawRatings,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    path: String,
}

#[derive(Debug, Deserialize)]
struct RawPrices {
    regular: RawPrice,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    /// Euro cents.
    value: i64,
}

#[derive(Debug, Deserialize)]
struct RawBrand {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawRatings {
    average: Option<f64>,
}

/// Maps a raw search response onto canonical products. A required field
/// missing from any record fails the whole call; silently dropping rows
/// is reserved for the enrichment stage.
pub fn normalize(raw: &serde_json::Value, mode: SearchMode, base_url: &str) -> Result<Vec<Product>> {
    let articles = match mode {
        SearchMode::ProductName => {
            let envelope: Envelope<ProductSearchData> = serde_json::from_value(raw.clone())
                .map_err(|e| Error::Normalization(e.to_string()))?;
            envelope.data.categories.articles
        }
        SearchMode::Category => {
            let envelope: Envelope<CategorySearchData> = serde_json::from_value(raw.clone())
                .map_err(|e| Error::Normalization(e.to_string()))?;
            envelope
                .data
                .categories
                .into_iter()
                .next()
                .ok_or_else(|| Error::Normalization("categories list is empty".to_string()))?
                .category_articles
                .articles
        }
    };

    articles
        .into_iter()
        .map(|article| to_product(article, base_url))
        .collect()
}

fn to_product(article: RawArticle, base_url: &str) -> Result<Product> {
    let image = article
        .images
        .into_iter()
        .next()
        .ok_or_else(|| Error::Normalization(format!("article '{}' has no images", article.name)))?;

    let price_eur = minor_units_to_eur(article.prices.regular.value)?;

    Ok(Product::bare(
        article.name,
        image.path,
        price_eur,
        format!("{}/{}", base_url, article.url),
        article.brand.name,
        article.ratings.average.unwrap_or(0.0),
    ))
}

/// Cent value to euros through a decimal division, so 129999 comes out as
/// 1299.99 and not 1299.9899999999998.
fn minor_units_to_eur(value: i64) -> Result<f64> {
    Decimal::new(value, 2)
        .to_f64()
        .ok_or_else(|| Error::Normalization(format!("price value {value} is not representable")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "images": [{"path": "https://cdn.example/sofa.webp"}],
            "prices": {"regular": {"value": 129999}},
            "url": "produkt/sofa-jenny",
            "brand": {"name": "Maison"},
            "ratings": {"average": 4.4},
        })
    }

    #[test]
    fn category_mode_reads_the_nested_article_list() {
        let raw = json!({
            "data": {"categories": [{"categoryArticles": {"articles": [article("Sofa Jenny")]}}]}
        });
        let products = normalize(&raw, SearchMode::Category, "https://www.home24.de").unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Sofa Jenny");
        assert_eq!(products[0].product_url, "https://www.home24.de/produkt/sofa-jenny");
        assert_eq!(products[0].brand, "Maison");
    }

    #[test]
    fn product_mode_reads_the_flat_article_list() {
        let raw = json!({
            "data": {"categories": {"articles": [article("Bett Lund")]}}
        });
        let products = normalize(&raw, SearchMode::ProductName, "https://www.home24.de").unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Bett Lund");
    }

    #[test]
    fn cent_prices_convert_without_float_artifacts() {
        let raw = json!({
            "data": {"categories": {"articles": [article("Sofa Jenny")]}}
        });
        let products = normalize(&raw, SearchMode::ProductName, "https://www.home24.de").unwrap();
        assert_eq!(products[0].price_eur, 1299.99);
    }

    #[test]
    fn empty_category_article_list_yields_empty_result() {
        let raw = json!({
            "data": {"categories": [{"categoryArticles": {"articles": []}}]}
        });
        let products = normalize(&raw, SearchMode::Category, "https://www.home24.de").unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn missing_required_field_is_a_hard_failure() {
        let mut record = article("Sofa Jenny");
        record.as_object_mut().unwrap().remove("brand");
        let raw = json!({
            "data": {"categories": {"articles": [record]}}
        });
        let err = normalize(&raw, SearchMode::ProductName, "https://www.home24.de").unwrap_err();
        match err {
            Error::Normalization(message) => assert!(message.contains("brand")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_rating_defaults_to_zero() {
        let mut record = article("Sofa Jenny");
        record["ratings"] = json!({"average": null});
        let raw = json!({
            "data": {"categories": {"articles": [record]}}
        });
        let products = normalize(&raw, SearchMode::ProductName, "https://www.home24.de").unwrap();
        assert_eq!(products[0].rating, 0.0);
    }

    #[test]
    fn article_without_images_is_rejected() {
        let mut record = article("Sofa Jenny");
        record["images"] = json!([]);
        let raw = json!({
            "data": {"categories": {"articles": [record]}}
        });
        assert!(matches!(
            normalize(&raw, SearchMode::ProductName, "https://www.home24.de"),
            Err(Error::Normalization(_))
        ));
    }
}
