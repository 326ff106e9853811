use serde_json::json;

use crate::models::{rating_token, Filters};

/// Persisted-query hashes for the two server-side search operations.
const PRODUCT_SEARCH_HASH: &str = "9d2c4f0e76b23a18c5de3f47a1b08e92d6415ca30b78f1e2a94c6d0b5e83721f";
const CATEGORY_SEARCH_HASH: &str = "4b1a7c92e0d356f8a2c41b9de57f0312c8a6e49d1b03f7254e9c8a60d1f3b5e7";

/// Fixed category browsed in category mode.
const CATEGORY_ID_SOFA_COUCH: &str = "f6b55ecf-23f6-47a8-a521-67d80a44ef35";

const LOCALE: &str = "de_DE";
const IMAGE_FORMAT: &str = "WEBP";
const BACKEND: &str = "ThirdParty";

/// The two URL-encoded JSON blobs a search request is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRequest {
    pub variables: String,
    pub extensions: String,
}

impl CompiledRequest {
    pub fn request_url(&self, base_url: &str) -> String {
        format!(
            "{}/graphql?extensions={}&variables={}",
            base_url,
            urlencoding::encode(&self.extensions),
            urlencoding::encode(&self.variables)
        )
    }
}

/// Compiles a filter set into the upstream request shape. Pure: equal
/// inputs produce byte-identical output.
pub fn compile(filters: &Filters, limit: u32, offset: u32) -> CompiledRequest {
    let mut variables = json!({
        "urlParams": facet_params(filters),
        "locale": LOCALE,
        "first": limit,
        "offset": offset,
        "format": IMAGE_FORMAT,
    });
    let hash = if let Some(name) = &filters.product_name {
        variables["query"] = json!(name);
        PRODUCT_SEARCH_HASH
    } else {
        variables["id"] = json!(CATEGORY_ID_SOFA_COUCH);
        variables["backend"] = json!(BACKEND);
        CATEGORY_SEARCH_HASH
    };

    let extensions = json!({
        "persistedQuery": {
            "version": 1,
            "sha256Hash": hash,
        }
    });

    CompiledRequest {
        variables: variables.to_string(),
        extensions: extensions.to_string(),
    }
}

/// The `urlParams` token string. Token order is a compatibility contract
/// with the upstream; do not reorder.
pub fn facet_params(filters: &Filters) -> String {
    let mut params = String::new();

    if let Some(name) = &filters.product_name {
        params.push_str(&format!("query={}&", quote_plus(name)));
    }

    let bounds = [
        ("width.min", filters.width_min),
        ("width.max", filters.width_max),
        ("depth.min", filters.depth_min),
        ("depth.max", filters.depth_max),
        ("height.min", filters.height_min),
        ("height.max", filters.height_max),
        ("diameter.min", filters.diameter_min),
        ("diameter.max", filters.diameter_max),
        ("price.min", filters.price_min),
        ("price.max", filters.price_max),
    ];
    for (key, value) in bounds {
        if let Some(value) = value {
            params.push_str(&format!("{key}={value}&"));
        }
    }

    let facets = [
        ("material", filters.material.map(|m| m.as_param())),
        ("shape", filters.shape.map(|s| s.as_param())),
        ("styleFilter", filters.style.map(|s| s.as_param())),
        ("textile", filters.textile.map(|t| t.as_param())),
        ("pattern", filters.pattern.map(|p| p.as_param())),
        ("storageSpaceBeds", filters.storage_space_beds.map(|s| s.as_param())),
    ];
    for (key, value) in facets {
        if let Some(value) = value {
            params.push_str(&format!("{key}={value}&"));
        }
    }

    if let Some(token) = filters.average_rating.and_then(rating_token) {
        params.push_str(&format!("averageRating={token}&"));
    }

    if let Some(order) = sort_order(filters) {
        params.push_str(&format!("order={order}&"));
    }

    if let Some(color) = &filters.color {
        params.push_str(&format!("color={color}&"));
    }

    params
}

/// At most one sort token is emitted; when several flags are set the
/// highest-priority one wins.
fn sort_order(filters: &Filters) -> Option<&'static str> {
    if filters.prices_low_to_high {
        Some("price_asc")
    } else if filters.prices_high_to_low {
        Some("price_desc")
    } else if filters.sort_by_popularity {
        Some("relevance")
    } else if filters.sort_by_discount {
        Some("discount_desc")
    } else if filters.new_ones_first {
        Some("first_sellable_at_desc")
    } else if filters.sort_by_rating {
        Some("average_rating")
    } else {
        None
    }
}

fn quote_plus(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Material, Shape};

    #[test]
    fn compile_is_deterministic() {
        let filters = Filters {
            width_min: Some(120),
            price_max: Some(900),
            material: Some(Material::Textile),
            sort_by_popularity: true,
            color: Some("white".to_string()),
            ..Filters::default()
        };
        let first = compile(&filters, 10, 0);
        let second = compile(&filters, 10, 0);
        assert_eq!(first, second);
        assert_eq!(first.request_url("https://www.home24.de"), second.request_url("https://www.home24.de"));
    }

    #[test]
    fn token_order_is_fixed() {
        let filters = Filters {
            product_name: Some("sofas JENNY".to_string()),
            width_min: Some(100),
            width_max: Some(250),
            height_max: Some(80),
            price_min: Some(200),
            material: Some(Material::SolidWood),
            shape: Some(Shape::LShaped),
            average_rating: Some(4),
            prices_low_to_high: true,
            color: Some("beige".to_string()),
            ..Filters::default()
        };
        assert_eq!(
            facet_params(&filters),
            "query=sofas+JENNY&width.min=100&width.max=250&height.max=80&price.min=200&\
             material=solidwood&shape=lshaped&averageRating=★★★★+und+mehr&order=price_asc&color=beige&"
        );
    }

    #[test]
    fn only_the_highest_priority_sort_flag_is_emitted() {
        let filters = Filters {
            prices_low_to_high: true,
            sort_by_popularity: true,
            sort_by_rating: true,
            ..Filters::default()
        };
        let params = facet_params(&filters);
        assert!(params.contains("order=price_asc&"));
        assert!(!params.contains("relevance"));
        assert!(!params.contains("average_rating"));
        assert_eq!(params.matches("order=").count(), 1);
    }

    #[test]
    fn rating_three_compiles_to_its_token() {
        let filters = Filters {
            average_rating: Some(3),
            ..Filters::default()
        };
        assert_eq!(facet_params(&filters), "averageRating=★★★+und+mehr&");
    }

    #[test]
    fn modes_select_their_persisted_query() {
        let category = compile(&Filters::default(), 10, 0);
        assert!(category.extensions.contains(CATEGORY_SEARCH_HASH));
        assert!(category.variables.contains(CATEGORY_ID_SOFA_COUCH));
        assert!(category.variables.contains("\"backend\":\"ThirdParty\""));
        assert!(!category.variables.contains("\"query\""));

        let product = compile(
            &Filters {
                product_name: Some("beds LUND".to_string()),
                ..Filters::default()
            },
            10,
            0,
        );
        assert!(product.extensions.contains(PRODUCT_SEARCH_HASH));
        assert!(product.variables.contains("\"query\":\"beds LUND\""));
        assert!(!product.variables.contains("\"backend\""));
    }

    #[test]
    fn pagination_is_always_present() {
        let compiled = compile(&Filters::default(), 24, 48);
        assert!(compiled.variables.contains("\"first\":24"));
        assert!(compiled.variables.contains("\"offset\":48"));
    }

    #[test]
    fn request_url_percent_encodes_the_envelopes() {
        let compiled = compile(&Filters::default(), 10, 0);
        let url = compiled.request_url("https://www.home24.de");
        assert!(url.starts_with("https://www.home24.de/graphql?extensions=%7B"));
        assert!(!url.contains('"'));
    }
}
