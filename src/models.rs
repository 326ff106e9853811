use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Outer dimensions of a product in centimetres, scraped from its detail
/// page. Attached to a [`Product`] only when all three sides were found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// A canonical search result. The first six fields come from the search
/// response; the optional tail is filled in by the enrichment engine from
/// the product's detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub image_url: String,
    pub price_eur: f64,
    pub product_url: String,
    pub brand: String,
    pub rating: f64,
    pub dimensions: Option<Dimensions>,
    pub weight: Option<f64>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub category: Option<String>,
    pub delivery_time: Option<String>,
    pub description: Option<String>,
}

impl Product {
    /// A result row as it comes out of the search response, before any
    /// detail page has been visited.
    pub fn bare(name: String, image_url: String, price_eur: f64, product_url: String, brand: String, rating: f64) -> Self {
        Self {
            name,
            image_url,
            price_eur,
            product_url,
            brand,
            rating,
            dimensions: None,
            weight: None,
            color: None,
            material: None,
            category: None,
            delivery_time: None,
            description: None,
        }
    }
}

macro_rules! facet {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $(#[serde(rename = $token)] $variant,)+
        }

        impl $name {
            /// The upstream facet token for this value.
            pub fn as_param(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }
        }
    };
}

facet! {
    Material {
        Bamboo => "bamboo",
        EngineeredWood => "engineeredWood",
        Metal => "metal",
        NaturalFiber => "naturalfiber",
        Other => "other",
        Plastic => "plastic",
        RealLeather => "realleather",
        SolidWood => "solidwood",
        SyntheticFur => "syntheticFur",
        SyntheticLeather => "syntheticleather",
        Textile => "textile",
        WoodSemisolid => "woodsemisolid",
    }
}

facet! {
    Shape {
        LShaped => "lshaped",
        Rectangular => "rectangular",
        Square => "square",
    }
}

facet! {
    Style {
        Industrial => "industrial",
        ModernStyle => "modernStyle",
        NewCountry => "newCountry",
        Scandinavian => "scandinavian",
    }
}

facet! {
    Textile {
        BlendedFabric => "blendedfabric",
        Boucle => "boucle",
        Chenille => "chenille",
        ChenilleFabric => "chenillefabric",
        Cord => "cord",
        Cotton => "cotton",
        FakeFur => "fakeFur",
        Felt => "felt",
        Flannel => "flannel",
        FlatFabric => "flatfabric",
        Fleece => "fleece",
        Jeans => "jeans",
        Jersey => "jersey",
        Linen => "linen",
        Microfiber => "microfiber",
        NetFabric => "netfabric",
        Nylon => "nylon",
        Polyamid => "polyamid",
        Polyester => "polyester",
        Satin => "satin",
        SyntheticLeather => "syntethicLeather",
        TeddyFabric => "teddyFabric",
        Terrycloth => "terrycloth",
        Textile2 => "textile2",
        Velvet => "velvet",
        Wool => "wool",
    }
}

facet! {
    Pattern {
        Flowered => "flowered",
        Motif => "motif",
        Unicolored => "unicolored",
        Vintage => "vintage",
        WoodLook => "woodLook",
    }
}

facet! {
    StorageSpaceBeds {
        BedBoxBothSides => "bedBoxBothSides",
        BedBoxLeftSide => "bedBoxLeftSide",
        BedBoxRightSide => "bedBoxRightSide",
        NoBedBox => "noBedBox",
        WithBedBox => "withBedBox",
    }
}

/// The star-glyph facet tokens the upstream expects for minimum ratings.
pub fn rating_token(average_rating: u8) -> Option<&'static str> {
    match average_rating {
        2 => Some("★★+und+mehr"),
        3 => Some("★★★+und+mehr"),
        4 => Some("★★★★+und+mehr"),
        5 => Some("★★★★★"),
        _ => None,
    }
}

/// Which of the two upstream search operations a filter set selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Free-text search across all categories by name/brand token.
    ProductName,
    /// Browsing a fixed category with structured facet filters.
    Category,
}

/// Query intent parsed from a sentence. All lengths are centimetres.
///
/// Bound pairs are independent; a `min` without its `max` is an open-ended
/// range, and `min > max` is passed through to the upstream unchecked.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Filters {
    pub width_min: Option<u32>,
    pub width_max: Option<u32>,
    pub depth_min: Option<u32>,
    pub depth_max: Option<u32>,
    pub height_min: Option<u32>,
    pub height_max: Option<u32>,
    pub diameter_min: Option<u32>,
    pub diameter_max: Option<u32>,

    pub price_min: Option<u32>,
    pub price_max: Option<u32>,

    /// Free-text product/brand term, prefixed with its category noun.
    /// Presence switches the whole pipeline to product-name search.
    pub product_name: Option<String>,

    pub material: Option<Material>,
    pub shape: Option<Shape>,
    pub style: Option<Style>,
    pub textile: Option<Textile>,
    pub pattern: Option<Pattern>,
    pub storage_space_beds: Option<StorageSpaceBeds>,

    /// Minimum average rating, an integer between 2 and 5.
    pub average_rating: Option<u8>,

    pub prices_low_to_high: bool,
    pub prices_high_to_low: bool,
    pub sort_by_popularity: bool,
    pub sort_by_discount: bool,
    pub sort_by_rating: bool,
    pub new_ones_first: bool,

    /// Hard short-circuit to the static flooring catalog.
    pub is_floors_search: bool,

    pub color: Option<String>,
}

impl Filters {
    pub fn is_product_search(&self) -> bool {
        self.product_name.is_some()
    }

    pub fn is_category_search(&self) -> bool {
        self.product_name.is_none()
    }

    pub fn search_mode(&self) -> SearchMode {
        if self.is_product_search() {
            SearchMode::ProductName
        } else {
            SearchMode::Category
        }
    }

    /// Range checks that the type system cannot express. Categorical
    /// fields are already closed enumerations, so the only remaining
    /// check is the rating window.
    pub fn validated(self) -> Result<Self> {
        let mut offending = Vec::new();
        if let Some(rating) = self.average_rating {
            if !(2..=5).contains(&rating) {
                offending.push(format!("average_rating={rating} is outside 2..=5"));
            }
        }
        if offending.is_empty() {
            Ok(self)
        } else {
            Err(Error::Validation(offending.join(", ")))
        }
    }
}
