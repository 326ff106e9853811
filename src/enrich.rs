use futures::future::join_all;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::error;

use crate::models::{Dimensions, Product};

/// Visits every product's detail page concurrently and merges whatever
/// could be extracted back into the batch. One page's failure never
/// touches its siblings; a failed product simply keeps its optional
/// fields absent.
pub struct EnrichmentEngine {
    client: reqwest::Client,
}

/// Everything a single detail page can contribute. Each field is
/// independently optional.
#[derive(Debug, Default)]
struct Enrichment {
    dimensions: Option<Dimensions>,
    weight: Option<f64>,
    color: Option<String>,
    material: Option<String>,
    category: Option<String>,
    delivery_time: Option<String>,
    description: Option<String>,
}

/// Raw label readout of the dimension block. Kept separate from
/// [`Dimensions`] because every label is independently optional here,
/// while the bundle requires all three sides.
#[derive(Debug, Default)]
struct DimensionReadout {
    width: Option<u32>,
    height: Option<u32>,
    depth: Option<u32>,
    weight: Option<u32>,
}

impl DimensionReadout {
    fn slot_mut(&mut self, label: &str) -> Option<&mut Option<u32>> {
        match label {
            "Breite" => Some(&mut self.width),
            "Höhe" => Some(&mut self.height),
            "Tiefe" => Some(&mut self.depth),
            "Gewicht" => Some(&mut self.weight),
            _ => None,
        }
    }

    fn bundle(&self) -> Option<Dimensions> {
        Some(Dimensions {
            width: f64::from(self.width?),
            height: f64::from(self.height?),
            depth: f64::from(self.depth?),
        })
    }

    fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.depth.is_none() && self.weight.is_none()
    }
}

impl EnrichmentEngine {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fan-out/fan-in over the whole batch: all detail fetches start at
    /// once, the call returns when the last one finished. Results are
    /// merged back by index, so no task ever touches a sibling's product.
    pub async fn enrich(&self, products: &mut [Product]) {
        let jobs: Vec<_> = products
            .iter()
            .map(|product| self.enrich_one(product.product_url.clone()))
            .collect();
        let outcomes = join_all(jobs).await;

        for (product, outcome) in products.iter_mut().zip(outcomes) {
            match outcome {
                Ok(extra) => apply(product, extra),
                Err(reason) => {
                    error!("Request to product detail failed. url: {}, reason: {}", product.product_url, reason);
                }
            }
        }
    }

    async fn enrich_one(&self, url: String) -> Result<Enrichment, String> {
        let response = self.client.get(&url).send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            return Err(format!("status: {}, body: {}", status, snippet(&body)));
        }
        Ok(extract_all(&url, &body))
    }
}

fn apply(product: &mut Product, extra: Enrichment) {
    product.dimensions = extra.dimensions;
    product.weight = extra.weight;
    product.color = extra.color;
    product.material = extra.material;
    product.category = extra.category;
    product.delivery_time = extra.delivery_time;
    product.description = extra.description;
}

fn extract_all(url: &str, html: &str) -> Enrichment {
    let document = Html::parse_document(html);

    let readout = extract_dimensions(&document);
    let dimensions = readout.bundle();
    if dimensions.is_none() && !readout.is_empty() {
        error!("Could not assemble dimensions. readout: {:?}, url: {}", readout, url);
    }
    let weight = readout.weight.map(f64::from);

    let (color, material) = extract_color_and_material(&document);

    Enrichment {
        dimensions,
        weight,
        color,
        material,
        category: extract_category_name(&document),
        delivery_time: extract_delivery_time(&document),
        description: extract_description(&document),
    }
}

/// Reads the labeled dimension block. The current page layout keys the
/// block with a section name; older variants carry the same label/value
/// pairs on emotion classes, so those are tried before giving up.
fn extract_dimensions(document: &Html) -> DimensionReadout {
    let section_sel = Selector::parse(r#"div[data-section-name="product_dimensions"]"#).unwrap();
    if let Some(section) = document.select(&section_sel).next() {
        return read_labeled_pairs(section);
    }

    for class_variant in ["div.e1kn6ntn3", "div.emotion-cache-h7y6ra"] {
        let block_sel = Selector::parse(class_variant).unwrap();
        let blocks: Vec<_> = document.select(&block_sel).collect();
        if !blocks.is_empty() {
            return read_legacy_blocks(&blocks);
        }
    }

    DimensionReadout::default()
}

/// Each label sits in its own leaf div; its value is the next element in
/// the same row. Values keep their unit suffix ("173 cm"), so only the
/// first run of digits counts. A non-numeric value leaves the slot unset.
fn read_labeled_pairs(section: ElementRef<'_>) -> DimensionReadout {
    let div_sel = Selector::parse("div").unwrap();
    let mut readout = DimensionReadout::default();

    for div in section.select(&div_sel) {
        let label = div.text().collect::<String>();
        let Some(slot) = readout.slot_mut(label.trim()) else {
            continue;
        };
        if slot.is_some() {
            continue;
        }
        let Some(value_el) = next_sibling_element(div) else {
            continue;
        };
        let value_text = value_el.text().collect::<String>();
        *slot = first_digit_run(&value_text);
    }

    readout
}

fn read_legacy_blocks(blocks: &[ElementRef<'_>]) -> DimensionReadout {
    let label_sel = Selector::parse("div.e1kn6ntn4").unwrap();
    let value_sel = Selector::parse("div.e1kn6ntn5").unwrap();
    let mut readout = DimensionReadout::default();

    for block in blocks {
        let Some(label_el) = block.select(&label_sel).next() else {
            continue;
        };
        let Some(value_el) = block.select(&value_sel).next() else {
            continue;
        };
        let label = label_el.text().collect::<String>();
        let Some(slot) = readout.slot_mut(label.trim()) else {
            continue;
        };
        if slot.is_none() {
            let value_text = value_el.text().collect::<String>();
            *slot = first_digit_run(&value_text);
        }
    }

    readout
}

/// Material comes from a leaf span reading "Material: <value>"; color
/// sits one nested list down from a leaf div reading "Farbe".
fn extract_color_and_material(document: &Html) -> (Option<String>, Option<String>) {
    let section_sel = Selector::parse(r#"section[data-testid="section-content-product_details"]"#).unwrap();
    let Some(section) = document.select(&section_sel).next() else {
        return (None, None);
    };

    let span_sel = Selector::parse("span").unwrap();
    let material = section
        .select(&span_sel)
        .filter(is_leaf)
        .map(|span| span.text().collect::<String>())
        .find(|text| text.contains("Material"))
        .and_then(|text| {
            text.split_once(':')
                .map(|(_, rest)| rest.trim().to_string())
        })
        .filter(|text| !text.is_empty());

    let div_sel = Selector::parse("div").unwrap();
    let ul_sel = Selector::parse("ul").unwrap();
    let mut color = None;
    for div in section.select(&div_sel) {
        if div.text().collect::<String>().trim() != "Farbe" {
            continue;
        }
        let Some(parent) = div.parent().and_then(ElementRef::wrap) else {
            break;
        };
        if let Some(span) = parent
            .select(&ul_sel)
            .next()
            .and_then(|ul| ul.select(&span_sel).next())
        {
            let text = span.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                color = Some(text);
            }
        }
        break;
    }

    (color, material)
}

/// Last entry of the breadcrumb list, text of its leaf span.
fn extract_category_name(document: &Html) -> Option<String> {
    let breadcrumb = ["ol.emotion-cache-12rx5a3", r#"nav[aria-label="Breadcrumb"] ol"#]
        .iter()
        .find_map(|selector| {
            let sel = Selector::parse(selector).unwrap();
            document.select(&sel).next()
        })?;

    let last_item = breadcrumb.children().filter_map(ElementRef::wrap).last()?;
    let span_sel = Selector::parse("span").unwrap();
    let span = last_item.select(&span_sel).next()?;
    let text = span.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// The delivery notice holds one line per fact; the one starting with the
/// "Lieferung" keyword carries the time after its colon.
fn extract_delivery_time(document: &Html) -> Option<String> {
    let section_sel = Selector::parse(r#"section[data-testid="delivery-time-notice"]"#).unwrap();
    let section = document.select(&section_sel).next()?;

    let div_sel = Selector::parse("div").unwrap();
    for div in section.select(&div_sel) {
        let text = div.text().collect::<String>();
        if !text.contains("Lieferung") {
            continue;
        }
        return text
            .split_once(':')
            .map(|(_, rest)| rest.trim().to_string())
            .filter(|rest| !rest.is_empty());
    }
    None
}

fn extract_description(document: &Html) -> Option<String> {
    let sel = Selector::parse("#accordion-section-region-product_description").unwrap();
    let element = document.select(&sel).next()?;
    let text = element.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn next_sibling_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

fn is_leaf(element: &ElementRef<'_>) -> bool {
    element.children().filter_map(ElementRef::wrap).next().is_none()
}

fn first_digit_run(text: &str) -> Option<u32> {
    let digits = Regex::new(r"\d+").unwrap();
    digits.find(text)?.as_str().parse().ok()
}

fn snippet(body: &str) -> &str {
    let end = body
        .char_indices()
        .take(200)
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    &body[..end]
}
