//! Field extraction for a single product tile.

use scraper::{ElementRef, Selector};

/// Fields pulled out of one product container. The image URL is optional:
/// a tile without a photo is still a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub code: String,
    pub price: String,
    pub image: Option<String>,
}

/// Why a tile was dropped instead of yielding a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    MissingCode,
    MissingPrice,
}

impl Skip {
    pub fn reason(&self) -> &'static str {
        match self {
            Skip::MissingCode => "no product code element",
            Skip::MissingPrice => "no price element",
        }
    }
}

/// Extracts code, price, and image URL from one product container.
///
/// Code comes from the first `strong` descendant, price from the first
/// `p` descendant; either one missing skips the tile. A missing image
/// does not.
pub fn extract_tile(container: ElementRef) -> Result<Tile, Skip> {
    let strong_selector = Selector::parse("strong").unwrap();
    let p_selector = Selector::parse("p").unwrap();
    let img_selector = Selector::parse("img").unwrap();

    let code = container
        .select(&strong_selector)
        .next()
        .ok_or(Skip::MissingCode)?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    let price_elem = container
        .select(&p_selector)
        .next()
        .ok_or(Skip::MissingPrice)?;
    let price = assemble_price(price_elem);

    let image = container
        .select(&img_selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string);

    Ok(Tile { code, price, image })
}

/// The price on this site is split across the paragraph's markup (plain
/// text runs mixed with spans). Reduce the direct children to an ordered
/// list of text fragments, trim each, join with single spaces, trim the
/// result.
fn assemble_price(paragraph: ElementRef) -> String {
    let mut fragments = Vec::new();
    for node in paragraph.children() {
        if let Some(child) = ElementRef::wrap(node) {
            fragments.push(child.text().collect::<String>().trim().to_string());
        } else if let Some(text) = node.value().as_text() {
            fragments.push(text.trim().to_string());
        }
    }
    fragments.join(" ").trim().to_string()
}
