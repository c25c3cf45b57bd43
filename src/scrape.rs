use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::extract::{extract_tile, Skip, Tile};
use crate::fetch::SiteClient;
use crate::{Category, Product, IMAGE_DIR, LISTING_PAGES, OUTPUT_FILE};

/// Class combination marking one product tile on the listing pages.
const TILE_SELECTOR: &str = "div.VDA-32.Vera.product";

/// Pause between products; keeps the interleaved image requests from
/// hammering the origin.
const PRODUCT_DELAY: Duration = Duration::from_millis(500);

/// Parses a fetched listing body into per-tile outcomes, document order.
pub(crate) fn extract_tiles(body: &str) -> Vec<Result<Tile, Skip>> {
    let document = Html::parse_document(body);
    let tile_selector = Selector::parse(TILE_SELECTOR).unwrap();
    document.select(&tile_selector).map(extract_tile).collect()
}

/// Scrapes one listing page. A fetch error yields an empty list and a
/// malformed tile is skipped; neither aborts the run.
pub fn scrape_page(client: &SiteClient, url: &str, label: &str, quiet: bool) -> Vec<Product> {
    if !quiet {
        println!("\nScraping {} category: {}", label, url);
    }

    let body = match client.fetch_listing(url) {
        Ok(body) => body,
        Err(e) => {
            eprintln!("Listing fetch failed ({}): {:#}", label, e);
            return Vec::new();
        }
    };

    let outcomes = extract_tiles(&body);
    if !quiet {
        println!("Found {} product tiles", outcomes.len());
    }

    let total = outcomes.len();
    let mut products = Vec::new();
    for (i, outcome) in outcomes.into_iter().enumerate() {
        let tile = match outcome {
            Ok(tile) => tile,
            Err(skip) => {
                eprintln!("[{:02}/{:02}] Skipping tile: {}", i + 1, total, skip.reason());
                continue;
            }
        };

        if !quiet {
            println!("[{:02}/{:02}] {} - {}", i + 1, total, tile.code, tile.price);
        }

        match &tile.image {
            Some(src) => {
                client.download_image(src, &tile.code, Path::new(IMAGE_DIR), quiet);
            }
            None => eprintln!("  No image found for {}", tile.code),
        }

        products.push(Product {
            code: tile.code,
            price: tile.price,
        });

        thread::sleep(PRODUCT_DELAY);
    }

    products
}

fn write_catalog(catalog: &[Category], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(catalog)?;
    fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

fn print_summary(catalog: &[Category]) {
    let total: usize = catalog.iter().map(|c| c.products.len()).sum();
    println!("\n--- Summary ---");
    println!("Categories: {}", catalog.len());
    println!("Total products: {}", total);
    for category in catalog {
        println!("  {}: {} products", category.label, category.products.len());
    }
}

/// Runs the whole pipeline: both listing pages, image archive, catalog
/// document, summary. Individual failures never stop the run; only
/// bootstrap (client, output directory) can error out.
pub fn run_scrape(quiet: bool) -> Result<()> {
    let client = SiteClient::new()?;
    fs::create_dir_all(IMAGE_DIR).with_context(|| format!("Failed to create {}/", IMAGE_DIR))?;

    let mut catalog: Vec<Category> = Vec::new();
    for (url, label) in LISTING_PAGES {
        let products = scrape_page(&client, url, label, quiet);
        if products.is_empty() {
            eprintln!("No products found in {} category", label);
            continue;
        }
        if !quiet {
            println!("{} category done: {} products", label, products.len());
        }
        catalog.push(Category {
            label: label.to_string(),
            products,
        });
    }

    // The summary reports the in-memory catalog either way.
    match write_catalog(&catalog, Path::new(OUTPUT_FILE)) {
        Ok(()) => {
            if !quiet {
                println!("\nCatalog written to {}", OUTPUT_FILE);
            }
        }
        Err(e) => eprintln!("Failed to write catalog: {:#}", e),
    }

    print_summary(&catalog);
    Ok(())
}
