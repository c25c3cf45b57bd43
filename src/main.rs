use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::Path;

mod extract;
mod fetch;
mod scrape;
#[cfg(test)]
mod testsupport;
mod types;

pub use types::*;

pub const SITE_ORIGIN: &str = "https://enfadavetiye.com";
pub const IMAGE_DIR: &str = "images";
pub const OUTPUT_FILE: &str = "products.json";

/// The two listing pages, with the category label each one feeds.
pub const LISTING_PAGES: [(&str, &str); 2] = [
    ("https://enfadavetiye.com/tr/Product/List", "Normal"),
    ("https://enfadavetiye.com/tr/Product/ListSunnet", "Sunnet"),
];

#[derive(Parser)]
#[command(name = "enfa-catalog")]
#[command(about = "Enfa Davetiye product catalog scraper")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape both listing pages into products.json and images/
    Scrape {
        /// Quiet mode - suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Remove generated files (products.json and images/ folder)
    Clean,
}

fn run_clean() -> Result<()> {
    println!("Cleaning generated files...");

    let output_path = Path::new(OUTPUT_FILE);
    if output_path.exists() {
        fs::remove_file(output_path)?;
        println!("  Removed {}", OUTPUT_FILE);
    }

    let image_path = Path::new(IMAGE_DIR);
    if image_path.exists() {
        fs::remove_dir_all(image_path)?;
        println!("  Removed {}/", IMAGE_DIR);
    }

    println!("Clean complete!");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Plain `enfa-catalog` runs a full scrape.
        None => scrape::run_scrape(false),
        Some(Commands::Scrape { quiet }) => scrape::run_scrape(quiet),
        Some(Commands::Clean) => run_clean(),
    }
}
