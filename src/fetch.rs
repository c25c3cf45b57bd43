use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::SITE_ORIGIN;

const PAGE_TIMEOUT: Duration = Duration::from_secs(15);
const IMAGE_TIMEOUT: Duration = Duration::from_secs(10);
const SCRAPE_USER_AGENT: &str = "Mozilla/5.0 (compatible; EnfaCatalogScraper/1.0)";

/// HTTP client for the site: listing pages and product images.
pub struct SiteClient {
    client: Client,
}

impl SiteClient {
    pub fn new() -> Result<Self> {
        // No default headers: only listing fetches identify themselves,
        // image requests go out bare.
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// Fetches a listing page body. Any failure (connect, timeout,
    /// non-2xx) surfaces as an error for the caller to report.
    pub fn fetch_listing(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, SCRAPE_USER_AGENT)
            .timeout(PAGE_TIMEOUT)
            .send()
            .with_context(|| format!("Failed to fetch: {}", url))?
            .error_for_status()
            .with_context(|| format!("Bad status from: {}", url))?;

        response
            .text()
            .with_context(|| format!("Failed to read response: {}", url))
    }

    /// Downloads a product image into `dir`, named by product code plus
    /// the inferred extension. Failures are reported and folded into the
    /// return value; an image is never worth aborting a page over.
    pub fn download_image(&self, src: &str, name: &str, dir: &Path, quiet: bool) -> bool {
        let url = resolve_image_url(src);
        match self.try_download(&url, name, dir) {
            Ok(filename) => {
                if !quiet {
                    println!("  Downloaded image: {}", filename);
                }
                true
            }
            Err(e) => {
                eprintln!("  Image download failed ({}): {:#}", name, e);
                false
            }
        }
    }

    fn try_download(&self, url: &str, name: &str, dir: &Path) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(IMAGE_TIMEOUT)
            .send()
            .with_context(|| format!("Failed to fetch: {}", url))?
            .error_for_status()
            .with_context(|| format!("Bad status from: {}", url))?;

        let bytes = response
            .bytes()
            .with_context(|| format!("Failed to read response: {}", url))?;

        let filename = format!("{}{}", name, infer_extension(url));
        let path = dir.join(&filename);
        fs::write(&path, &bytes).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(filename)
    }
}

/// Site-root-relative image sources get the origin prepended; anything
/// else passes through and stands or falls at request time.
pub fn resolve_image_url(src: &str) -> String {
    if src.starts_with('/') {
        format!("{}{}", SITE_ORIGIN, src)
    } else {
        src.to_string()
    }
}

/// Derives the saved file's extension from the URL's final path segment,
/// query string and fragment excluded. Defaults to .jpg when the segment
/// carries no usable extension.
pub fn infer_extension(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    let path = path.split('#').next().unwrap_or(path);
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!(".{}", ext),
        _ => ".jpg".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::serve_once;
    use std::env;

    #[test]
    fn relative_image_urls_resolve_against_origin() {
        assert_eq!(
            resolve_image_url("/img/a.jpg"),
            format!("{}/img/a.jpg", SITE_ORIGIN)
        );
    }

    #[test]
    fn absolute_image_urls_pass_through() {
        assert_eq!(
            resolve_image_url("https://cdn.example.com/img/a.png"),
            "https://cdn.example.com/img/a.png"
        );
    }

    #[test]
    fn extension_from_path_segment() {
        assert_eq!(infer_extension("https://enfadavetiye.com/img/a.png"), ".png");
        assert_eq!(infer_extension("https://enfadavetiye.com/img/a.jpg"), ".jpg");
    }

    #[test]
    fn extension_defaults_when_segment_has_none() {
        assert_eq!(infer_extension("https://enfadavetiye.com/img/photo"), ".jpg");
        assert_eq!(infer_extension("https://enfadavetiye.com/img/photo."), ".jpg");
    }

    #[test]
    fn query_string_dots_do_not_leak_into_extension() {
        assert_eq!(
            infer_extension("https://enfadavetiye.com/img/a.png?v=2.1"),
            ".png"
        );
        assert_eq!(
            infer_extension("https://enfadavetiye.com/img/photo?cache=1.2"),
            ".jpg"
        );
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = env::temp_dir().join(format!("enfa-catalog-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn download_writes_file_named_by_code() {
        let base = serve_once("HTTP/1.1 200 OK", b"fakeimagebytes");
        let dir = scratch_dir("download-ok");

        let client = SiteClient::new().unwrap();
        let ok = client.download_image(&format!("{}/img/a.png", base), "ENF-100", &dir, true);

        assert!(ok);
        let saved = dir.join("ENF-100.png");
        assert_eq!(fs::read(&saved).unwrap(), b"fakeimagebytes");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn download_failure_reports_false_and_writes_nothing() {
        let base = serve_once("HTTP/1.1 404 Not Found", b"");
        let dir = scratch_dir("download-404");

        let client = SiteClient::new().unwrap();
        let ok = client.download_image(&format!("{}/img/a.jpg", base), "ENF-100", &dir, true);

        assert!(!ok);
        assert!(!dir.join("ENF-100.jpg").exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn listing_fetch_rejects_bad_status() {
        let base = serve_once("HTTP/1.1 500 Internal Server Error", b"");
        let client = SiteClient::new().unwrap();
        assert!(client.fetch_listing(&base).is_err());
    }
}
