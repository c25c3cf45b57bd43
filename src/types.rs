//! Catalog data model with JSON serialization support

use serde::{Deserialize, Serialize};

/// One product extracted from a listing tile.
///
/// The code is unique per page by site convention only; nothing here
/// enforces global uniqueness. The price is free-form display text as
/// assembled by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub code: String,
    pub price: String,
}

/// All products from one listing page, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category")]
    pub label: String,
    pub products: Vec<Product>,
}
