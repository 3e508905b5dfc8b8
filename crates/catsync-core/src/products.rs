use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog item ready for the website import, produced by
/// [`crate::mapper::ProductMapper`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// ERP `Ref_Key`; the stable identity across runs.
    pub external_id: String,
    /// Full name with `", "` after commas and the SKU suffix appended.
    pub title: String,
    /// Never empty.
    pub sku: String,
    /// Level-1 category name, or `""` when unclassified.
    pub brand: String,
    /// Stock status label.
    pub description: String,
    /// Retail price; `None` when the ERP has no retail price for the item.
    pub price: Option<Decimal>,
    /// Catalog-root path followed by the brand path; never empty.
    pub categories: Vec<String>,
}

/// A product with its image file name from the local image directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithImage {
    pub product: Product,
    /// File name inside the image directory (match or fallback).
    pub image: String,
}

/// A product whose image has been uploaded and shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithImageUrl {
    pub product: Product,
    pub image: String,
    /// Publicly reachable image URL.
    pub image_url: String,
}

impl ProductWithImage {
    #[must_use]
    pub fn with_url(self, image_url: String) -> ProductWithImageUrl {
        ProductWithImageUrl {
            product: self.product,
            image: self.image,
            image_url,
        }
    }
}

/// Types that carry a stable product identity for run-to-run diffing.
pub trait ProductKey {
    fn product_key(&self) -> &str;
}

impl ProductKey for Product {
    fn product_key(&self) -> &str {
        &self.external_id
    }
}

impl ProductKey for ProductWithImage {
    fn product_key(&self) -> &str {
        &self.product.external_id
    }
}

impl ProductKey for ProductWithImageUrl {
    fn product_key(&self) -> &str {
        &self.product.external_id
    }
}
