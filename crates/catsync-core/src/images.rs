//! Attaches a local image file to each product.

use std::collections::BTreeSet;
use std::path::Path;

use crate::products::{Product, ProductWithImage};

/// Default match rule: the file stem equals the product SKU exactly
/// (`"SKU1.jpg"` matches SKU `"SKU1"`).
#[must_use]
pub fn stem_matches_sku(product: &Product, filename: &str) -> bool {
    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        == Some(product.sku.as_str())
}

/// Pairs every product with the first available file accepted by `matcher`,
/// falling back to `default_filename`. No product is ever dropped.
///
/// `available` is ordered, so ties between several matching files resolve
/// the same way on every run.
pub fn match_images<F>(
    products: Vec<Product>,
    available: &BTreeSet<String>,
    default_filename: &str,
    matcher: F,
) -> Vec<ProductWithImage>
where
    F: Fn(&Product, &str) -> bool,
{
    products
        .into_iter()
        .map(|product| {
            let image = available
                .iter()
                .find(|name| matcher(&product, name))
                .map_or_else(|| default_filename.to_owned(), Clone::clone);
            ProductWithImage { product, image }
        })
        .collect()
}
