//! Rule-based mapping from joined ERP records to [`Product`]s.
//!
//! The mapper is total: every input either yields a well-formed product or
//! `None`. Missing optional data (stock, price) maps to documented defaults
//! rather than errors.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::categories::{brand_of, ResolvedCategory};
use crate::entity::{Entity, FieldValue};
use crate::fields;
use crate::products::Product;
use crate::rules::MappingRules;

/// Applies [`MappingRules`] to expanded product records.
#[derive(Debug, Clone, Copy)]
pub struct ProductMapper<'r> {
    rules: &'r MappingRules,
}

impl<'r> ProductMapper<'r> {
    #[must_use]
    pub fn new(rules: &'r MappingRules) -> Self {
        Self { rules }
    }

    /// Maps one expanded catalog item given its resolved ancestor chain.
    ///
    /// Returns `None` when the item has no SKU or no identity, or when its
    /// chain lacks the required category or every published brand.
    #[must_use]
    pub fn map(&self, raw: &Entity, ancestors: &[ResolvedCategory]) -> Option<Product> {
        let sku = raw.text(fields::SKU).map(str::trim).filter(|s| !s.is_empty())?;
        let external_id = raw.text(fields::REF_KEY).filter(|s| !s.is_empty())?;

        if !self.is_published(ancestors) {
            return None;
        }

        let description = if stock_quantity(raw) > Decimal::ZERO {
            &self.rules.in_stock_label
        } else {
            &self.rules.on_order_label
        };

        let full_name = raw
            .text(fields::FULL_NAME)
            .or_else(|| raw.text(fields::DESCRIPTION))
            .unwrap_or_default();
        let title = format!(
            "{} [{} {sku}]",
            full_name.replace(',', ", "),
            self.rules.sku_label
        );

        let brand = brand_of(ancestors);

        Some(Product {
            external_id: external_id.to_owned(),
            title,
            sku: sku.to_owned(),
            brand: brand.to_owned(),
            description: description.clone(),
            price: retail_price(raw, &self.rules.retail_price_type),
            categories: vec![
                self.rules.catalog_root_path.clone(),
                format!("{}/{brand}", self.rules.brand_path_prefix),
            ],
        })
    }

    fn is_published(&self, ancestors: &[ResolvedCategory]) -> bool {
        let has_required = ancestors
            .iter()
            .any(|c| c.name == self.rules.required_category);
        let has_brand = ancestors
            .iter()
            .any(|c| self.rules.is_published_brand(&c.name));
        has_required && has_brand
    }
}

/// Total stock over the joined balance records; `0` when there are none.
#[must_use]
pub fn stock_quantity(raw: &Entity) -> Decimal {
    raw.nested(fields::EXPANDED_STOCK)
        .filter_map(|stock| decimal_field(stock, fields::STOCK_QUANTITY))
        .sum()
}

/// Price of the first joined price record whose price type is `price_type`.
#[must_use]
pub fn retail_price(raw: &Entity, price_type: &str) -> Option<Decimal> {
    raw.nested(fields::EXPANDED_PRICES)
        .find(|price| {
            price
                .first_nested(fields::EXPANDED_PRICE_TYPE)
                .and_then(|t| t.text(fields::DESCRIPTION))
                == Some(price_type)
        })
        .and_then(|price| decimal_field(price, fields::PRICE_VALUE))
}

fn decimal_field(entity: &Entity, field: &str) -> Option<Decimal> {
    match entity.get(field)? {
        FieldValue::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        FieldValue::Text(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "mapper_test.rs"]
mod tests;
