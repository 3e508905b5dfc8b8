//! Catalog assembly: joins the raw ERP entity sets into expanded product
//! records and maps them into [`Product`]s.

use crate::categories::{parent_id_of, CategoryTree};
use crate::entity::{Entity, EntityCollection};
use crate::error::CategoryError;
use crate::fields;
use crate::mapper::ProductMapper;
use crate::products::Product;
use crate::rules::MappingRules;

/// The four entity sets one sync run reads from the ERP.
#[derive(Debug, Clone, Default)]
pub struct RawCatalog {
    /// Catalog items and folders.
    pub products: EntityCollection,
    pub stock: EntityCollection,
    pub prices: EntityCollection,
    pub price_types: EntityCollection,
}

/// Result of mapping a whole catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogMapping {
    /// Published products in catalog order.
    pub products: Vec<Product>,
    /// Distinct reference-integrity failures. Items below a broken folder
    /// are left out of `products`.
    pub integrity_errors: Vec<CategoryError>,
    /// Items dropped by the mapping rules.
    pub rejected: usize,
}

impl CatalogMapping {
    /// Keeps at most `max` products, returning how many were dropped.
    pub fn truncate(&mut self, max: usize) -> usize {
        let dropped = self.products.len().saturating_sub(max);
        self.products.truncate(max);
        dropped
    }
}

/// Denormalizes the raw sets: prices gain their price type, then products
/// gain their prices and stock balances.
#[must_use]
pub fn assemble(raw: &RawCatalog) -> EntityCollection {
    let prices = raw.prices.expand_on(
        &raw.price_types,
        fields::PRICE_TYPE_KEY,
        fields::REF_KEY,
        fields::EXPANDED_PRICE_TYPE,
    );

    raw.products
        .expand_on(
            &prices,
            fields::REF_KEY,
            fields::PRODUCT_KEY,
            fields::EXPANDED_PRICES,
        )
        .expand_on(
            &raw.stock,
            fields::REF_KEY,
            fields::PRODUCT_KEY,
            fields::EXPANDED_STOCK,
        )
}

/// Assembles the catalog, resolves each item's folder chain and applies the
/// mapping rules.
#[must_use]
pub fn map_catalog(raw: &RawCatalog, rules: &MappingRules) -> CatalogMapping {
    let tree = CategoryTree::from_entities(&raw.products);
    let mapper = ProductMapper::new(rules);
    let mut mapping = CatalogMapping::default();

    for item in assemble(raw).iter().filter(|e| !is_folder(e)) {
        let ancestors = match parent_id_of(item) {
            None => Vec::new(),
            Some(folder_id) => match tree.resolve_ancestors(&folder_id) {
                Ok(chain) => chain,
                Err(err) => {
                    if !mapping.integrity_errors.contains(&err) {
                        mapping.integrity_errors.push(err);
                    }
                    continue;
                }
            },
        };

        match mapper.map(item, &ancestors) {
            Some(product) => mapping.products.push(product),
            None => mapping.rejected += 1,
        }
    }

    mapping
}

fn is_folder(entity: &Entity) -> bool {
    entity.flag(fields::IS_FOLDER) == Some(true)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn folder(id: &str, name: &str, parent: Option<&str>) -> Entity {
        Entity::new()
            .with(fields::REF_KEY, id)
            .with(fields::IS_FOLDER, true)
            .with(fields::DESCRIPTION, name)
            .with(fields::PARENT_KEY, parent.unwrap_or(fields::NIL_GUID))
    }

    fn item(id: &str, parent: &str, sku: &str) -> Entity {
        Entity::new()
            .with(fields::REF_KEY, id)
            .with(fields::IS_FOLDER, false)
            .with(fields::PARENT_KEY, parent)
            .with(fields::DESCRIPTION, "Short")
            .with(fields::FULL_NAME, format!("Part {id}"))
            .with(fields::SKU, sku)
    }

    fn sample() -> RawCatalog {
        RawCatalog {
            products: EntityCollection::new(vec![
                folder("parts", "Запасные части", None),
                folder("foton", "FOTON", Some("parts")),
                folder("misc", "Прочее", None),
                item("p1", "foton", "SKU1"),
                item("p2", "misc", "SKU2"),
                item("p3", "foton", ""),
                item("p4", "foton", "SKU4"),
            ]),
            stock: EntityCollection::new(vec![Entity::new()
                .with(fields::PRODUCT_KEY, "p1")
                .with(fields::STOCK_QUANTITY, 3_i64)]),
            prices: EntityCollection::new(vec![
                Entity::new()
                    .with(fields::PRODUCT_KEY, "p1")
                    .with(fields::PRICE_TYPE_KEY, "wholesale")
                    .with(fields::PRICE_VALUE, 70_i64),
                Entity::new()
                    .with(fields::PRODUCT_KEY, "p1")
                    .with(fields::PRICE_TYPE_KEY, "retail")
                    .with(fields::PRICE_VALUE, 100_i64),
            ]),
            price_types: EntityCollection::new(vec![
                Entity::new()
                    .with(fields::REF_KEY, "retail")
                    .with(fields::DESCRIPTION, "Розничная цена"),
                Entity::new()
                    .with(fields::REF_KEY, "wholesale")
                    .with(fields::DESCRIPTION, "Оптовая цена"),
            ]),
        }
    }

    #[test]
    fn assemble_keeps_every_record_and_adds_join_fields() {
        let raw = sample();
        let assembled = assemble(&raw);

        assert_eq!(assembled.len(), raw.products.len());
        let p1 = assembled
            .iter()
            .find(|e| e.text(fields::REF_KEY) == Some("p1"))
            .unwrap();
        assert_eq!(p1.nested(fields::EXPANDED_PRICES).count(), 2);
        assert_eq!(p1.nested(fields::EXPANDED_STOCK).count(), 1);
    }

    #[test]
    fn map_catalog_publishes_only_matching_items() {
        let rules = MappingRules::with_brands(["FOTON", "ASHOK"]);
        let mapping = map_catalog(&sample(), &rules);

        let skus: Vec<&str> = mapping.products.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["SKU1", "SKU4"]);
        assert_eq!(mapping.rejected, 2);
        assert!(mapping.integrity_errors.is_empty());

        let p1 = &mapping.products[0];
        assert_eq!(p1.price, Some(Decimal::from(100)));
        assert_eq!(p1.description, "В наличии");
        assert_eq!(p1.brand, "FOTON");
        assert_eq!(p1.title, "Part p1 [арт. SKU1]");
        assert_eq!(mapping.products[1].description, "На заказ");
        assert_eq!(mapping.products[1].price, None);
    }

    #[test]
    fn broken_subtree_is_reported_once_and_skipped() {
        let mut raw = sample();
        let mut products = raw.products.clone().into_inner();
        products.push(folder("orphan", "Orphan", Some("ghost")));
        products.push(item("p5", "orphan", "SKU5"));
        products.push(item("p6", "orphan", "SKU6"));
        raw.products = EntityCollection::new(products);

        let mapping = map_catalog(&raw, &MappingRules::with_brands(["FOTON"]));

        assert_eq!(mapping.integrity_errors.len(), 1);
        assert!(matches!(
            mapping.integrity_errors[0],
            CategoryError::UnknownParent { ref parent_id, .. } if parent_id == "ghost"
        ));
        assert_eq!(mapping.products.len(), 2);
    }

    #[test]
    fn item_under_unknown_folder_is_an_integrity_error() {
        let mut raw = sample();
        raw.products = EntityCollection::new(vec![item("p9", "missing-folder", "SKU9")]);

        let mapping = map_catalog(&raw, &MappingRules::with_brands(["FOTON"]));

        assert!(mapping.products.is_empty());
        assert!(matches!(
            mapping.integrity_errors.as_slice(),
            [CategoryError::UnknownCategory { id }] if id == "missing-folder"
        ));
    }

    #[test]
    fn truncate_reports_dropped_count() {
        let mut mapping = map_catalog(&sample(), &MappingRules::with_brands(["FOTON"]));
        assert_eq!(mapping.truncate(1), 1);
        assert_eq!(mapping.products.len(), 1);
        assert_eq!(mapping.truncate(10), 0);
    }
}
