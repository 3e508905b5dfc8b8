use catsync_core::{fields, Entity, EntityCollection, ProductKey};

use super::*;

const ROOT: &str = "f-root";
const FOTON: &str = "f-foton";
const OILS: &str = "f-oils";

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
        .with(fields::DESCRIPTION, format!("Part {id}"))
        .with(fields::FULL_NAME, format!("Part {id}"))
        .with(fields::SKU, sku)
}

fn catalog(items: Vec<Entity>) -> RawCatalog {
    let mut products = vec![
        folder(ROOT, "Запасные части", None),
        folder(FOTON, "FOTON", Some(ROOT)),
        folder(OILS, "Масла", None),
    ];
    products.extend(items);
    RawCatalog {
        products: EntityCollection::new(products),
        ..RawCatalog::default()
    }
}

fn settings(max_products: usize, strict: bool) -> PlanSettings<'static> {
    PlanSettings {
        max_products,
        default_image: "default.jpg",
        strict,
    }
}

fn images(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| (*n).to_owned()).collect()
}

fn keys<T: ProductKey>(items: &[T]) -> Vec<&str> {
    items.iter().map(ProductKey::product_key).collect()
}

#[test]
fn first_run_processes_every_published_item() {
    let raw = catalog(vec![
        item("p1", FOTON, "SKU1"),
        item("p2", FOTON, "SKU2"),
        item("p3", OILS, "SKU3"),
    ]);
    let rules = MappingRules::with_brands(["FOTON"]);

    let plan = plan_run(
        &raw,
        &rules,
        &images(&["SKU1.jpg", "default.jpg"]),
        &StateSnapshot::new(),
        &settings(100, false),
    )
    .unwrap();

    assert_eq!(keys(&plan.needs_processing), vec!["p1", "p2"]);
    assert!(plan.already_done.is_empty());
    assert_eq!(plan.needs_processing[0].image, "SKU1.jpg");
    assert_eq!(plan.needs_processing[1].image, "default.jpg");
    assert_eq!(plan.next_snapshot.keys().collect::<Vec<_>>(), vec!["p1", "p2"]);
}

#[test]
fn previously_processed_items_are_already_done() {
    let raw = catalog(vec![item("p1", FOTON, "SKU1"), item("p2", FOTON, "SKU2")]);
    let rules = MappingRules::with_brands(["FOTON"]);
    let previous: StateSnapshot = ["p1"].into_iter().collect();

    let plan = plan_run(&raw, &rules, &images(&[]), &previous, &settings(100, false)).unwrap();

    assert_eq!(keys(&plan.needs_processing), vec!["p2"]);
    assert_eq!(keys(&plan.already_done), vec!["p1"]);
}

#[test]
fn second_identical_run_has_nothing_to_process() {
    let raw = catalog(vec![item("p1", FOTON, "SKU1"), item("p2", FOTON, "SKU2")]);
    let rules = MappingRules::with_brands(["FOTON"]);

    let first = plan_run(&raw, &rules, &images(&[]), &StateSnapshot::new(), &settings(100, false))
        .unwrap();
    let second = plan_run(&raw, &rules, &images(&[]), &first.next_snapshot, &settings(100, false))
        .unwrap();

    assert!(second.needs_processing.is_empty());
    assert_eq!(second.already_done.len(), 2);
}

#[test]
fn product_cap_truncates_before_diffing() {
    let raw = catalog(vec![
        item("p1", FOTON, "SKU1"),
        item("p2", FOTON, "SKU2"),
        item("p3", FOTON, "SKU3"),
    ]);
    let rules = MappingRules::with_brands(["FOTON"]);

    let plan = plan_run(&raw, &rules, &images(&[]), &StateSnapshot::new(), &settings(2, false))
        .unwrap();

    assert_eq!(keys(&plan.needs_processing), vec!["p1", "p2"]);
    assert_eq!(plan.next_snapshot.len(), 2);
}

#[test]
fn dangling_parent_is_skipped_unless_strict() {
    let raw = catalog(vec![
        item("p1", FOTON, "SKU1"),
        item("p2", "f-missing", "SKU2"),
    ]);
    let rules = MappingRules::with_brands(["FOTON"]);

    let lenient = plan_run(&raw, &rules, &images(&[]), &StateSnapshot::new(), &settings(100, false))
        .unwrap();
    assert_eq!(keys(&lenient.needs_processing), vec!["p1"]);

    let strict = plan_run(&raw, &rules, &images(&[]), &StateSnapshot::new(), &settings(100, true));
    let err = strict.err().expect("strict mode must fail");
    assert!(err.to_string().contains("strict mode"), "{err}");
}
