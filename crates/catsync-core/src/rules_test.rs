use std::io::Write;

use super::*;

#[test]
fn parse_rules_fills_defaults() {
    let rules = parse_rules("rules:\n  brands: [FOTON, ASHOK]\n").unwrap();
    assert_eq!(rules, MappingRules::with_brands(["FOTON", "ASHOK"]));
    assert_eq!(rules.required_category, "Запасные части");
    assert_eq!(rules.retail_price_type, "Розничная цена");
    assert_eq!(rules.catalog_root_path, "Запчасти/Каталог");
}

#[test]
fn parse_rules_accepts_overrides() {
    let yaml = r#"
rules:
  required_category: "Spare parts"
  brands: ["FOTON"]
  retail_price_type: "Retail price"
  in_stock_label: "In stock"
  on_order_label: "On order"
  sku_label: "art."
  catalog_root_path: "Parts/Catalog"
  brand_path_prefix: "Parts"
"#;
    let rules = parse_rules(yaml).unwrap();
    assert_eq!(rules.required_category, "Spare parts");
    assert_eq!(rules.sku_label, "art.");
    assert_eq!(rules.brand_path_prefix, "Parts");
}

#[test]
fn parse_rules_rejects_missing_brands() {
    let err = parse_rules("rules:\n  required_category: X\n").unwrap_err();
    assert!(matches!(err, ConfigError::RulesFileParse(_)), "got: {err:?}");
}

#[test]
fn parse_rules_rejects_empty_brand_list() {
    let err = parse_rules("rules:\n  brands: []\n").unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("at least one brand")),
        "got: {err:?}"
    );
}

#[test]
fn parse_rules_rejects_case_insensitive_duplicates() {
    let err = parse_rules("rules:\n  brands: [FOTON, foton]\n").unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")),
        "got: {err:?}"
    );
}

#[test]
fn parse_rules_rejects_blank_brand() {
    let err = parse_rules("rules:\n  brands: [\"  \"]\n").unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "got: {err:?}");
}

#[test]
fn parse_rules_rejects_blank_label() {
    let err = parse_rules("rules:\n  brands: [FOTON]\n  on_order_label: \"\"\n").unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("on_order_label")),
        "got: {err:?}"
    );
}

#[test]
fn parse_rules_rejects_blank_sku_label() {
    let err = parse_rules("rules:\n  brands: [FOTON]\n  sku_label: \"  \"\n").unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("sku_label")),
        "got: {err:?}"
    );
}

#[test]
fn load_rules_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "rules:\n  brands: [ASHOK]").unwrap();

    let rules = load_rules(file.path()).unwrap();
    assert!(rules.is_published_brand("ASHOK"));
    assert!(!rules.is_published_brand("FOTON"));
}

#[test]
fn load_rules_reports_missing_file() {
    let err = load_rules(Path::new("/nonexistent/rules.yaml")).unwrap_err();
    assert!(
        matches!(err, ConfigError::RulesFileIo { ref path, .. } if path.contains("rules.yaml")),
        "got: {err:?}"
    );
}
