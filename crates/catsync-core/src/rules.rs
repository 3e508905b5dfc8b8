use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Business rules the product mapper applies: which catalog branches are
/// published and how output fields are labelled.
///
/// Every field except `brands` has a default matching the production
/// deployment, so a rules file may list only the brands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRules {
    /// Category that must appear on a product's ancestor chain.
    #[serde(default = "default_required_category")]
    pub required_category: String,
    /// Brand categories that are published; at least one must appear on the
    /// ancestor chain.
    pub brands: Vec<String>,
    /// Price-type description whose price is exported.
    #[serde(default = "default_retail_price_type")]
    pub retail_price_type: String,
    #[serde(default = "default_in_stock_label")]
    pub in_stock_label: String,
    #[serde(default = "default_on_order_label")]
    pub on_order_label: String,
    /// Label placed before the SKU in titles, e.g. `"арт."` gives `"[арт. X1]"`.
    #[serde(default = "default_sku_label")]
    pub sku_label: String,
    #[serde(default = "default_catalog_root_path")]
    pub catalog_root_path: String,
    /// Prefix of the per-brand category path, `"{prefix}/{brand}"`.
    #[serde(default = "default_brand_path_prefix")]
    pub brand_path_prefix: String,
}

fn default_required_category() -> String {
    "Запасные части".to_string()
}

fn default_retail_price_type() -> String {
    "Розничная цена".to_string()
}

fn default_in_stock_label() -> String {
    "В наличии".to_string()
}

fn default_on_order_label() -> String {
    "На заказ".to_string()
}

fn default_sku_label() -> String {
    "арт.".to_string()
}

fn default_catalog_root_path() -> String {
    "Запчасти/Каталог".to_string()
}

fn default_brand_path_prefix() -> String {
    "Запчасти".to_string()
}

impl MappingRules {
    /// Rules with production defaults for the given brand allow-list.
    #[must_use]
    pub fn with_brands<I, S>(brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_category: default_required_category(),
            brands: brands.into_iter().map(Into::into).collect(),
            retail_price_type: default_retail_price_type(),
            in_stock_label: default_in_stock_label(),
            on_order_label: default_on_order_label(),
            sku_label: default_sku_label(),
            catalog_root_path: default_catalog_root_path(),
            brand_path_prefix: default_brand_path_prefix(),
        }
    }

    #[must_use]
    pub fn is_published_brand(&self, name: &str) -> bool {
        self.brands.iter().any(|b| b == name)
    }
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    rules: MappingRules,
}

/// Load and validate mapping rules from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_rules(path: &Path) -> Result<MappingRules, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_rules(&content)
}

/// Parse and validate mapping rules from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text is not valid YAML or fails validation.
pub fn parse_rules(content: &str) -> Result<MappingRules, ConfigError> {
    let file: RulesFile = serde_yaml::from_str(content)?;
    validate_rules(&file.rules)?;
    Ok(file.rules)
}

fn validate_rules(rules: &MappingRules) -> Result<(), ConfigError> {
    let labels = [
        ("required_category", &rules.required_category),
        ("retail_price_type", &rules.retail_price_type),
        ("sku_label", &rules.sku_label),
        ("in_stock_label", &rules.in_stock_label),
        ("on_order_label", &rules.on_order_label),
        ("catalog_root_path", &rules.catalog_root_path),
        ("brand_path_prefix", &rules.brand_path_prefix),
    ];
    for (field, value) in labels {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{field} must be non-empty")));
        }
    }

    if rules.brands.is_empty() {
        return Err(ConfigError::Validation(
            "at least one brand must be listed".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for brand in &rules.brands {
        if brand.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(brand.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand name: '{brand}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
