//! Catalog synchronization engine: joins ERP entity sets, resolves the
//! category hierarchy, maps published items to products and diffs them
//! against the previous run.

pub mod app_config;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod entity;
pub mod error;
pub mod fields;
pub mod images;
pub mod mapper;
pub mod products;
pub mod rules;
pub mod state;

pub use app_config::{AppConfig, DropboxCredentials, Environment};
pub use catalog::{assemble, map_catalog, CatalogMapping, RawCatalog};
pub use categories::{brand_of, Category, CategoryTree, ResolvedCategory};
pub use config::{load_app_config, load_app_config_from_env};
pub use entity::{fields_equal, Entity, EntityCollection, FieldValue};
pub use error::{CategoryError, ConfigError};
pub use images::{match_images, stem_matches_sku};
pub use mapper::ProductMapper;
pub use products::{Product, ProductKey, ProductWithImage, ProductWithImageUrl};
pub use rules::{load_rules, parse_rules, MappingRules};
pub use state::{partition, Partition, StateSnapshot, SyncPlan};
