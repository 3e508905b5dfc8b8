//! Field and entity-set names of the 1C OData schema the pipeline reads.
//!
//! Names prefixed `EXPANDED_` are synthetic list fields added by the
//! join/expand engine; they do not exist in the ERP.

/// Product catalog (folders and items share this entity set).
pub const SET_PRODUCTS: &str = "Catalog_Номенклатура";
/// Current stock balances per product.
pub const SET_STOCK: &str = "AccumulationRegister_ОстаткиТоваровКомпании/Balance()";
/// Latest price per product and price type.
pub const SET_PRICES: &str = "InformationRegister_Цены_RecordType/SliceLast()";
pub const SET_PRICE_TYPES: &str = "Catalog_ТипыЦен";

pub const REF_KEY: &str = "Ref_Key";
pub const PARENT_KEY: &str = "Parent_Key";
pub const IS_FOLDER: &str = "IsFolder";
pub const DESCRIPTION: &str = "Description";
pub const FULL_NAME: &str = "НаименованиеПолное";
pub const SKU: &str = "Артикул";
pub const PRODUCT_KEY: &str = "Номенклатура_Key";
pub const STOCK_QUANTITY: &str = "КоличествоBalance";
pub const PRICE_TYPE_KEY: &str = "ТипЦен_Key";
pub const PRICE_VALUE: &str = "Цена";

pub const EXPANDED_PRICE_TYPE: &str = "ТипЦены";
pub const EXPANDED_PRICES: &str = "Цены";
pub const EXPANDED_STOCK: &str = "Остаток";

/// 1C writes this GUID into `Parent_Key` for top-level catalog entries.
pub const NIL_GUID: &str = "00000000-0000-0000-0000-000000000000";

pub const PRODUCT_SELECT: &[&str] = &[REF_KEY, PARENT_KEY, IS_FOLDER, DESCRIPTION, FULL_NAME, SKU];
pub const STOCK_SELECT: &[&str] = &[PRODUCT_KEY, STOCK_QUANTITY];
pub const PRICE_SELECT: &[&str] = &[PRODUCT_KEY, PRICE_TYPE_KEY, PRICE_VALUE];
pub const PRICE_TYPE_SELECT: &[&str] = &[REF_KEY, DESCRIPTION];
