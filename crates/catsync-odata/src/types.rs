//! OData v3 JSON response envelope as served by 1C.
//!
//! 1C answers `$format=json` requests with
//! `{"odata.metadata": "...", "value": [ ... ]}`. Only `value` is read;
//! records keep their loose shape and are handed to the core as entities.

use catsync_core::{Entity, EntityCollection};
use serde::Deserialize;

/// One page of an entity set.
#[derive(Debug, Deserialize)]
pub struct ODataPage {
    #[serde(default)]
    pub value: Vec<Entity>,
}

impl From<ODataPage> for EntityCollection {
    fn from(page: ODataPage) -> Self {
        EntityCollection::new(page.value)
    }
}
