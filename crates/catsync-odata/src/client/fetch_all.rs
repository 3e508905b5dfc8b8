//! Multi-page fetch loops for `ODataClient`.

use catsync_core::{fields, EntityCollection, RawCatalog};

use crate::error::ODataError;

use super::ODataClient;
use super::MAX_PAGES;

impl ODataClient {
    /// Fetches every record of `entity_set`, merging pages in order.
    ///
    /// Pages are requested with increasing `$skip` until a page shorter than
    /// the page size arrives.
    ///
    /// **All-or-nothing semantics**: on any page failure, already-fetched
    /// pages are discarded and the error is returned, so the core never sees
    /// a partial entity set.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_page`].
    /// Returns [`ODataError::PaginationLimit`] if the number of pages exceeds
    /// [`MAX_PAGES`].
    pub async fn fetch_entities(
        &self,
        entity_set: &str,
        select: &[&str],
    ) -> Result<EntityCollection, ODataError> {
        let page_size = self.settings.page_size as usize;
        let mut all = EntityCollection::default();
        let mut skip = 0usize;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(ODataError::PaginationLimit {
                    entity_set: entity_set.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            let page = self.fetch_page(entity_set, select, skip).await?;
            let received = page.value.len();
            all.extend(page.into());

            if received < page_size {
                break;
            }
            skip += received;
        }

        tracing::debug!(entity_set, records = all.len(), pages = page_count, "fetched entity set");
        Ok(all)
    }

    /// Fetches the four entity sets a sync run needs.
    ///
    /// # Errors
    ///
    /// Propagates the first failure from [`Self::fetch_entities`].
    pub async fn fetch_catalog(&self) -> Result<RawCatalog, ODataError> {
        let products = self
            .fetch_entities(fields::SET_PRODUCTS, fields::PRODUCT_SELECT)
            .await?;
        let stock = self
            .fetch_entities(fields::SET_STOCK, fields::STOCK_SELECT)
            .await?;
        let prices = self
            .fetch_entities(fields::SET_PRICES, fields::PRICE_SELECT)
            .await?;
        let price_types = self
            .fetch_entities(fields::SET_PRICE_TYPES, fields::PRICE_TYPE_SELECT)
            .await?;

        tracing::info!(
            products = products.len(),
            stock = stock.len(),
            prices = prices.len(),
            price_types = price_types.len(),
            "fetched catalog from OData"
        );

        Ok(RawCatalog {
            products,
            stock,
            prices,
            price_types,
        })
    }
}
