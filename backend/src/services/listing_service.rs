use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use storefront_shared::{Page, ProductResponse, SortOrder, PRODUCTS_PER_PAGE};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::{Category, Paginator, Product, ProductFilter};
use crate::repositories::{CatalogRepository, Repositories};

/// Raw listing parameters as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    pub fn search_term(&self) -> Option<&str> {
        non_empty(self.search.as_deref())
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_param(self.sort.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_price_bound(raw: Option<&str>, name: &str) -> Option<Decimal> {
    let raw = non_empty(raw)?;
    match Decimal::from_str(raw.trim()) {
        Ok(bound) => Some(bound),
        Err(_) => {
            warn!("Ignoring non-numeric {} filter: {:?}", name, raw);
            None
        }
    }
}

/// Filtered, sorted and paginated product listings.
#[derive(Clone)]
pub struct ListingService {
    catalog: Arc<dyn CatalogRepository>,
}

impl ListingService {
    pub fn new(repositories: Repositories) -> Self {
        Self {
            catalog: repositories.catalog,
        }
    }

    /// Available products, optionally restricted to `category`, to a name or
    /// description match and to a list-price range, sorted and cut to one page
    /// of `PRODUCTS_PER_PAGE`.
    pub async fn list(
        &self,
        category: Option<&Category>,
        query: &ListingQuery,
    ) -> Result<Page<ProductResponse>, AppError> {
        let mut filter = ProductFilter::available();
        filter.category_id = category.map(|c| c.id);
        filter.search = query.search_term().map(str::to_string);
        filter.min_price = parse_price_bound(query.min_price.as_deref(), "min_price");
        filter.max_price = parse_price_bound(query.max_price.as_deref(), "max_price");
        filter.sort = query.sort_order();

        let count = self.catalog.count_products(&filter).await?;
        let paginator = Paginator::new(count, PRODUCTS_PER_PAGE);
        let number = paginator.resolve_page(query.page.as_deref());

        filter.limit = Some(paginator.per_page);
        filter.offset = paginator.offset(number);
        let products = self.catalog.list_products(&filter).await?;

        debug!(
            "Listing page {}/{} ({} matches, sort {})",
            number,
            paginator.num_pages(),
            count,
            filter.sort
        );

        Ok(Page {
            items: products.iter().map(Product::to_response).collect(),
            meta: paginator.meta(number),
        })
    }
}
