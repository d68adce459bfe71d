use actix_web::{web, HttpResponse};
use storefront_shared::{HomeResponse, ProductDetailResponse, ProductListResponse};
use tracing::debug;

use crate::error::AppError;
use crate::middleware::IncomingFlash;
use crate::models::{Category, Product};
use crate::services::{CatalogService, ListingQuery, ListingService};

/// Home page: a handful of categories, featured and latest products.
pub async fn home(
    flash: IncomingFlash,
    catalog: web::Data<CatalogService>,
) -> Result<HttpResponse, AppError> {
    let showcase = catalog.showcase().await?;

    Ok(flash.render(&HomeResponse {
        notice: flash.notice(),
        categories: showcase.categories,
        featured_products: showcase.featured_products,
        latest_products: showcase.latest_products,
    }))
}

/// Product listing over the whole catalog.
pub async fn product_list(
    query: web::Query<ListingQuery>,
    flash: IncomingFlash,
    catalog: web::Data<CatalogService>,
    listing: web::Data<ListingService>,
) -> Result<HttpResponse, AppError> {
    listing_page(None, &query, &flash, &catalog, &listing).await
}

/// Product listing scoped to one category.
pub async fn products_by_category(
    slug: web::Path<String>,
    query: web::Query<ListingQuery>,
    flash: IncomingFlash,
    catalog: web::Data<CatalogService>,
    listing: web::Data<ListingService>,
) -> Result<HttpResponse, AppError> {
    let category = catalog.get_category(&slug).await?;
    listing_page(Some(category), &query, &flash, &catalog, &listing).await
}

async fn listing_page(
    category: Option<Category>,
    query: &ListingQuery,
    flash: &IncomingFlash,
    catalog: &CatalogService,
    listing: &ListingService,
) -> Result<HttpResponse, AppError> {
    debug!("Listing products with query: {:?}", query);

    let products = listing.list(category.as_ref(), query).await?;
    let current_category = match &category {
        Some(category) => Some(catalog.category_response(category).await?),
        None => None,
    };
    let categories = catalog.list_categories(None).await?;

    Ok(flash.render(&ProductListResponse {
        notice: flash.notice(),
        current_category,
        categories,
        products,
        search_query: query.search.clone(),
        min_price: query.min_price.clone(),
        max_price: query.max_price.clone(),
        sort_by: query.sort_order(),
    }))
}

/// Product detail with related products from the same category.
pub async fn product_detail(
    slug: web::Path<String>,
    flash: IncomingFlash,
    catalog: web::Data<CatalogService>,
) -> Result<HttpResponse, AppError> {
    let (product, related) = catalog.product_detail(&slug).await?;

    Ok(flash.render(&ProductDetailResponse {
        notice: flash.notice(),
        product: product.to_response(),
        related_products: related.iter().map(Product::to_response).collect(),
    }))
}
