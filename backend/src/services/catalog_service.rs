use std::sync::Arc;
use storefront_shared::{
    CategoryResponse, ProductResponse, ERROR_CATEGORY_NOT_FOUND, ERROR_PRODUCT_NOT_FOUND,
    HOME_CATEGORY_LIMIT, HOME_FEATURED_LIMIT, HOME_LATEST_LIMIT, RELATED_PRODUCTS_LIMIT,
};
use tracing::{debug, info};
use validator::Validate;

use crate::error::AppError;
use crate::models::{
    Category, NewCategory, NewProduct, Product, ProductChanges, ProductFilter, ProductLookup,
};
use crate::repositories::{CatalogRepository, Repositories};

/// Home page content.
#[derive(Debug, Clone)]
pub struct Showcase {
    pub categories: Vec<CategoryResponse>,
    pub featured_products: Vec<ProductResponse>,
    pub latest_products: Vec<ProductResponse>,
}

/// Catalog reads for the storefront pages and the administrative writes used
/// to populate the catalog.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(repositories: Repositories) -> Self {
        Self {
            catalog: repositories.catalog,
        }
    }

    /// Create a category. Fails with `DuplicateSlug` on a slug collision.
    pub async fn create_category(&self, request: NewCategory) -> Result<Category, AppError> {
        request.validate()?;
        let category = self.catalog.create_category(&request).await?;

        info!("Created category {} ({})", category.id, category.slug);
        Ok(category)
    }

    /// Create a product in an existing category. Fails with `DuplicateSlug` on a
    /// slug collision.
    pub async fn create_product(&self, request: NewProduct) -> Result<Product, AppError> {
        request.validate()?;
        self.catalog
            .find_category(request.category_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_CATEGORY_NOT_FOUND.to_string()))?;

        let product = self.catalog.create_product(&request).await?;

        info!(
            "Created product {} ({}) in category {}",
            product.id, product.slug, product.category_id
        );
        Ok(product)
    }

    pub async fn update_product(&self, id: i64, changes: ProductChanges) -> Result<Product, AppError> {
        let product = self
            .catalog
            .update_product(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_PRODUCT_NOT_FOUND.to_string()))?;

        info!("Updated product {} ({})", product.id, product.slug);
        Ok(product)
    }

    pub async fn get_category(&self, slug: &str) -> Result<Category, AppError> {
        self.catalog
            .find_category_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_CATEGORY_NOT_FOUND.to_string()))
    }

    /// Look a product up by id or slug. With `must_be_available`, unavailable
    /// products are reported as not found.
    pub async fn get_product(
        &self,
        lookup: ProductLookup,
        must_be_available: bool,
    ) -> Result<Product, AppError> {
        self.catalog
            .find_product(&lookup, must_be_available)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_PRODUCT_NOT_FOUND.to_string()))
    }

    pub async fn category_response(&self, category: &Category) -> Result<CategoryResponse, AppError> {
        let product_count = self.catalog.count_available_products(category.id).await?;
        Ok(category.to_response(product_count))
    }

    pub async fn list_categories(&self, limit: Option<i64>) -> Result<Vec<CategoryResponse>, AppError> {
        let categories = self.catalog.list_categories(limit).await?;

        let mut responses = Vec::with_capacity(categories.len());
        for category in &categories {
            responses.push(self.category_response(category).await?);
        }
        Ok(responses)
    }

    /// The first categories by name, the newest featured products and the
    /// newest available products.
    pub async fn showcase(&self) -> Result<Showcase, AppError> {
        let categories = self.list_categories(Some(HOME_CATEGORY_LIMIT)).await?;

        let featured_filter = ProductFilter {
            featured_only: true,
            ..ProductFilter::latest(HOME_FEATURED_LIMIT)
        };
        let featured_products = self.catalog.list_products(&featured_filter).await?;
        let latest_products = self
            .catalog
            .list_products(&ProductFilter::latest(HOME_LATEST_LIMIT))
            .await?;

        debug!(
            "Showcase: {} categories, {} featured, {} latest",
            categories.len(),
            featured_products.len(),
            latest_products.len()
        );

        Ok(Showcase {
            categories,
            featured_products: featured_products.iter().map(Product::to_response).collect(),
            latest_products: latest_products.iter().map(Product::to_response).collect(),
        })
    }

    /// An available product together with other available products from its
    /// category.
    pub async fn product_detail(&self, slug: &str) -> Result<(Product, Vec<Product>), AppError> {
        let product = self
            .get_product(ProductLookup::Slug(slug.to_string()), true)
            .await?;

        let related_filter = ProductFilter {
            category_id: Some(product.category_id),
            exclude_id: Some(product.id),
            ..ProductFilter::latest(RELATED_PRODUCTS_LIMIT)
        };
        let related = self.catalog.list_products(&related_filter).await?;

        debug!("Product {} has {} related products", product.slug, related.len());
        Ok((product, related))
    }
}
