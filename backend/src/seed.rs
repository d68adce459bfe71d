//! Catalog fixtures: a JSON document of categories with nested products,
//! loaded at start-up or through `migrate seed <file>`.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{Category, NewCategory, NewProduct};
use crate::services::CatalogService;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSeed {
    pub categories: Vec<CategorySeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    pub slug: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    pub slug: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub stock: i32,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub featured: bool,
}

fn default_available() -> bool {
    true
}

impl ProductSeed {
    fn into_request(self, category_id: i64) -> NewProduct {
        NewProduct {
            category_id,
            name: self.name,
            slug: self.slug,
            image: self.image,
            description: self.description,
            short_description: self.short_description,
            price: self.price,
            discount_price: self.discount_price,
            stock: self.stock,
            available: self.available,
            featured: self.featured,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub products_created: usize,
    pub skipped: usize,
}

impl CatalogSeed {
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// Write the fixture into the catalog. Entries whose slug already exists
    /// are skipped, so applying the same fixture twice is harmless.
    pub async fn apply(self, catalog: &CatalogService) -> Result<SeedReport, AppError> {
        let mut report = SeedReport::default();

        for entry in self.categories {
            let request = NewCategory {
                name: entry.name,
                slug: entry.slug,
                image: entry.image,
            };
            let category = match catalog.create_category(request.clone()).await {
                Ok(category) => {
                    report.categories_created += 1;
                    category
                }
                Err(AppError::DuplicateSlug(_)) => {
                    report.skipped += 1;
                    existing_category(catalog, &request).await?
                }
                Err(e) => return Err(e),
            };

            for product in entry.products {
                match catalog.create_product(product.into_request(category.id)).await {
                    Ok(_) => report.products_created += 1,
                    Err(AppError::DuplicateSlug(slug)) => {
                        debug!("Product {} already seeded", slug);
                        report.skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!(
            "Seeded {} categories and {} products ({} skipped)",
            report.categories_created, report.products_created, report.skipped
        );
        Ok(report)
    }
}

async fn existing_category(
    catalog: &CatalogService,
    request: &NewCategory,
) -> Result<Category, AppError> {
    catalog.get_category(&request.resolved_slug()?).await
}
