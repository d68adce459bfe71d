use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use storefront_shared::{format_price, ProductResponse, SortOrder};
use validator::Validate;
use crate::error::AppError;
use crate::models::category::resolve_slug;

const PRODUCT_COLUMNS: &str = "id, category_id, name, slug, image, description, short_description, \
     price, discount_price, stock, available, featured, created, updated";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub description: String,
    pub short_description: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub stock: i32,
    pub available: bool,
    pub featured: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    pub category_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub slug: Option<String>,
    pub image: Option<String>,
    pub description: String,
    #[validate(length(max = 300))]
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

impl NewProduct {
    pub fn new(category_id: i64, name: impl Into<String>, price: Decimal, stock: i32) -> Self {
        Self {
            category_id,
            name: name.into(),
            slug: None,
            image: None,
            description: String::new(),
            short_description: String::new(),
            price,
            discount_price: None,
            stock,
            available: true,
            featured: false,
        }
    }

    pub fn resolved_slug(&self) -> Result<String, AppError> {
        resolve_slug(self.slug.as_deref(), &self.name)
    }
}

/// Administrative changes to an existing product. `None` leaves the field as
/// it is; `discount_price: Some(None)` clears the discount.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub price: Option<Decimal>,
    pub discount_price: Option<Option<Decimal>>,
    pub stock: Option<i32>,
    pub available: Option<bool>,
    pub featured: Option<bool>,
}

impl ProductChanges {
    pub fn apply(&self, product: &mut Product) {
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(discount_price) = self.discount_price {
            product.discount_price = discount_price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(available) = self.available {
            product.available = available;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductLookup {
    Id(i64),
    Slug(String),
}

/// Row selection for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub available_only: bool,
    pub featured_only: bool,
    pub category_id: Option<i64>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub exclude_id: Option<i64>,
    pub sort: SortOrder,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl ProductFilter {
    pub fn available() -> Self {
        Self {
            available_only: true,
            ..Default::default()
        }
    }

    /// Available products, newest first, capped at `limit`.
    pub fn latest(limit: i64) -> Self {
        Self {
            available_only: true,
            sort: SortOrder::Newest,
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Whether a product passes every restriction of this filter. Ordering and
    /// windowing are not considered.
    pub fn matches(&self, product: &Product) -> bool {
        if self.available_only && !product.available {
            return false;
        }
        if self.featured_only && !product.featured {
            return false;
        }
        if self.category_id.is_some_and(|id| id != product.category_id) {
            return false;
        }
        if self.exclude_id == Some(product.id) {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !product.name.to_lowercase().contains(&needle)
                && !product.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }

    fn push_conditions(&self, query: &mut QueryBuilder<'_, Postgres>) {
        query.push(" WHERE TRUE");
        if self.available_only {
            query.push(" AND available = TRUE");
        }
        if self.featured_only {
            query.push(" AND featured = TRUE");
        }
        if let Some(category_id) = self.category_id {
            query.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(exclude_id) = self.exclude_id {
            query.push(" AND id <> ").push_bind(exclude_id);
        }
        if let Some(search) = &self.search {
            let pattern = format!("%{}%", escape_like(search));
            query
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(min_price) = self.min_price {
            query.push(" AND price >= ").push_bind(min_price);
        }
        if let Some(max_price) = self.max_price {
            query.push(" AND price <= ").push_bind(max_price);
        }
    }

    fn order_clause(&self) -> &'static str {
        match self.sort {
            SortOrder::Name => " ORDER BY name, id",
            SortOrder::PriceLow => " ORDER BY price, id",
            SortOrder::PriceHigh => " ORDER BY price DESC, id DESC",
            SortOrder::Newest => " ORDER BY created DESC, id DESC",
        }
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

impl Product {
    pub async fn create(pool: &PgPool, request: &NewProduct) -> Result<Self, AppError> {
        let slug = request.resolved_slug()?;

        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (category_id, name, slug, image, description, short_description,
                                  price, discount_price, stock, available, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(request.category_id)
        .bind(&request.name)
        .bind(&slug)
        .bind(&request.image)
        .bind(&request.description)
        .bind(&request.short_description)
        .bind(request.price)
        .bind(request.discount_price)
        .bind(request.stock)
        .bind(request.available)
        .bind(request.featured)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::from_slug_write(e, &slug))
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: &ProductChanges,
    ) -> Result<Option<Self>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE products SET updated = NOW()");
        if let Some(price) = changes.price {
            query.push(", price = ").push_bind(price);
        }
        if let Some(discount_price) = changes.discount_price {
            query.push(", discount_price = ").push_bind(discount_price);
        }
        if let Some(stock) = changes.stock {
            query.push(", stock = ").push_bind(stock);
        }
        if let Some(available) = changes.available {
            query.push(", available = ").push_bind(available);
        }
        if let Some(featured) = changes.featured {
            query.push(", featured = ").push_bind(featured);
        }
        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(PRODUCT_COLUMNS);

        let product = query
            .build_query_as::<Product>()
            .fetch_optional(pool)
            .await?;

        Ok(product)
    }

    pub async fn find(
        pool: &PgPool,
        lookup: &ProductLookup,
        must_be_available: bool,
    ) -> Result<Option<Self>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM products", PRODUCT_COLUMNS));
        match lookup {
            ProductLookup::Id(id) => query.push(" WHERE id = ").push_bind(*id),
            ProductLookup::Slug(slug) => query.push(" WHERE slug = ").push_bind(slug.clone()),
        };
        if must_be_available {
            query.push(" AND available = TRUE");
        }

        let product = query
            .build_query_as::<Product>()
            .fetch_optional(pool)
            .await?;

        Ok(product)
    }

    pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Self>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = ANY($1)",
            PRODUCT_COLUMNS
        ))
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    pub async fn search(pool: &PgPool, filter: &ProductFilter) -> Result<Vec<Self>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM products", PRODUCT_COLUMNS));
        filter.push_conditions(&mut query);
        query.push(filter.order_clause());
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }
        if filter.offset > 0 {
            query.push(" OFFSET ").push_bind(filter.offset);
        }

        let products = query
            .build_query_as::<Product>()
            .fetch_all(pool)
            .await?;

        Ok(products)
    }

    pub async fn count(pool: &PgPool, filter: &ProductFilter) -> Result<i64, AppError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        filter.push_conditions(&mut query);

        let count = query.build_query_scalar::<i64>().fetch_one(pool).await?;
        Ok(count)
    }

    /// The discount price, if one is set. A zero discount counts as unset.
    fn discount(&self) -> Option<Decimal> {
        self.discount_price.filter(|discount| !discount.is_zero())
    }

    /// True when a discount price is set and is strictly below the list price.
    pub fn has_discount(&self) -> bool {
        matches!(self.discount(), Some(discount) if discount < self.price)
    }

    /// Price actually charged: the discount price when it is effective.
    pub fn final_price(&self) -> Decimal {
        match self.discount() {
            Some(discount) if self.has_discount() => discount,
            _ => self.price,
        }
    }

    pub fn formatted_price(&self) -> String {
        format_price(self.price)
    }

    pub fn formatted_discount_price(&self) -> Option<String> {
        self.discount().map(format_price)
    }

    pub fn url(&self) -> String {
        format!("/product/{}/", self.slug)
    }

    pub fn to_response(&self) -> ProductResponse {
        ProductResponse {
            id: self.id,
            category_id: self.category_id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            image: self.image.clone(),
            description: self.description.clone(),
            short_description: self.short_description.clone(),
            price: self.price,
            discount_price: self.discount_price,
            has_discount: self.has_discount(),
            final_price: self.final_price(),
            formatted_price: self.formatted_price(),
            formatted_discount_price: self.formatted_discount_price(),
            stock: self.stock,
            available: self.available,
            featured: self.featured,
            url: self.url(),
            created: self.created,
            updated: self.updated,
        }
    }
}
