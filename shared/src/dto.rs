use crate::types::*;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Catalog DTOs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub url: String,
    pub product_count: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub description: String,
    pub short_description: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub has_discount: bool,
    pub final_price: Decimal,
    pub formatted_price: String,
    pub formatted_discount_price: Option<String>,
    pub stock: i32,
    pub available: bool,
    pub featured: bool,
    pub url: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

// Pagination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<i64>,
    pub previous_page_number: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

// Page DTOs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub level: FlashLevel,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HomeResponse {
    pub notice: Option<Notice>,
    pub categories: Vec<CategoryResponse>,
    pub featured_products: Vec<ProductResponse>,
    pub latest_products: Vec<ProductResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub notice: Option<Notice>,
    pub current_category: Option<CategoryResponse>,
    pub categories: Vec<CategoryResponse>,
    pub products: Page<ProductResponse>,
    pub search_query: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: SortOrder,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductDetailResponse {
    pub notice: Option<Notice>,
    pub product: ProductResponse,
    pub related_products: Vec<ProductResponse>,
}

// Cart DTOs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemResponse {
    pub id: i64,
    pub product: ProductResponse,
    pub quantity: i32,
    pub total_price: Decimal,
    pub formatted_total_price: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub id: i64,
    pub session_key: String,
    pub items: Vec<CartItemResponse>,
    pub total_items: i64,
    pub total_price: Decimal,
    pub formatted_total_price: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CartPageResponse {
    pub notice: Option<Notice>,
    pub cart: CartResponse,
}
