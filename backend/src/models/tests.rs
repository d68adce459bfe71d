//! Unit tests for the derived pricing and pagination rules.

use super::*;
use chrono::Utc;
use rust_decimal::Decimal;

fn product(price: i64, discount_price: Option<i64>) -> Product {
    let now = Utc::now();
    Product {
        id: 1,
        category_id: 1,
        name: "Trail Runner".to_string(),
        slug: "trail-runner".to_string(),
        image: None,
        description: "Lightweight running shoe".to_string(),
        short_description: String::new(),
        price: Decimal::from(price),
        discount_price: discount_price.map(Decimal::from),
        stock: 10,
        available: true,
        featured: false,
        created: now,
        updated: now,
    }
}

fn line(item_id: i64, product: Product, quantity: i32) -> CartLine {
    CartLine {
        item: CartItem {
            id: item_id,
            cart_id: 1,
            product_id: product.id,
            quantity,
            created: Utc::now(),
        },
        product,
    }
}

#[test]
fn test_discount_below_price_is_effective() {
    let product = product(120_000, Some(99_000));
    assert!(product.has_discount());
    assert_eq!(product.final_price(), Decimal::from(99_000));
}

#[test]
fn test_discount_at_or_above_price_is_ignored() {
    let equal = product(50_000, Some(50_000));
    assert!(!equal.has_discount());
    assert_eq!(equal.final_price(), Decimal::from(50_000));

    let higher = product(50_000, Some(65_000));
    assert!(!higher.has_discount());
    assert_eq!(higher.final_price(), Decimal::from(50_000));
    assert_eq!(higher.formatted_discount_price().as_deref(), Some("65,000 Toman"));
}

#[test]
fn test_no_discount_uses_list_price() {
    let product = product(75_500, None);
    assert!(!product.has_discount());
    assert_eq!(product.final_price(), Decimal::from(75_500));
    assert_eq!(product.formatted_price(), "75,500 Toman");
    assert!(product.formatted_discount_price().is_none());
}

#[test]
fn test_zero_discount_counts_as_unset() {
    let product = product(100, Some(0));
    assert!(!product.has_discount());
    assert_eq!(product.final_price(), Decimal::from(100));
    assert!(product.formatted_discount_price().is_none());
}

#[test]
fn test_product_response_carries_derived_fields() {
    let response = product(200, Some(150)).to_response();
    assert!(response.has_discount);
    assert_eq!(response.final_price, Decimal::from(150));
    assert_eq!(response.url, "/product/trail-runner/");
}

#[test]
fn test_cart_totals_follow_current_prices() {
    let now = Utc::now();
    let mut summary = CartSummary {
        cart: Cart {
            id: 1,
            session_key: "a".repeat(32),
            created: now,
            updated: now,
        },
        lines: vec![
            line(1, product(1_000, None), 2),
            line(2, product(5_000, Some(4_000)), 3),
        ],
    };

    assert_eq!(summary.total_items(), 5);
    assert_eq!(summary.total_price(), Decimal::from(14_000));

    summary.lines[0].product.price = Decimal::from(1_500);
    assert_eq!(summary.lines[0].total_price(), Decimal::from(3_000));
    assert_eq!(summary.total_price(), Decimal::from(15_000));

    let response = summary.to_response();
    assert_eq!(response.items.len(), 2);
    assert_eq!(response.formatted_total_price, "15,000 Toman");
}

#[test]
fn test_empty_cart_totals_are_zero() {
    let now = Utc::now();
    let summary = CartSummary {
        cart: Cart {
            id: 7,
            session_key: "b".repeat(32),
            created: now,
            updated: now,
        },
        lines: Vec::new(),
    };

    assert_eq!(summary.total_items(), 0);
    assert_eq!(summary.total_price(), Decimal::ZERO);
}

#[test]
fn test_filter_matches_search_case_insensitively() {
    let mut filter = ProductFilter::available();
    filter.search = Some("RUNNING".to_string());
    assert!(filter.matches(&product(100, None)));

    filter.search = Some("trail".to_string());
    assert!(filter.matches(&product(100, None)));

    filter.search = Some("sandal".to_string());
    assert!(!filter.matches(&product(100, None)));
}

#[test]
fn test_filter_price_bounds_use_list_price() {
    let discounted = product(1_000, Some(400));
    let filter = ProductFilter {
        min_price: Some(Decimal::from(500)),
        ..ProductFilter::available()
    };
    assert!(filter.matches(&discounted));

    let filter = ProductFilter {
        max_price: Some(Decimal::from(999)),
        ..ProductFilter::available()
    };
    assert!(!filter.matches(&discounted));
}

#[test]
fn test_paginator_page_resolution() {
    let paginator = Paginator::new(13, 12);
    assert_eq!(paginator.num_pages(), 2);
    assert_eq!(paginator.resolve_page(None), 1);
    assert_eq!(paginator.resolve_page(Some("abc")), 1);
    assert_eq!(paginator.resolve_page(Some("2")), 2);
    assert_eq!(paginator.resolve_page(Some("99")), 2);
    assert_eq!(paginator.resolve_page(Some("0")), 2);
    assert_eq!(paginator.offset(2), 12);

    let first = paginator.meta(1);
    assert!(first.has_next);
    assert!(!first.has_previous);
    assert_eq!(first.next_page_number, Some(2));

    let last = paginator.meta(2);
    assert!(!last.has_next);
    assert!(last.has_previous);
}

#[test]
fn test_paginator_empty_result_has_one_page() {
    let paginator = Paginator::new(0, 12);
    assert_eq!(paginator.num_pages(), 1);
    assert_eq!(paginator.resolve_page(Some("5")), 1);
    assert!(!paginator.meta(1).has_next);
}

#[test]
fn test_slug_resolution() {
    assert_eq!(NewCategory::new("Winter Boots!!").resolved_slug().unwrap(), "winter-boots");

    let mut explicit = NewCategory::new("Winter Boots");
    explicit.slug = Some("cold-weather".to_string());
    assert_eq!(explicit.resolved_slug().unwrap(), "cold-weather");

    assert!(NewCategory::new("???").resolved_slug().is_err());
}
