//! Storefront models: catalog categories and products, session carts and
//! their items.
//!
//! Each model carries its Postgres queries as associated functions and the
//! derived values (discounts, line and cart totals) as plain methods that are
//! recomputed on every call.

pub mod cart;
pub mod category;
pub mod product;

#[cfg(test)]
mod tests;

pub use cart::{Cart, CartItem, CartLine, CartSummary};
pub use category::{Category, NewCategory};
pub use product::{NewProduct, Product, ProductChanges, ProductFilter, ProductLookup};

use storefront_shared::PageMeta;

/// Page arithmetic over a counted result set.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    pub count: i64,
    pub per_page: i64,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    /// Always at least one page, even for an empty result.
    pub fn num_pages(&self) -> i64 {
        if self.count == 0 {
            1
        } else {
            (self.count + self.per_page - 1) / self.per_page
        }
    }

    /// Resolve a raw page parameter: anything that is not an integer selects
    /// page 1, integers outside `1..=num_pages` select the last page.
    pub fn resolve_page(&self, raw: Option<&str>) -> i64 {
        let number = match raw.map(|value| value.trim().parse::<i64>()) {
            Some(Ok(number)) => number,
            _ => return 1,
        };

        if number < 1 || number > self.num_pages() {
            self.num_pages()
        } else {
            number
        }
    }

    pub fn offset(&self, number: i64) -> i64 {
        (number - 1) * self.per_page
    }

    pub fn meta(&self, number: i64) -> PageMeta {
        let has_next = number < self.num_pages();
        let has_previous = number > 1;
        PageMeta {
            number,
            num_pages: self.num_pages(),
            count: self.count,
            per_page: self.per_page,
            has_next,
            has_previous,
            next_page_number: has_next.then_some(number + 1),
            previous_page_number: has_previous.then_some(number - 1),
        }
    }
}
