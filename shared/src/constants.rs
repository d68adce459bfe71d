// Listing
pub const PRODUCTS_PER_PAGE: i64 = 12;

// Home page
pub const HOME_CATEGORY_LIMIT: i64 = 6;
pub const HOME_FEATURED_LIMIT: i64 = 8;
pub const HOME_LATEST_LIMIT: i64 = 8;

// Product detail
pub const RELATED_PRODUCTS_LIMIT: i64 = 4;

// Cart
pub const DEFAULT_CART_QUANTITY: i32 = 1;

// Pricing
pub const CURRENCY_SUFFIX: &str = "Toman";

// Sessions
pub const DEFAULT_SESSION_COOKIE: &str = "sessionid";
pub const FLASH_COOKIE: &str = "flash";
pub const SESSION_KEY_LENGTH: usize = 32;

// Success messages
pub const SUCCESS_ADDED_TO_CART: &str = "was added to your cart.";
pub const SUCCESS_CART_UPDATED: &str = "Cart updated.";
pub const SUCCESS_ITEM_REMOVED: &str = "Product removed from cart.";
pub const SUCCESS_CART_CLEARED: &str = "Cart cleared.";

// Error messages
pub const ERROR_INSUFFICIENT_STOCK: &str = "Requested quantity exceeds available stock.";
pub const ERROR_INVALID_QUANTITY: &str = "Quantity must be at least 1.";
pub const ERROR_PRODUCT_NOT_FOUND: &str = "Product not found";
pub const ERROR_CATEGORY_NOT_FOUND: &str = "Category not found";
pub const ERROR_CART_ITEM_NOT_FOUND: &str = "Cart item not found";
