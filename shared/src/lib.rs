//! Types shared between the storefront backend and its clients: wire DTOs,
//! catalog enums, constants and price formatting.

pub mod constants;
pub mod dto;
pub mod format;
pub mod types;

pub use constants::*;
pub use dto::*;
pub use format::format_price;
pub use types::*;
