//! Core types for the Almacén storefront.

pub mod catalog;
pub mod order;
pub mod place;

pub use catalog::{CategoryGroup, CategorySummary, Product};
pub use order::{Customer, OrderItem, OrderReceipt, OrderRequest, Shipping};
pub use place::{Place, PlaceSummary};
