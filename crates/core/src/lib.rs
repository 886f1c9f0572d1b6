//! Almacén Core - Shared types library.
//!
//! This crate provides common types used across the Almacén components:
//! - `api` - The storefront HTTP API (catalog reads + order writes)
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Catalog, place, and order wire types
//! - [`media`] - Image reference normalization for hosted thumbnails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod media;
pub mod types;

pub use types::*;
