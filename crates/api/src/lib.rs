//! Almacén storefront API library.
//!
//! This crate provides the API functionality as a library, allowing it to
//! be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod orders;
pub mod routes;
pub mod state;
pub mod store;
