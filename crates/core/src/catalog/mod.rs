//! Currency catalog module - the tracked universe and its display names.

mod catalog_model;
mod catalog_service;

pub use catalog_model::{CatalogEntry, CurrencyCatalog};
pub use catalog_service::load_catalog;
