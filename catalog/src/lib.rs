#![deny(clippy::all)]

pub mod auth;
pub mod cache_aside;
pub mod domain;
pub mod persistence;
pub mod ports;

pub use cache_aside::CacheAsideProductStore;
pub use domain::{Product, ProductDraft, ProductFields, ProductId};
pub use ports::{FastCache, PrimaryStore};
