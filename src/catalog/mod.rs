//! Result catalog access.
//!
//! The block never owns data; it reads column specs and anchored column
//! queries from the platform's result catalog. [`ColumnCatalog`] is the
//! narrow interface the resolver depends on and [`InMemoryCatalog`] is a
//! reference backend for embedding and tests.

mod memory;
mod traits;

pub use memory::InMemoryCatalog;
pub use traits::ColumnCatalog;
