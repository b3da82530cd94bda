pub mod catalog;
pub mod spec;

pub use catalog::{ArrhythmiaCatalog, CatalogEntry};
pub use spec::ArrhythmiaSpec;
