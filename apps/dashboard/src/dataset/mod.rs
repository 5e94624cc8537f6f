// Dataset access: one JSON document, read once and memoized per source.

pub mod cache;
pub mod loader;

pub use cache::DatasetCache;
pub use loader::DatasetError;
