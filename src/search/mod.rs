/// Search-side collaborators: query phrasing, the live provider, and the curated fallback

pub mod catalog;
pub mod provider;
pub mod variants;

pub use catalog::{CatalogBucket, CuratedCatalog};
pub use provider::{VideoProvider, YouTubeProvider};
pub use variants::query_variants;
