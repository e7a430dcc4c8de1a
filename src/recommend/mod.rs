/// Matching & ranking engine
///
/// `Recommender` drives the provider, applies the duration and relevance
/// gates, assigns one video per topic without reuse, backfills by engagement,
/// and falls back to the curated catalog when live search has nothing to offer.

pub mod orchestrator;
pub mod pool;
pub mod request;

pub use orchestrator::{RecommendMode, Recommender};
pub use pool::CandidatePool;
pub use request::{normalize_topics, RecommendRequest};
