//! # LanceDB Vector Store
//!
//! Persistent `VectorStore` implementation backed by LanceDB: one table per
//! collection under a configurable directory, vectors searched with cosine
//! distance and metadata predicates pushed down as SQL filters.

mod config;
mod distance_type;
mod store;

pub use config::LanceConfig;
pub use distance_type::DistanceType;
pub use store::LanceVectorStore;
