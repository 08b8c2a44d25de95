pub mod movie;

pub use movie::{normalize_title, MovieRecord, Recommendation, SimilarityResult};
