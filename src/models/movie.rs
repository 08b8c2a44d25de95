use serde::Serialize;

/// One row of the movie dataset
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    /// Opaque identifier, kept as written in the source file
    pub id: String,
    /// Lowercased title used as the lookup key
    pub title: String,
    pub vote_average: f64,
    /// Feature values in the dataset's feature column order
    pub features: Vec<f64>,
    /// Euclidean norm of `features`
    pub norm: f64,
}

impl MovieRecord {
    pub fn new(id: String, title: &str, vote_average: f64, features: Vec<f64>) -> Self {
        let norm = features.iter().map(|x| x * x).sum::<f64>().sqrt();
        Self {
            id,
            title: normalize_title(title),
            vote_average,
            features,
            norm,
        }
    }
}

/// Canonical lookup key for a title
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase()
}

/// Score of one candidate against the queried movie
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult<'a> {
    pub title: &'a str,
    pub similarity_score: f64,
    pub vote_average: f64,
}

/// A recommended movie as returned to the client
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub vote_average: f64,
}

impl From<SimilarityResult<'_>> for Recommendation {
    fn from(result: SimilarityResult<'_>) -> Self {
        Self {
            title: result.title.to_string(),
            vote_average: result.vote_average,
        }
    }
}
