use crate::{
    error::{AppError, AppResult},
    models::{normalize_title, Recommendation, SimilarityResult},
    services::similarity::cosine_with_norms,
    store::Dataset,
};

/// Number of recommendations returned per query
pub const NUM_RECOMMENDATIONS: usize = 5;

/// Recommends movies similar to `title`
///
/// Every movie is scored by cosine similarity of its feature vector against
/// the queried movie's. The `k` most similar are kept and then re-ordered by
/// `vote_average`, so a movie that barely made the cut can still come first.
///
/// Both sorts are stable: equal similarities keep file order, equal votes keep
/// similarity order. Movies sharing the queried title are never returned.
pub fn recommend(dataset: &Dataset, title: &str, k: usize) -> AppResult<Vec<Recommendation>> {
    let title = normalize_title(title);

    let query = dataset
        .find_by_title(&title)
        .ok_or_else(|| AppError::NotFound {
            title: title.clone(),
        })?;

    let mut candidates: Vec<SimilarityResult<'_>> = dataset
        .records()
        .iter()
        .filter(|movie| movie.title != title)
        .map(|movie| SimilarityResult {
            title: &movie.title,
            similarity_score: cosine_with_norms(
                &query.features,
                query.norm,
                &movie.features,
                movie.norm,
            ),
            vote_average: movie.vote_average,
        })
        .collect();

    candidates.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    candidates.truncate(k);
    candidates.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average));

    tracing::debug!(
        title = %title,
        results = candidates.len(),
        "Computed recommendations"
    );

    Ok(candidates.into_iter().map(Recommendation::from).collect())
}
