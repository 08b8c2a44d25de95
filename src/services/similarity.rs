/// Cosine similarity between two feature vectors.
///
/// Returns `0.0` if either vector has zero magnitude or the vectors differ
/// in length.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    cosine_with_norms(a, norm_a, b, norm_b)
}

/// Same as [`cosine_similarity`] with both norms already known
pub fn cosine_with_norms(a: &[f64], norm_a: f64, b: &[f64], norm_b: f64) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let denom = norm_a * norm_b;
    if denom == 0.0 {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / denom
}
